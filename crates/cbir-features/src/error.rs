/// An error type for the feature extraction and persistence module.
#[derive(thiserror::Error, Debug)]
pub enum FeatureError {
    /// Error to load the source image.
    #[error("Failed to load the image. {0}")]
    ImageLoadError(#[from] cbir_io::IoError),

    /// Error to manipulate the image containers.
    #[error("Failed to process the image. {0}")]
    ImageError(#[from] cbir_image::ImageError),

    /// Error to serialize or deserialize a feature record.
    #[error("Failed to serialize the feature record. {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error to read or write a feature record file.
    #[error("Failed to manipulate the feature file. {0}")]
    FileError(#[from] std::io::Error),
}
