/// An error type for the retrieval module.
#[derive(thiserror::Error, Debug)]
pub enum RetrievalError {
    /// Error when the query image has no persisted feature record.
    #[error("Feature record not found for query: {0}")]
    FeatureRecordNotFound(String),

    /// Error to load or persist feature records.
    #[error(transparent)]
    FeatureError(#[from] cbir_features::FeatureError),

    /// Error to walk the corpus directories.
    #[error("Failed to manipulate the corpus directory. {0}")]
    FileError(#[from] std::io::Error),
}
