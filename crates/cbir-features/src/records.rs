use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Common interface of the persisted feature records.
pub trait FeatureRecord: Serialize + DeserializeOwned + Send + Sync {
    /// The source image file name the record was extracted from.
    fn image_name(&self) -> &str;
}

/// The shape signature of one image.
///
/// Vector lengths are fixed by the extraction parameters regardless of the
/// input image size, so records are directly comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFeatureRecord {
    /// The source image file name, extension included.
    pub image_name: String,
    /// Normalized Fourier coefficient magnitudes of the largest contour.
    pub fourier_descriptors: Vec<f64>,
    /// Probability histogram of the contour segment directions.
    pub direction_histogram: Vec<f64>,
    /// Log transformed Hu moment invariants of the contour point set.
    pub hu_moments: Vec<f64>,
}

impl FeatureRecord for ShapeFeatureRecord {
    fn image_name(&self) -> &str {
        &self.image_name
    }
}

/// The texture signature of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureFeatureRecord {
    /// The source image file name, extension included.
    pub image_name: String,
    /// Mean and standard deviation of each Gabor filter response,
    /// scale-major and orientation-minor.
    pub gabor_features: Vec<f64>,
    /// Tamura coarseness, the mean optimal block size.
    pub tamura_coarseness: f64,
    /// Tamura contrast, the kurtosis normalized intensity spread.
    pub tamura_contrast: f64,
    /// Tamura directionality, the deviation of the edge orientation
    /// histogram from uniformity.
    pub tamura_directionality: f64,
    /// Probability histogram of the significant edge orientations.
    pub direction_histogram: Vec<f64>,
    /// Mean and standard deviation of the five GLCM properties.
    pub glcm_features: Vec<f64>,
}

impl FeatureRecord for TextureFeatureRecord {
    fn image_name(&self) -> &str {
        &self.image_name
    }
}
