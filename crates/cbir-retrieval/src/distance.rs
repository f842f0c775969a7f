use cbir_features::{ShapeFeatureRecord, TextureFeatureRecord};

/// Component weights of the shape distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeWeights {
    /// Weight of the Fourier descriptor distance.
    pub fourier: f64,
    /// Weight of the direction histogram distance.
    pub direction: f64,
    /// Weight of the Hu moment distance.
    pub hu_moments: f64,
}

/// Default shape weights: 0.5 fourier, 0.3 direction, 0.2 hu moments.
pub const DEFAULT_SHAPE_WEIGHTS: ShapeWeights = ShapeWeights {
    fourier: 0.5,
    direction: 0.3,
    hu_moments: 0.2,
};

impl Default for ShapeWeights {
    fn default() -> Self {
        DEFAULT_SHAPE_WEIGHTS
    }
}

/// Component weights of the texture distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureWeights {
    /// Weight of the Gabor bank distance.
    pub gabor: f64,
    /// Weight of the Tamura triad distance.
    pub tamura: f64,
    /// Weight of the direction histogram distance.
    pub direction: f64,
    /// Weight of the co-occurrence statistics distance.
    pub glcm: f64,
}

/// Default texture weights: 0.4 gabor, 0.3 tamura, 0.15 direction, 0.15 glcm.
pub const DEFAULT_TEXTURE_WEIGHTS: TextureWeights = TextureWeights {
    gabor: 0.4,
    tamura: 0.3,
    direction: 0.15,
    glcm: 0.15,
};

impl Default for TextureWeights {
    fn default() -> Self {
        DEFAULT_TEXTURE_WEIGHTS
    }
}

// empirical rescalings that bring the heterogeneous component magnitudes
// into a comparable range before fusion; rankings are only compatible with
// previously extracted corpora when these stay unchanged
const GABOR_SCALE: f64 = 10.0;
const TAMURA_SCALE: f64 = 5.0;
const GLCM_SCALE: f64 = 2.0;

/// Similarity steepness of the shape distance.
pub const SHAPE_SIMILARITY_K: f64 = 10.0;

/// Similarity steepness of the texture distance.
pub const TEXTURE_SIMILARITY_K: f64 = 20.0;

/// Compute the Euclidean (L2) distance between two vectors.
///
/// Shorter vectors are treated as zero padded, so records persisted with
/// different parameter sets still produce a defined value.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0.0);
            let y = b.get(i).copied().unwrap_or(0.0);
            (x - y) * (x - y)
        })
        .sum::<f64>()
        .sqrt()
}

/// Compute the cosine distance between two vectors.
///
/// Defined as 1 minus the cosine similarity; 1.0 when either vector has a
/// zero norm.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}

/// Compute the weighted shape distance between two records.
///
/// The distance is the weighted sum of the per-field Euclidean distances.
pub fn shape_distance(a: &ShapeFeatureRecord, b: &ShapeFeatureRecord, w: &ShapeWeights) -> f64 {
    let fourier = euclidean_distance(&a.fourier_descriptors, &b.fourier_descriptors);
    let direction = euclidean_distance(&a.direction_histogram, &b.direction_histogram);
    let hu = euclidean_distance(&a.hu_moments, &b.hu_moments);

    w.fourier * fourier + w.direction * direction + w.hu_moments * hu
}

/// Compute the weighted texture distance between two records.
///
/// Gabor, Tamura and co-occurrence components are rescaled by the empirical
/// /10, /5 and /2 constants before the weighted sum.
pub fn texture_distance(
    a: &TextureFeatureRecord,
    b: &TextureFeatureRecord,
    w: &TextureWeights,
) -> f64 {
    let gabor = euclidean_distance(&a.gabor_features, &b.gabor_features);

    let tamura_a = [a.tamura_coarseness, a.tamura_contrast, a.tamura_directionality];
    let tamura_b = [b.tamura_coarseness, b.tamura_contrast, b.tamura_directionality];
    let tamura = euclidean_distance(&tamura_a, &tamura_b);

    let direction = euclidean_distance(&a.direction_histogram, &b.direction_histogram);
    let glcm = euclidean_distance(&a.glcm_features, &b.glcm_features);

    w.gabor * (gabor / GABOR_SCALE)
        + w.tamura * (tamura / TAMURA_SCALE)
        + w.direction * direction
        + w.glcm * (glcm / GLCM_SCALE)
}

/// Derive the presentation similarity score of a distance.
///
/// Maps a distance to the [0, 100] range with `max(0, 100 - distance * k)`.
/// Presentation only; rankings always use the raw distance.
pub fn similarity_score(distance: f64, k: f64) -> f64 {
    (100.0 - distance * k).max(0.0)
}
