use std::path::{Path, PathBuf};

use cbir_features::store::{load_all_records, load_record};
use cbir_features::{FeatureRecord, ShapeFeatureRecord, TextureFeatureRecord};

use crate::distance::{shape_distance, texture_distance, ShapeWeights, TextureWeights};
use crate::error::RetrievalError;

/// Extension priority of shape corpora, line art first.
pub const SHAPE_IMAGE_EXTENSIONS: [&str; 4] = ["gif", "png", "jpg", "jpeg"];

/// Extension priority of texture corpora, photographs first.
pub const TEXTURE_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Default number of results returned per query.
pub const DEFAULT_TOP_K: usize = 6;

/// One ranked retrieval result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    /// The corpus image file name, extension included.
    pub image_name: String,
    /// The weighted distance to the query record.
    pub distance: f64,
    /// The resolved path of the corpus image.
    pub image_path: PathBuf,
}

/// Resolve a record key to an image file by extension priority.
fn resolve_image_path(image_dir: &Path, stem: &str, extensions: &[&str]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| image_dir.join(format!("{stem}.{ext}")))
        .find(|path| path.exists())
}

/// The record key of a query name, the base name with the extension stripped.
fn query_stem(query_name: &str) -> String {
    Path::new(query_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| query_name.to_owned())
}

/// Exhaustively rank a corpus against a query record.
///
/// Deterministic given the corpus contents at call time: records are scanned
/// in name-sorted order, distances tie-break by that scan order, and the
/// query's own record is excluded from the results.
fn retrieve_impl<R, D>(
    query_name: &str,
    feature_dir: &Path,
    image_dir: &Path,
    top_k: usize,
    extensions: &[&str],
    distance: D,
) -> Result<Vec<RankedResult>, RetrievalError>
where
    R: FeatureRecord,
    D: Fn(&R, &R) -> f64,
{
    let query_record: R = load_record(feature_dir, query_name)?
        .ok_or_else(|| RetrievalError::FeatureRecordNotFound(query_name.to_owned()))?;

    let query_key = query_stem(query_name);

    let mut candidates: Vec<RankedResult> = load_all_records::<R>(feature_dir)?
        .into_iter()
        .filter_map(|(stem, record)| {
            let image_path = resolve_image_path(image_dir, &stem, extensions)?;
            let image_name = image_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(stem);
            Some(RankedResult {
                image_name,
                distance: distance(&query_record, &record),
                image_path,
            })
        })
        .collect();

    // stable, so equal distances keep the corpus scan order
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    Ok(candidates
        .into_iter()
        .filter(|result| query_stem(&result.image_name) != query_key)
        .take(top_k)
        .collect())
}

/// Retrieve the corpus images most similar in shape to a query image.
///
/// # Arguments
///
/// * `query_name` - The query image file name; its record must exist.
/// * `feature_dir` - The directory of persisted shape records.
/// * `image_dir` - The parallel directory of corpus images.
/// * `top_k` - The maximum number of results.
/// * `weights` - The distance component weights.
///
/// # Returns
///
/// Up to `top_k` results ordered by ascending distance, the query excluded.
/// A corpus with fewer eligible candidates returns fewer results.
///
/// # Errors
///
/// [`RetrievalError::FeatureRecordNotFound`] when the query has no record.
pub fn retrieve_similar_shapes(
    query_name: &str,
    feature_dir: impl AsRef<Path>,
    image_dir: impl AsRef<Path>,
    top_k: usize,
    weights: &ShapeWeights,
) -> Result<Vec<RankedResult>, RetrievalError> {
    retrieve_impl::<ShapeFeatureRecord, _>(
        query_name,
        feature_dir.as_ref(),
        image_dir.as_ref(),
        top_k,
        &SHAPE_IMAGE_EXTENSIONS,
        |a, b| shape_distance(a, b, weights),
    )
}

/// Retrieve the corpus images most similar in texture to a query image.
///
/// See [`retrieve_similar_shapes`] for the ranking contract.
pub fn retrieve_similar_textures(
    query_name: &str,
    feature_dir: impl AsRef<Path>,
    image_dir: impl AsRef<Path>,
    top_k: usize,
    weights: &TextureWeights,
) -> Result<Vec<RankedResult>, RetrievalError> {
    retrieve_impl::<TextureFeatureRecord, _>(
        query_name,
        feature_dir.as_ref(),
        image_dir.as_ref(),
        top_k,
        &TEXTURE_IMAGE_EXTENSIONS,
        |a, b| texture_distance(a, b, weights),
    )
}
