use std::path::{Path, PathBuf};

use cbir_features::store::save_record;
use cbir_features::{
    extract_shape_features, extract_texture_features, FeatureRecord, ShapeParams, TextureParams,
};
use rayon::prelude::*;

use crate::engine::{SHAPE_IMAGE_EXTENSIONS, TEXTURE_IMAGE_EXTENSIONS};
use crate::error::RetrievalError;

/// One failed item of a batch extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The image file name that failed.
    pub image_name: String,
    /// The rendered extraction error.
    pub reason: String,
}

/// Summary of a batch extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Number of images with a successfully persisted record.
    pub processed: usize,
    /// Number of supported images found in the directory.
    pub total: usize,
    /// The items that failed, in corpus scan order.
    pub failures: Vec<BatchFailure>,
}

/// Enumerate the supported images of a directory in name-sorted order.
fn list_images(image_dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, RetrievalError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(image_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| {
                    extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
                })
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Extract and persist one record per image, accumulating failures.
///
/// Per-image extraction is independent, so the images are processed in
/// parallel; each success writes its own record file. A failing item is
/// logged and reported but never aborts the batch.
fn extract_all_impl<R, F>(
    image_dir: &Path,
    feature_dir: &Path,
    extensions: &[&str],
    extract: F,
) -> Result<BatchReport, RetrievalError>
where
    R: FeatureRecord,
    F: Fn(&Path) -> Result<R, cbir_features::FeatureError> + Send + Sync,
{
    let paths = list_images(image_dir, extensions)?;
    let total = paths.len();
    log::info!("processing {} images from {}", total, image_dir.display());

    let outcomes: Vec<Result<(), BatchFailure>> = paths
        .par_iter()
        .map(|path| {
            let image_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            extract(path)
                .and_then(|record| save_record(&record, feature_dir).map(|_| ()))
                .map_err(|e| {
                    log::warn!("skipping {image_name}: {e}");
                    BatchFailure {
                        image_name,
                        reason: e.to_string(),
                    }
                })
        })
        .collect();

    let failures: Vec<BatchFailure> = outcomes.into_iter().filter_map(Result::err).collect();
    let report = BatchReport {
        processed: total - failures.len(),
        total,
        failures,
    };

    log::info!(
        "extracted {}/{} records into {}",
        report.processed,
        report.total,
        feature_dir.display()
    );

    Ok(report)
}

/// Extract shape records for every supported image of a directory.
///
/// # Arguments
///
/// * `image_dir` - The directory of corpus images.
/// * `feature_dir` - The output directory, one record file per image.
/// * `params` - The extraction configuration.
///
/// # Returns
///
/// A report with processed/total counts and the accumulated failures.
pub fn extract_all_shapes(
    image_dir: impl AsRef<Path>,
    feature_dir: impl AsRef<Path>,
    params: &ShapeParams,
) -> Result<BatchReport, RetrievalError> {
    extract_all_impl(
        image_dir.as_ref(),
        feature_dir.as_ref(),
        &SHAPE_IMAGE_EXTENSIONS,
        |path| extract_shape_features(path, params),
    )
}

/// Extract texture records for every supported image of a directory.
///
/// See [`extract_all_shapes`] for the batch contract.
pub fn extract_all_textures(
    image_dir: impl AsRef<Path>,
    feature_dir: impl AsRef<Path>,
    params: &TextureParams,
) -> Result<BatchReport, RetrievalError> {
    extract_all_impl(
        image_dir.as_ref(),
        feature_dir.as_ref(),
        &TEXTURE_IMAGE_EXTENSIONS,
        |path| extract_texture_features(path, params),
    )
}
