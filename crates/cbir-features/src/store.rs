use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FeatureError;
use crate::records::FeatureRecord;

/// The path of the record file of an image inside a feature directory.
///
/// Records are keyed by the image base name with the extension stripped,
/// so `apple-1.gif` maps to `<dir>/apple-1.json`.
pub fn record_path(feature_dir: impl AsRef<Path>, image_name: &str) -> PathBuf {
    let stem = Path::new(image_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| image_name.to_owned());
    feature_dir.as_ref().join(format!("{stem}.json"))
}

/// Persist a feature record as one JSON file per image.
///
/// The wire shape is a flat mapping of field name to scalar or list of
/// numbers; vectors round-trip exactly to floating point precision.
///
/// # Arguments
///
/// * `record` - The record to persist.
/// * `feature_dir` - The directory holding the corpus records.
pub fn save_record<R: FeatureRecord>(
    record: &R,
    feature_dir: impl AsRef<Path>,
) -> Result<PathBuf, FeatureError> {
    let feature_dir = feature_dir.as_ref();
    fs::create_dir_all(feature_dir)?;

    let path = record_path(feature_dir, record.image_name());
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json)?;

    Ok(path)
}

/// Load one feature record by image name.
///
/// # Returns
///
/// `None` when the record file does not exist.
pub fn load_record<R: FeatureRecord>(
    feature_dir: impl AsRef<Path>,
    image_name: &str,
) -> Result<Option<R>, FeatureError> {
    let path = record_path(feature_dir, image_name);
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Load every feature record of a corpus directory.
///
/// Scans `*.json` files in name-sorted order, which defines the corpus scan
/// order used for distance tie-breaks.
///
/// # Returns
///
/// Pairs of record key (file stem) and record.
pub fn load_all_records<R: FeatureRecord>(
    feature_dir: impl AsRef<Path>,
) -> Result<Vec<(String, R)>, FeatureError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(feature_dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let json = fs::read_to_string(&path)?;
        records.push((stem, serde_json::from_str(&json)?));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ShapeFeatureRecord, TextureFeatureRecord};

    fn sample_shape_record(name: &str) -> ShapeFeatureRecord {
        ShapeFeatureRecord {
            image_name: name.to_owned(),
            fourier_descriptors: (0..20).map(|i| i as f64 * 0.137).collect(),
            direction_histogram: vec![1.0 / 36.0; 36],
            hu_moments: vec![-2.3, -7.1, -11.9, -13.0, -23.0, -17.0, -23.0],
        }
    }

    #[test]
    fn record_path_strips_extension() {
        let path = record_path("/tmp/features", "apple-1.gif");
        assert_eq!(path, PathBuf::from("/tmp/features/apple-1.json"));
    }

    #[test]
    fn shape_round_trip() -> Result<(), FeatureError> {
        let tmp = tempfile::tempdir()?;
        let record = sample_shape_record("apple-1.gif");

        save_record(&record, tmp.path())?;
        let loaded: ShapeFeatureRecord = load_record(tmp.path(), "apple-1.gif")?.expect("record");

        assert_eq!(loaded.image_name, record.image_name);
        for (a, b) in loaded
            .fourier_descriptors
            .iter()
            .zip(record.fourier_descriptors.iter())
        {
            assert!((a - b).abs() < 1e-9);
        }
        for (a, b) in loaded.hu_moments.iter().zip(record.hu_moments.iter()) {
            assert!((a - b).abs() < 1e-9);
        }

        Ok(())
    }

    #[test]
    fn texture_round_trip() -> Result<(), FeatureError> {
        let tmp = tempfile::tempdir()?;
        let record = TextureFeatureRecord {
            image_name: "Im01.jpg".to_owned(),
            gabor_features: (0..64).map(|i| i as f64 * 1.7).collect(),
            tamura_coarseness: 3.25,
            tamura_contrast: 41.0,
            tamura_directionality: 0.01,
            direction_histogram: vec![1.0 / 16.0; 16],
            glcm_features: (0..10).map(|i| i as f64).collect(),
        };

        save_record(&record, tmp.path())?;
        let loaded: TextureFeatureRecord = load_record(tmp.path(), "Im01.jpg")?.expect("record");
        assert_eq!(loaded, record);

        Ok(())
    }

    #[test]
    fn load_missing_record_is_none() -> Result<(), FeatureError> {
        let tmp = tempfile::tempdir()?;
        let loaded: Option<ShapeFeatureRecord> = load_record(tmp.path(), "missing.gif")?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[test]
    fn load_all_is_name_sorted() -> Result<(), FeatureError> {
        let tmp = tempfile::tempdir()?;
        for name in ["b.gif", "a.gif", "c.gif"] {
            save_record(&sample_shape_record(name), tmp.path())?;
        }

        let records: Vec<(String, ShapeFeatureRecord)> = load_all_records(tmp.path())?;
        let keys: Vec<&str> = records.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);

        Ok(())
    }
}
