use std::fs;
use std::path::Path;

use cbir_features::store::save_record;
use cbir_features::ShapeFeatureRecord;
use cbir_retrieval::{retrieve_similar_shapes, RetrievalError, ShapeWeights};

/// A record whose Fourier descriptors deviate from a perfect circle by a
/// controlled amount; a deviation of zero models the circle itself.
fn shape_record(name: &str, deviation: f64) -> ShapeFeatureRecord {
    let mut fourier = vec![0.0; 20];
    fourier[0] = 1.0;
    fourier[1] = deviation;

    ShapeFeatureRecord {
        image_name: name.to_owned(),
        fourier_descriptors: fourier,
        direction_histogram: vec![0.0; 36],
        hu_moments: vec![0.0; 7],
    }
}

/// A record extracted from an image without any contour: all defaults.
fn null_contour_record(name: &str) -> ShapeFeatureRecord {
    ShapeFeatureRecord {
        image_name: name.to_owned(),
        fourier_descriptors: vec![0.0; 20],
        direction_histogram: vec![0.0; 36],
        hu_moments: vec![0.0; 7],
    }
}

fn seed_corpus(feature_dir: &Path, image_dir: &Path, records: &[ShapeFeatureRecord]) {
    for record in records {
        save_record(record, feature_dir).unwrap();
        fs::write(image_dir.join(&record.image_name), b"").unwrap();
    }
}

#[test]
fn circle_query_ranks_polygons_by_dissimilarity() {
    let tmp = tempfile::tempdir().unwrap();
    let feature_dir = tmp.path().join("features");
    let image_dir = tmp.path().join("images");
    fs::create_dir_all(&feature_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    // one near-perfect circle, three irregular polygons, one polygon whose
    // binarization produced no contour at all
    let records = vec![
        shape_record("circle.gif", 0.0),
        shape_record("poly-a.gif", 0.1),
        shape_record("poly-b.gif", 0.4),
        shape_record("poly-c.gif", 0.2),
        null_contour_record("poly-null.gif"),
    ];
    seed_corpus(&feature_dir, &image_dir, &records);

    let results = retrieve_similar_shapes(
        "circle.gif",
        &feature_dir,
        &image_dir,
        6,
        &ShapeWeights::default(),
    )
    .unwrap();

    // the query itself is excluded even at zero self-distance
    assert!(results.iter().all(|r| r.image_name != "circle.gif"));
    assert_eq!(results.len(), 4);

    // polygons ordered by increasing Fourier dissimilarity, the record with
    // the absent contour is farthest from the circle
    let names: Vec<&str> = results.iter().map(|r| r.image_name.as_str()).collect();
    assert_eq!(names, vec!["poly-a.gif", "poly-c.gif", "poly-b.gif", "poly-null.gif"]);

    for pair in results.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn missing_query_record_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let feature_dir = tmp.path().join("features");
    let image_dir = tmp.path().join("images");
    fs::create_dir_all(&feature_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    seed_corpus(&feature_dir, &image_dir, &[shape_record("only.gif", 0.0)]);

    let result = retrieve_similar_shapes(
        "unknown.gif",
        &feature_dir,
        &image_dir,
        6,
        &ShapeWeights::default(),
    );

    match result {
        Err(RetrievalError::FeatureRecordNotFound(name)) => assert_eq!(name, "unknown.gif"),
        other => panic!("expected FeatureRecordNotFound, got {other:?}"),
    }
}

#[test]
fn top_k_truncates_and_small_corpus_returns_fewer() {
    let tmp = tempfile::tempdir().unwrap();
    let feature_dir = tmp.path().join("features");
    let image_dir = tmp.path().join("images");
    fs::create_dir_all(&feature_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    let records: Vec<ShapeFeatureRecord> = (0..5)
        .map(|i| shape_record(&format!("img-{i}.gif"), i as f64 * 0.1))
        .collect();
    seed_corpus(&feature_dir, &image_dir, &records);

    let weights = ShapeWeights::default();

    let top2 = retrieve_similar_shapes("img-0.gif", &feature_dir, &image_dir, 2, &weights).unwrap();
    assert_eq!(top2.len(), 2);

    // corpus minus query has four candidates, asking for more returns four
    let top10 =
        retrieve_similar_shapes("img-0.gif", &feature_dir, &image_dir, 10, &weights).unwrap();
    assert_eq!(top10.len(), 4);
}

#[test]
fn unresolved_image_names_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let feature_dir = tmp.path().join("features");
    let image_dir = tmp.path().join("images");
    fs::create_dir_all(&feature_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    seed_corpus(
        &feature_dir,
        &image_dir,
        &[shape_record("present.gif", 0.0), shape_record("query.gif", 0.1)],
    );
    // a record without a resolvable image file
    save_record(&shape_record("orphan.gif", 0.05), &feature_dir).unwrap();

    let results = retrieve_similar_shapes(
        "query.gif",
        &feature_dir,
        &image_dir,
        6,
        &ShapeWeights::default(),
    )
    .unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.image_name.as_str()).collect();
    assert_eq!(names, vec!["present.gif"]);
}

#[test]
fn ranking_is_invariant_to_insertion_order() {
    let tmp = tempfile::tempdir().unwrap();
    let feature_dir = tmp.path().join("features");
    let image_dir = tmp.path().join("images");
    fs::create_dir_all(&feature_dir).unwrap();
    fs::create_dir_all(&image_dir).unwrap();

    // write records in a scrambled order; the ranking only depends on the
    // persisted corpus contents
    let records = vec![
        shape_record("c.gif", 0.3),
        shape_record("a.gif", 0.1),
        shape_record("q.gif", 0.0),
        shape_record("b.gif", 0.2),
    ];
    seed_corpus(&feature_dir, &image_dir, &records);

    let results = retrieve_similar_shapes(
        "q.gif",
        &feature_dir,
        &image_dir,
        6,
        &ShapeWeights::default(),
    )
    .unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.image_name.as_str()).collect();
    assert_eq!(names, vec!["a.gif", "b.gif", "c.gif"]);
}
