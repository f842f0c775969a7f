use std::path::PathBuf;

use argh::FromArgs;

use cbir::features::{ShapeParams, TextureParams};
use cbir::retrieval::distance::{SHAPE_SIMILARITY_K, TEXTURE_SIMILARITY_K};
use cbir::retrieval::{
    extract_all_shapes, extract_all_textures, retrieve_similar_shapes, retrieve_similar_textures,
    BatchReport, RankedResult, ShapeWeights, TextureWeights, DEFAULT_TOP_K,
};

#[derive(FromArgs)]
/// Extract shape and texture signatures from an image corpus and query it
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    ExtractShape(ExtractShapeArgs),
    ExtractTexture(ExtractTextureArgs),
    SearchShape(SearchShapeArgs),
    SearchTexture(SearchTextureArgs),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "extract-shape")]
/// Extract and persist shape records for every image of a directory
struct ExtractShapeArgs {
    /// directory of corpus images
    #[argh(option, short = 'i')]
    image_dir: PathBuf,

    /// output directory for the feature records
    #[argh(option, short = 'f')]
    feature_dir: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "extract-texture")]
/// Extract and persist texture records for every image of a directory
struct ExtractTextureArgs {
    /// directory of corpus images
    #[argh(option, short = 'i')]
    image_dir: PathBuf,

    /// output directory for the feature records
    #[argh(option, short = 'f')]
    feature_dir: PathBuf,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "search-shape")]
/// Rank the corpus against a query image by shape similarity
struct SearchShapeArgs {
    /// query image file name, its record must already exist
    #[argh(option, short = 'q')]
    query: String,

    /// directory of persisted feature records
    #[argh(option, short = 'f')]
    feature_dir: PathBuf,

    /// directory of corpus images
    #[argh(option, short = 'i')]
    image_dir: PathBuf,

    /// maximum number of results (default: 6)
    #[argh(option, short = 'k', default = "DEFAULT_TOP_K")]
    top_k: usize,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "search-texture")]
/// Rank the corpus against a query image by texture similarity
struct SearchTextureArgs {
    /// query image file name, its record must already exist
    #[argh(option, short = 'q')]
    query: String,

    /// directory of persisted feature records
    #[argh(option, short = 'f')]
    feature_dir: PathBuf,

    /// directory of corpus images
    #[argh(option, short = 'i')]
    image_dir: PathBuf,

    /// maximum number of results (default: 6)
    #[argh(option, short = 'k', default = "DEFAULT_TOP_K")]
    top_k: usize,
}

fn print_report(report: &BatchReport) {
    println!("processed {}/{} images", report.processed, report.total);
    for failure in &report.failures {
        println!("  skipped {}: {}", failure.image_name, failure.reason);
    }
}

fn print_results(results: &[RankedResult], similarity_k: f64) {
    if results.is_empty() {
        println!("no results");
        return;
    }
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>2}. {:<24} distance {:.4}  similarity {:.1}",
            rank + 1,
            result.image_name,
            result.distance,
            cbir::retrieval::similarity_score(result.distance, similarity_k),
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    match args.command {
        Command::ExtractShape(cmd) => {
            let report =
                extract_all_shapes(&cmd.image_dir, &cmd.feature_dir, &ShapeParams::default())?;
            print_report(&report);
        }
        Command::ExtractTexture(cmd) => {
            let report =
                extract_all_textures(&cmd.image_dir, &cmd.feature_dir, &TextureParams::default())?;
            print_report(&report);
        }
        Command::SearchShape(cmd) => {
            let results = retrieve_similar_shapes(
                &cmd.query,
                &cmd.feature_dir,
                &cmd.image_dir,
                cmd.top_k,
                &ShapeWeights::default(),
            )?;
            print_results(&results, SHAPE_SIMILARITY_K);
        }
        Command::SearchTexture(cmd) => {
            let results = retrieve_similar_textures(
                &cmd.query,
                &cmd.feature_dir,
                &cmd.image_dir,
                cmd.top_k,
                &TextureWeights::default(),
            )?;
            print_results(&results, TEXTURE_SIMILARITY_K);
        }
    }

    Ok(())
}
