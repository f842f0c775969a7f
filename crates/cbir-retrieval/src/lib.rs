#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// batch feature extraction over an image corpus.
pub mod batch;

/// weighted multi-component distances.
pub mod distance;

/// exhaustive corpus ranking.
pub mod engine;

/// error types for retrieval operations.
pub mod error;

pub use crate::batch::{extract_all_shapes, extract_all_textures, BatchFailure, BatchReport};
pub use crate::distance::{
    shape_distance, similarity_score, texture_distance, ShapeWeights, TextureWeights,
};
pub use crate::engine::{
    retrieve_similar_shapes, retrieve_similar_textures, RankedResult, DEFAULT_TOP_K,
};
pub use crate::error::RetrievalError;
