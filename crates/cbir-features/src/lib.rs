#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for feature extraction and persistence.
pub mod error;

/// persisted feature record types.
pub mod records;

/// contour based shape descriptors.
pub mod shape;

/// feature record persistence.
pub mod store;

/// Gabor, Tamura and co-occurrence texture descriptors.
pub mod texture;

pub use crate::error::FeatureError;
pub use crate::records::{FeatureRecord, ShapeFeatureRecord, TextureFeatureRecord};
pub use crate::shape::{extract_shape_features, ShapeParams};
pub use crate::texture::{extract_texture_features, TextureParams};
