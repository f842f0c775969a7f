#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image and image size types.
pub mod image;

/// error types for the image module.
pub mod error;

/// scalar reductions over image buffers.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageDtype, ImageSize};
