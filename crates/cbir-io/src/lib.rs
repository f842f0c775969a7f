#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading with a fallback decoder chain.
pub mod functional;

/// JPEG image decoding.
pub mod jpeg;

/// PNG image decoding.
pub mod png;

pub use crate::error::IoError;
pub use crate::functional::{read_image_any_rgb8, read_image_rgb8};
