#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// contour extraction module.
pub mod contours;

/// image filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// utility functions for resizing images.
pub mod resize;

/// operations to threshold images.
pub mod threshold;
