use std::{fs, path::Path};

use cbir_image::{Image, ImageSize};
use zune_jpeg::zune_core::colorspace::ColorSpace;
use zune_jpeg::zune_core::options::DecoderOptions;

use crate::error::IoError;

/// Read a JPEG image with three channels (rgb8).
///
/// Uses the pure Rust zune-jpeg decoder and forces the output colorspace to RGB,
/// so grayscale files decode to three channels as well.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_jpeg_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("jpg") && !ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let jpeg_data = fs::read(file_path)?;
    decode_image_jpeg_rgb8(&jpeg_data)
}

/// Decodes a JPEG image with three channels (rgb8) from raw bytes.
///
/// # Arguments
///
/// * `src` - Raw bytes of the jpeg file.
pub fn decode_image_jpeg_rgb8(src: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = zune_jpeg::JpegDecoder::new_with_options(src, options);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    Ok(Image::new(image_size, img_data)?)
}
