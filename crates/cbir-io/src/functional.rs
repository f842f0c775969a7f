use std::path::Path;

use cbir_image::{Image, ImageSize};

use crate::error::IoError;
use crate::{jpeg, png};

/// Reads an image from the given file path into a three channel (rgb8) image.
///
/// The method first tries the pure Rust decoder matching the file extension
/// (zune-jpeg for jpg/jpeg, the png crate for png). When the extension has no
/// dedicated decoder, or the dedicated decoder rejects the file, the image
/// crate is used as a fallback. This covers formats such as palette-indexed
/// animated GIF that the dedicated decoders do not handle.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
///
/// # Errors
///
/// [`IoError::UnsupportedImage`] when every decoder in the chain fails.
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let primary_err = match file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => match jpeg::read_image_jpeg_rgb8(file_path) {
            Ok(image) => return Ok(image),
            Err(e) => e,
        },
        Some("png") => match png::read_image_png_rgb8(file_path) {
            Ok(image) => return Ok(image),
            Err(e) => e,
        },
        _ => IoError::InvalidFileExtension(file_path.to_path_buf()),
    };

    read_image_any_rgb8(file_path).map_err(|fallback_err| {
        IoError::UnsupportedImage(
            file_path.to_path_buf(),
            format!("primary: {primary_err}; fallback: {fallback_err}"),
        )
    })
}

/// Reads an image from the given file path using the image crate.
///
/// Decodes any format supported by the image crate and converts the pixel data
/// to three channels (rgb8), flattening palette and alpha representations.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}
