use std::{fs, path::Path};

use cbir_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Decoder};

use crate::error::IoError;

/// Read a PNG image with three channels (rgb8).
///
/// Grayscale files are expanded to three channels. Palette, alpha and 16-bit
/// files are rejected here and expected to be handled by the fallback decoder.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path
        .extension()
        .map_or(true, |ext| !ext.eq_ignore_ascii_case("png"))
    {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    let mut reader = Decoder::new(file)
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "Unsupported bit depth: {:?}",
            info.bit_depth
        )));
    }

    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    buf.truncate(info.buffer_size());

    let rgb_data = match info.color_type {
        ColorType::Rgb => buf,
        ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v]).collect(),
        other => {
            return Err(IoError::PngDecodeError(format!(
                "Unsupported color type: {other:?}"
            )))
        }
    };

    Ok(Image::new(size, rgb_data)?)
}
