use cbir_image::{Image, ImageError};

const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Convert a RGB image to a grayscale image.
///
/// The conversion uses the ITU-R 601 luma transform:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// # Arguments
///
/// * `src` - The input RGB image with shape (H, W, 3).
/// * `dst` - The output grayscale image with shape (H, W, 1).
///
/// # Example
///
/// ```
/// use cbir_image::{Image, ImageSize};
/// use cbir_imgproc::color::gray_from_rgb;
///
/// let image = Image::<u8, 3>::new(
///   ImageSize {
///     width: 1,
///     height: 1,
///   },
///   vec![255, 255, 255],
/// ).unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255]);
/// ```
pub fn gray_from_rgb(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    src.as_slice()
        .chunks_exact(3)
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(rgb, gray)| {
            let y = RW * rgb[0] as f64 + GW * rgb[1] as f64 + BW * rgb[2] as f64;
            *gray = y.round().clamp(0.0, 255.0) as u8;
        });

    Ok(())
}
