use cbir_image::{Image, ImageError};

/// Compute the 256 bin intensity histogram of an 8-bit single channel image.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram with 256 entries.
///
/// # Example
///
/// ```
/// use cbir_image::{Image, ImageSize};
/// use cbir_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 1,
///   },
///   vec![0, 128, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0usize; 256];
/// compute_histogram(&image, &mut histogram).unwrap();
/// assert_eq!(histogram[0], 1);
/// assert_eq!(histogram[128], 1);
/// assert_eq!(histogram[255], 1);
/// ```
pub fn compute_histogram(src: &Image<u8, 1>, hist: &mut [usize]) -> Result<(), ImageError> {
    if hist.len() != 256 {
        return Err(ImageError::InvalidChannelShape(hist.len(), 256));
    }

    for &px in src.as_slice() {
        hist[px as usize] += 1;
    }

    Ok(())
}
