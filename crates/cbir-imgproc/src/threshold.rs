use cbir_image::{Image, ImageError};

use crate::histogram::compute_histogram;

/// Compute the Otsu threshold of an 8-bit single channel image.
///
/// Exhaustively searches the threshold that maximizes the inter-class variance
/// of the foreground and background intensity distributions.
///
/// # Arguments
///
/// * `src` - The input image to compute the threshold for.
///
/// # Returns
///
/// The threshold value; 0 for an empty or constant image.
pub fn otsu_threshold(src: &Image<u8, 1>) -> Result<u8, ImageError> {
    let mut hist = vec![0usize; 256];
    compute_histogram(src, &mut hist)?;

    let total = src.numel() as f64;
    if total == 0.0 {
        return Ok(0);
    }

    let sum_all = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum::<f64>();

    let mut best_threshold = 0u8;
    let mut best_variance = 0.0f64;

    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }

        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }

        sum_bg += t as f64 * count as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let diff = mean_bg - mean_fg;
        let variance = weight_bg * weight_fg * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    Ok(best_threshold)
}

/// Apply an inverse binary threshold to an image.
///
/// Pixels less than or equal to the threshold become `max_value` and the rest
/// become zero, so dark foreground on a light background ends up bright.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `dst` - The output image with shape (H, W, 1).
/// * `threshold` - The threshold value.
/// * `max_value` - The value assigned to pixels at or below the threshold.
///
/// # Example
///
/// ```
/// use cbir_image::{Image, ImageSize};
/// use cbir_imgproc::threshold::threshold_binary_inverse;
///
/// let data = vec![100u8, 200, 50, 150, 200, 250];
/// let image = Image::<_, 1>::new(ImageSize { width: 2, height: 3 }, data).unwrap();
///
/// let mut thresholded = Image::<_, 1>::from_size_val(image.size(), 0).unwrap();
///
/// threshold_binary_inverse(&image, &mut thresholded, 100, 255).unwrap();
/// assert_eq!(thresholded.as_slice(), &[255, 0, 255, 0, 0, 0]);
/// ```
pub fn threshold_binary_inverse(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    threshold: u8,
    max_value: u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(&src_pixel, dst_pixel)| {
            *dst_pixel = if src_pixel > threshold { 0 } else { max_value };
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use cbir_image::{Image, ImageError, ImageSize};

    #[test]
    fn otsu_bimodal() -> Result<(), ImageError> {
        let mut data = vec![10u8; 32];
        data.extend(vec![200u8; 32]);
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;

        let threshold = super::otsu_threshold(&image)?;
        assert!(threshold >= 10 && threshold < 200);

        Ok(())
    }

    #[test]
    fn otsu_constant_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            42u8,
        )?;

        assert_eq!(super::otsu_threshold(&image)?, 0);

        Ok(())
    }

    #[test]
    fn binary_inverse() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 100, 150, 255],
        )?;

        let mut binary = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::threshold_binary_inverse(&image, &mut binary, 100, 255)?;
        assert_eq!(binary.as_slice(), &[255, 255, 0, 0]);

        Ok(())
    }
}
