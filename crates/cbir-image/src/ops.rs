use crate::{Image, ImageError};

/// Cast the pixel data of an image to a different type with a scale factor.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use cbir_image::{Image, ImageSize};
/// use cbir_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 2,
///     height: 1,
///   },
///   vec![0u8, 255],
/// ).unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get_pixel(0, 0, 0).unwrap(), &0.0f32);
/// assert_eq!(image_f32.get_pixel(1, 0, 0).unwrap(), &1.0f32);
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp).ok_or(ImageError::CastError)?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })?;

    Ok(())
}

/// Compute the mean and population standard deviation of a single channel image.
///
/// Accumulates in f64 to keep the statistics stable for large buffers.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
///
/// # Returns
///
/// A tuple with the mean and standard deviation; (0, 0) for an empty buffer.
pub fn mean_std<T>(src: &Image<T, 1>) -> (f64, f64)
where
    T: Copy + Into<f64>,
{
    if src.numel() == 0 {
        return (0.0, 0.0);
    }

    let n = src.numel() as f64;
    let mean = src.as_slice().iter().map(|&x| x.into()).sum::<f64>() / n;
    let var = src
        .as_slice()
        .iter()
        .map(|&x| {
            let d = x.into() - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageSize;

    #[test]
    fn test_cast_and_scale() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0u8, 255],
        )?;

        let mut image_f32 = Image::from_size_val(image.size(), 0.0f32)?;
        cast_and_scale(&image, &mut image_f32, 1. / 255.0)?;

        assert_eq!(image_f32.as_slice(), &[0.0, 1.0]);

        Ok(())
    }

    #[test]
    fn test_mean_std() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![1.0, 1.0, 3.0, 3.0],
        )?;

        let (mean, std) = mean_std(&image);
        assert_eq!(mean, 2.0);
        assert_eq!(std, 1.0);

        Ok(())
    }

    #[test]
    fn test_mean_std_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            7u8,
        )?;

        let (mean, std) = mean_std(&image);
        assert_eq!(mean, 7.0);
        assert_eq!(std, 0.0);

        Ok(())
    }
}
