use cbir_image::{Image, ImageDtype, ImageError};

/// Resize a single channel image to a new size with bilinear interpolation.
///
/// Source coordinates are spread so the corner pixels of the input and the
/// output coincide.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container with the target size.
///
/// # Example
///
/// ```
/// use cbir_image::{Image, ImageSize};
/// use cbir_imgproc::resize::resize_bilinear;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 4,
///     },
///     vec![128u8; 4 * 4],
/// )
/// .unwrap();
///
/// let mut resized = Image::<u8, 1>::from_size_val(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     0,
/// )
/// .unwrap();
///
/// resize_bilinear(&image, &mut resized).unwrap();
/// assert_eq!(resized.as_slice(), &[128, 128, 128, 128]);
/// ```
pub fn resize_bilinear<T>(src: &Image<T, 1>, dst: &mut Image<T, 1>) -> Result<(), ImageError>
where
    T: ImageDtype,
{
    if src.numel() == 0 || dst.numel() == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (src_w, src_h) = (src.width(), src.height());
    let (dst_w, dst_h) = (dst.width(), dst.height());

    let scale_x = if dst_w > 1 {
        (src_w - 1) as f32 / (dst_w - 1) as f32
    } else {
        0.0
    };
    let scale_y = if dst_h > 1 {
        (src_h - 1) as f32 / (dst_h - 1) as f32
    } else {
        0.0
    };

    let src_data = src.as_slice();

    for y in 0..dst_h {
        let fy = y as f32 * scale_y;
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let wy = fy - y0 as f32;

        for x in 0..dst_w {
            let fx = x as f32 * scale_x;
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            let wx = fx - x0 as f32;

            let p00: f32 = src_data[y0 * src_w + x0].into();
            let p01: f32 = src_data[y0 * src_w + x1].into();
            let p10: f32 = src_data[y1 * src_w + x0].into();
            let p11: f32 = src_data[y1 * src_w + x1].into();

            let top = p00 + (p01 - p00) * wx;
            let bottom = p10 + (p11 - p10) * wx;
            let value = top + (bottom - top) * wy;

            dst.as_slice_mut()[y * dst_w + x] = T::from_f32(value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbir_image::{ImageError, ImageSize};

    #[test]
    fn upscale_gradient() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0.0, 10.0],
        )?;

        let mut resized = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 3,
                height: 1,
            },
            0.0,
        )?;

        resize_bilinear(&image, &mut resized)?;
        assert_eq!(resized.as_slice(), &[0.0, 5.0, 10.0]);

        Ok(())
    }

    #[test]
    fn downscale_constant() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 17,
                height: 13,
            },
            200u8,
        )?;

        let mut resized = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            0,
        )?;

        resize_bilinear(&image, &mut resized)?;
        assert!(resized.as_slice().iter().all(|&v| v == 200));

        Ok(())
    }
}
