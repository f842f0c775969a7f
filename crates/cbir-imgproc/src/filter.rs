use cbir_image::{Image, ImageError};
use rayon::prelude::*;

/// Create a 2D Gabor kernel.
///
/// The kernel follows the classical parametrization of a complex sinusoid
/// modulated by a rotated anisotropic Gaussian envelope. Only the real part
/// is generated and the kernel is not normalized.
///
/// # Arguments
///
/// * `ksize` - The side length of the square kernel, expected odd.
/// * `sigma` - The standard deviation of the Gaussian envelope.
/// * `theta` - The orientation of the filter in radians.
/// * `lambda` - The wavelength of the sinusoid in pixels.
/// * `gamma` - The spatial aspect ratio of the envelope.
/// * `psi` - The phase offset of the sinusoid in radians.
///
/// # Returns
///
/// A row-major kernel with `ksize * ksize` coefficients.
pub fn gabor_kernel_2d(
    ksize: usize,
    sigma: f32,
    theta: f32,
    lambda: f32,
    gamma: f32,
    psi: f32,
) -> Vec<f32> {
    let half = (ksize / 2) as i64;
    let sigma_x = sigma;
    let sigma_y = sigma / gamma;

    let ex = -0.5 / (sigma_x * sigma_x);
    let ey = -0.5 / (sigma_y * sigma_y);
    let cpsi = 2.0 * std::f32::consts::PI / lambda;

    let (sin_t, cos_t) = theta.sin_cos();

    let mut kernel = Vec::with_capacity(ksize * ksize);
    for y in -half..=half {
        for x in -half..=half {
            let xr = x as f32 * cos_t + y as f32 * sin_t;
            let yr = -(x as f32) * sin_t + y as f32 * cos_t;
            kernel.push((ex * xr * xr + ey * yr * yr).exp() * (cpsi * xr + psi).cos());
        }
    }

    kernel
}

/// The full 3x3 Sobel kernels for horizontal and vertical gradients.
///
/// # Returns
///
/// A tuple with the row-major (x, y) gradient kernels.
pub fn sobel_kernel_3x3() -> ([f32; 9], [f32; 9]) {
    (
        [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
    )
}

/// Reflect an out of bounds coordinate without repeating the border pixel.
///
/// For a length of 8 the left extension reads `... 2 1 | 0 1 2 ...`.
fn reflect_101(p: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut q = p % period;
    if q < 0 {
        q += period;
    }
    if q >= len {
        q = period - q;
    }
    q as usize
}

/// Apply a dense 2D filter to a single channel image.
///
/// Computes the cross correlation of the image with the kernel, reflecting
/// the image at the borders without repeating the edge pixel.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `dst` - The output image with shape (H, W, 1).
/// * `kernel` - The row-major kernel coefficients.
/// * `kernel_size` - The (rows, cols) shape of the kernel, both expected odd.
pub fn filter_2d(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: &[f32],
    kernel_size: (usize, usize),
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (krows, kcols) = kernel_size;
    if kernel.len() != krows * kcols {
        return Err(ImageError::InvalidChannelShape(kernel.len(), krows * kcols));
    }

    let (width, height) = (src.width(), src.height());
    let half_row = (krows / 2) as i64;
    let half_col = (kcols / 2) as i64;
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (x, dst_px) in dst_row.iter_mut().enumerate() {
                let mut sum = 0.0f32;
                for ky in 0..krows {
                    let sy = reflect_101(y as i64 + ky as i64 - half_row, height as i64);
                    let row_offset = sy * width;
                    let kernel_offset = ky * kcols;
                    for kx in 0..kcols {
                        let sx = reflect_101(x as i64 + kx as i64 - half_col, width as i64);
                        sum += src_data[row_offset + sx] * kernel[kernel_offset + kx];
                    }
                }
                *dst_px = sum;
            }
        });

    Ok(())
}

/// Compute the horizontal and vertical Sobel gradients of an image.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `gx` - The output horizontal gradient with shape (H, W, 1).
/// * `gy` - The output vertical gradient with shape (H, W, 1).
pub fn spatial_gradient(
    src: &Image<f32, 1>,
    gx: &mut Image<f32, 1>,
    gy: &mut Image<f32, 1>,
) -> Result<(), ImageError> {
    let (kernel_x, kernel_y) = sobel_kernel_3x3();
    filter_2d(src, gx, &kernel_x, (3, 3))?;
    filter_2d(src, gy, &kernel_y, (3, 3))?;
    Ok(())
}
