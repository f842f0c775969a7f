use std::path::Path;

use cbir_image::{ops::mean_std, Image, ImageSize};
use cbir_imgproc::color::gray_from_rgb;
use cbir_imgproc::filter::{filter_2d, gabor_kernel_2d, spatial_gradient};
use cbir_imgproc::resize::resize_bilinear;

use crate::error::FeatureError;
use crate::records::TextureFeatureRecord;

/// Default number of Gabor filter scales.
pub const DEFAULT_NUM_SCALES: usize = 4;

/// Default number of Gabor filter orientations.
pub const DEFAULT_NUM_ORIENTATIONS: usize = 8;

/// Default number of coarseness window doublings.
pub const DEFAULT_COARSENESS_KMAX: usize = 5;

/// Default number of bins of the edge orientation histogram.
pub const DEFAULT_DIRECTIONALITY_BINS: usize = 16;

/// Side length all images are resized to before texture analysis, so the
/// descriptors are comparable across native image sizes.
pub const CANONICAL_SIZE: usize = 256;

/// Side length of the Gabor kernels.
const GABOR_KSIZE: usize = 21;

/// Number of gray levels of the co-occurrence matrices.
const GLCM_LEVELS: usize = 16;

/// Pixel distances of the co-occurrence offsets.
const GLCM_DISTANCES: [usize; 3] = [1, 3, 5];

/// Offset angles of the co-occurrence matrices in radians.
const GLCM_ANGLES: [f64; 4] = [
    0.0,
    std::f64::consts::FRAC_PI_4,
    std::f64::consts::FRAC_PI_2,
    3.0 * std::f64::consts::FRAC_PI_4,
];

/// Configuration of the texture feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Number of Gabor scales, with the wavelength doubling per scale.
    pub num_scales: usize,
    /// Number of Gabor orientations, evenly spaced over [0, pi).
    pub num_orientations: usize,
    /// Number of coarseness window doublings.
    pub coarseness_kmax: usize,
    /// Number of bins of the edge orientation histogram.
    pub directionality_bins: usize,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            num_scales: DEFAULT_NUM_SCALES,
            num_orientations: DEFAULT_NUM_ORIENTATIONS,
            coarseness_kmax: DEFAULT_COARSENESS_KMAX,
            directionality_bins: DEFAULT_DIRECTIONALITY_BINS,
        }
    }
}

/// Compute the Gabor bank statistics of an image.
///
/// For every scale and orientation the image is convolved with a 21x21 Gabor
/// kernel (sigma 3.0, aspect 0.5, zero phase, wavelength 2^(scale + 2)) and
/// the mean and standard deviation of the response are recorded, scale-major
/// and orientation-minor.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `num_scales` - Number of wavelength doublings.
/// * `num_orientations` - Number of orientations over [0, pi).
///
/// # Returns
///
/// `2 * num_scales * num_orientations` values.
pub fn gabor_bank(
    src: &Image<f32, 1>,
    num_scales: usize,
    num_orientations: usize,
) -> Result<Vec<f64>, FeatureError> {
    let mut features = Vec::with_capacity(2 * num_scales * num_orientations);
    let mut response = Image::from_size_val(src.size(), 0.0f32)?;

    for scale in 0..num_scales {
        let lambda = 2.0f32.powi(scale as i32 + 2);

        for orientation in 0..num_orientations {
            let theta = orientation as f32 * std::f32::consts::PI / num_orientations as f32;
            let kernel = gabor_kernel_2d(GABOR_KSIZE, 3.0, theta, lambda, 0.5, 0.0);

            filter_2d(src, &mut response, &kernel, (GABOR_KSIZE, GABOR_KSIZE))?;

            let (mean, std) = mean_std(&response);
            features.push(mean);
            features.push(std);
        }
    }

    Ok(features)
}

/// Compute the Tamura coarseness of an image.
///
/// Block averages are computed at window sizes 2^k for k in 0..k_max; the
/// per-pixel optimal scale is the first maximum of the absolute differences
/// between successive averages, and coarseness is the mean of 2^best over
/// all pixels.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `k_max` - Number of window doublings, at least 2.
pub fn tamura_coarseness(src: &Image<f32, 1>, k_max: usize) -> f64 {
    let (width, height) = (src.width(), src.height());
    if width == 0 || height == 0 || k_max < 2 {
        return 0.0;
    }

    // summed-area table with one extra row and column of zeros
    let mut integral = vec![0.0f64; (width + 1) * (height + 1)];
    let data = src.as_slice();
    for y in 0..height {
        let mut row_sum = 0.0f64;
        for x in 0..width {
            row_sum += data[y * width + x] as f64;
            integral[(y + 1) * (width + 1) + (x + 1)] =
                integral[y * (width + 1) + (x + 1)] + row_sum;
        }
    }

    let window_average = |x: usize, y: usize, window: usize| -> f64 {
        let lo = (window / 2) as i64;
        let x0 = (x as i64 - lo).max(0) as usize;
        let y0 = (y as i64 - lo).max(0) as usize;
        let x1 = (x as i64 - lo + window as i64).min(width as i64) as usize;
        let y1 = (y as i64 - lo + window as i64).min(height as i64) as usize;

        let w1 = width + 1;
        let sum = integral[y1 * w1 + x1] - integral[y0 * w1 + x1] - integral[y1 * w1 + x0]
            + integral[y0 * w1 + x0];
        sum / ((x1 - x0) * (y1 - y0)) as f64
    };

    let mut averages: Vec<Vec<f64>> = Vec::with_capacity(k_max);
    for k in 0..k_max {
        let window = 1usize << k;
        let mut level = vec![0.0f64; width * height];
        for y in 0..height {
            for x in 0..width {
                level[y * width + x] = window_average(x, y, window);
            }
        }
        averages.push(level);
    }

    let mut sum_best = 0.0f64;
    for idx in 0..width * height {
        let mut best_k = 0usize;
        let mut best_diff = f64::NEG_INFINITY;
        for k in 0..k_max - 1 {
            let diff = (averages[k][idx] - averages[k + 1][idx]).abs();
            if diff > best_diff {
                best_diff = diff;
                best_k = k;
            }
        }
        sum_best += (1u64 << best_k) as f64;
    }

    sum_best / (width * height) as f64
}

/// Compute the Tamura contrast of an image.
///
/// Defined as sigma / alpha4^(1/4) with alpha4 the kurtosis; 0 for a constant
/// intensity image.
pub fn tamura_contrast(src: &Image<f32, 1>) -> f64 {
    let (mean, std) = mean_std(src);
    let variance = std * std;
    if variance == 0.0 {
        return 0.0;
    }

    let n = src.numel() as f64;
    let mu4 = src
        .as_slice()
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d * d * d
        })
        .sum::<f64>()
        / n;

    let alpha4 = mu4 / (variance * variance);
    if alpha4 > 0.0 {
        std / alpha4.powf(0.25)
    } else {
        0.0
    }
}

/// Compute the Tamura directionality of an image.
///
/// Sobel gradients give per-pixel magnitude and orientation; pixels whose
/// magnitude exceeds the mean magnitude contribute to an orientation
/// histogram over [0, 180), and the score is the squared deviation of that
/// histogram from the uniform distribution.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, 1).
/// * `num_bins` - The number of orientation bins.
///
/// # Returns
///
/// The normalized orientation histogram and the directionality score.
pub fn tamura_directionality(
    src: &Image<f32, 1>,
    num_bins: usize,
) -> Result<(Vec<f64>, f64), FeatureError> {
    let mut gx = Image::from_size_val(src.size(), 0.0f32)?;
    let mut gy = Image::from_size_val(src.size(), 0.0f32)?;
    spatial_gradient(src, &mut gx, &mut gy)?;

    let magnitudes: Vec<f64> = gx
        .as_slice()
        .iter()
        .zip(gy.as_slice().iter())
        .map(|(&x, &y)| ((x * x + y * y) as f64).sqrt())
        .collect();

    let threshold = magnitudes.iter().sum::<f64>() / magnitudes.len().max(1) as f64;

    let mut histogram = vec![0.0f64; num_bins];
    let bin_width = 180.0 / num_bins as f64;

    for ((&x, &y), &mag) in gx
        .as_slice()
        .iter()
        .zip(gy.as_slice().iter())
        .zip(magnitudes.iter())
    {
        if mag <= threshold {
            continue;
        }
        let angle = (y as f64).atan2(x as f64).to_degrees();
        let wrapped = (angle + 180.0).rem_euclid(180.0);
        let bin = ((wrapped / bin_width) as usize).min(num_bins - 1);
        histogram[bin] += 1.0;
    }

    let total: f64 = histogram.iter().sum();
    if total > 0.0 {
        histogram.iter_mut().for_each(|h| *h /= total);
    }

    let uniform = 1.0 / num_bins as f64;
    let directionality = histogram.iter().map(|h| (h - uniform).powi(2)).sum();

    Ok((histogram, directionality))
}

/// Accumulate one symmetric normalized co-occurrence matrix.
fn glcm_matrix(quantized: &[usize], width: usize, height: usize, dr: i64, dc: i64) -> Vec<f64> {
    let mut matrix = vec![0.0f64; GLCM_LEVELS * GLCM_LEVELS];

    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let (ny, nx) = (y + dr, x + dc);
            if ny < 0 || ny >= height as i64 || nx < 0 || nx >= width as i64 {
                continue;
            }
            let a = quantized[y as usize * width + x as usize];
            let b = quantized[ny as usize * width + nx as usize];
            matrix[a * GLCM_LEVELS + b] += 1.0;
            // symmetric counterpart
            matrix[b * GLCM_LEVELS + a] += 1.0;
        }
    }

    let total: f64 = matrix.iter().sum();
    if total > 0.0 {
        matrix.iter_mut().for_each(|v| *v /= total);
    }

    matrix
}

/// The five scalar properties of one normalized co-occurrence matrix:
/// contrast, dissimilarity, homogeneity, energy and correlation.
fn glcm_properties(matrix: &[f64]) -> [f64; 5] {
    let mut contrast = 0.0;
    let mut dissimilarity = 0.0;
    let mut homogeneity = 0.0;
    let mut asm = 0.0;

    let mut mean_i = 0.0;
    let mut mean_j = 0.0;

    for i in 0..GLCM_LEVELS {
        for j in 0..GLCM_LEVELS {
            let p = matrix[i * GLCM_LEVELS + j];
            let d = i as f64 - j as f64;
            contrast += p * d * d;
            dissimilarity += p * d.abs();
            homogeneity += p / (1.0 + d * d);
            asm += p * p;
            mean_i += i as f64 * p;
            mean_j += j as f64 * p;
        }
    }

    let mut var_i = 0.0;
    let mut var_j = 0.0;
    let mut cov = 0.0;
    for i in 0..GLCM_LEVELS {
        for j in 0..GLCM_LEVELS {
            let p = matrix[i * GLCM_LEVELS + j];
            var_i += p * (i as f64 - mean_i).powi(2);
            var_j += p * (j as f64 - mean_j).powi(2);
            cov += p * (i as f64 - mean_i) * (j as f64 - mean_j);
        }
    }

    // a flat marginal makes correlation degenerate, defined as 1
    let denom = (var_i * var_j).sqrt();
    let correlation = if denom < 1e-15 { 1.0 } else { cov / denom };

    [contrast, dissimilarity, homogeneity, asm.sqrt(), correlation]
}

/// Compute the co-occurrence statistics of an 8-bit image.
///
/// The image is quantized to 16 gray levels and symmetric normalized
/// co-occurrence matrices are built over distances {1, 3, 5} and angles
/// {0, 45, 90, 135} degrees. For each of the five properties the mean and
/// standard deviation across all matrices are reported.
///
/// # Returns
///
/// Exactly 10 values, property-major: (mean, std) of contrast,
/// dissimilarity, homogeneity, energy, correlation.
pub fn glcm_features(src: &Image<u8, 1>) -> Vec<f64> {
    let (width, height) = (src.width(), src.height());
    let quantized: Vec<usize> = src.as_slice().iter().map(|&v| (v / 16) as usize).collect();

    let mut per_property: [Vec<f64>; 5] = Default::default();

    for &distance in GLCM_DISTANCES.iter() {
        for &angle in GLCM_ANGLES.iter() {
            let dr = (angle.sin() * distance as f64).round() as i64;
            let dc = (angle.cos() * distance as f64).round() as i64;

            let matrix = glcm_matrix(&quantized, width, height, dr, dc);
            let props = glcm_properties(&matrix);
            for (acc, &value) in per_property.iter_mut().zip(props.iter()) {
                acc.push(value);
            }
        }
    }

    let mut features = Vec::with_capacity(10);
    for values in per_property.iter() {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        features.push(mean);
        features.push(var.sqrt());
    }

    features
}

/// Extract the texture feature record of an image file.
///
/// The grayscale image is resized to the canonical 256x256 resolution and
/// run through the Gabor bank, the Tamura triad and the co-occurrence
/// statistics.
///
/// # Arguments
///
/// * `image_path` - The path to the source image.
/// * `params` - The extraction configuration.
pub fn extract_texture_features(
    image_path: impl AsRef<Path>,
    params: &TextureParams,
) -> Result<TextureFeatureRecord, FeatureError> {
    let image_path = image_path.as_ref();
    let rgb = cbir_io::read_image_rgb8(image_path)?;

    let mut gray = Image::from_size_val(rgb.size(), 0u8)?;
    gray_from_rgb(&rgb, &mut gray)?;

    let mut resized = Image::from_size_val(
        ImageSize {
            width: CANONICAL_SIZE,
            height: CANONICAL_SIZE,
        },
        0u8,
    )?;
    resize_bilinear(&gray, &mut resized)?;

    let gray_f32 = resized.cast::<f32>()?;

    let gabor = gabor_bank(&gray_f32, params.num_scales, params.num_orientations)?;
    let coarseness = tamura_coarseness(&gray_f32, params.coarseness_kmax);
    let contrast = tamura_contrast(&gray_f32);
    let (direction_histogram, directionality) =
        tamura_directionality(&gray_f32, params.directionality_bins)?;
    let glcm = glcm_features(&resized);

    let image_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::debug!("{image_name}: coarseness {coarseness:.3}, contrast {contrast:.3}");

    Ok(TextureFeatureRecord {
        image_name,
        gabor_features: gabor,
        tamura_coarseness: coarseness,
        tamura_contrast: contrast,
        tamura_directionality: directionality,
        direction_histogram,
        glcm_features: glcm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbir_image::ImageSize;

    fn constant_image(value: f32) -> Image<f32, 1> {
        Image::from_size_val(
            ImageSize {
                width: 32,
                height: 32,
            },
            value,
        )
        .unwrap()
    }

    fn checkerboard(cell: usize, size: usize) -> Image<u8, 1> {
        let mut data = vec![0u8; size * size];
        for y in 0..size {
            for x in 0..size {
                if ((x / cell) + (y / cell)) % 2 == 0 {
                    data[y * size + x] = 255;
                }
            }
        }
        Image::new(
            ImageSize {
                width: size,
                height: size,
            },
            data,
        )
        .unwrap()
    }

    #[test]
    fn gabor_bank_length() -> Result<(), FeatureError> {
        let image = constant_image(128.0);
        let features = gabor_bank(&image, 4, 8)?;
        assert_eq!(features.len(), 64);
        Ok(())
    }

    #[test]
    fn gabor_constant_image_has_zero_std() -> Result<(), FeatureError> {
        let image = constant_image(100.0);
        let features = gabor_bank(&image, 2, 2)?;
        // odd entries are standard deviations
        for std in features.iter().skip(1).step_by(2) {
            approx::assert_relative_eq!(*std, 0.0, epsilon = 1e-3);
        }
        Ok(())
    }

    #[test]
    fn coarseness_constant_image() {
        let image = constant_image(77.0);
        // no scale ever wins, the first window size is kept everywhere
        assert_eq!(tamura_coarseness(&image, 5), 1.0);
    }

    #[test]
    fn coarseness_grows_with_cell_size() {
        let fine = checkerboard(2, 64).cast::<f32>().unwrap();
        let coarse = checkerboard(16, 64).cast::<f32>().unwrap();
        assert!(tamura_coarseness(&coarse, 5) > tamura_coarseness(&fine, 5));
    }

    #[test]
    fn contrast_zero_for_constant_image() {
        let image = constant_image(42.0);
        assert_eq!(tamura_contrast(&image), 0.0);
    }

    #[test]
    fn contrast_positive_for_binary_image() {
        let image = checkerboard(4, 32).cast::<f32>().unwrap();
        assert!(tamura_contrast(&image) > 0.0);
    }

    #[test]
    fn directionality_histogram_sums_to_one() -> Result<(), FeatureError> {
        // vertical stripes produce strong horizontal gradients
        let mut data = vec![0u8; 32 * 32];
        for y in 0..32 {
            for x in 0..32 {
                if (x / 4) % 2 == 0 {
                    data[y * 32 + x] = 255;
                }
            }
        }
        let image = Image::new(
            ImageSize {
                width: 32,
                height: 32,
            },
            data,
        )?
        .cast::<f32>()?;

        let (histogram, score) = tamura_directionality(&image, 16)?;
        approx::assert_relative_eq!(histogram.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(score > 0.0);

        Ok(())
    }

    #[test]
    fn directionality_constant_image() -> Result<(), FeatureError> {
        let image = constant_image(10.0);
        let (histogram, score) = tamura_directionality(&image, 16)?;
        // no edge pixels, the histogram stays zero and the score is the
        // distance of the zero vector from uniformity
        assert!(histogram.iter().all(|&h| h == 0.0));
        approx::assert_relative_eq!(score, 1.0 / 16.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn glcm_always_ten_features() {
        let image = checkerboard(4, 32);
        assert_eq!(glcm_features(&image).len(), 10);

        let constant = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            100u8,
        )
        .unwrap();
        assert_eq!(glcm_features(&constant).len(), 10);
    }

    #[test]
    fn glcm_constant_image_properties() {
        let constant = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 16,
                height: 16,
            },
            100u8,
        )
        .unwrap();

        let features = glcm_features(&constant);
        // contrast and dissimilarity vanish, energy is 1, correlation
        // degenerates to 1
        approx::assert_relative_eq!(features[0], 0.0);
        approx::assert_relative_eq!(features[2], 0.0);
        approx::assert_relative_eq!(features[6], 1.0);
        approx::assert_relative_eq!(features[8], 1.0);
    }

    #[test]
    fn glcm_checkerboard_has_contrast() {
        let image = checkerboard(1, 16);
        let features = glcm_features(&image);
        assert!(features[0] > 0.0);
    }
}
