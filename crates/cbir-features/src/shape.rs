use std::path::Path;

use cbir_image::Image;
use cbir_imgproc::color::gray_from_rgb;
use cbir_imgproc::contours::{find_external_contours, largest_contour, Contour};
use cbir_imgproc::threshold::{otsu_threshold, threshold_binary_inverse};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::FeatureError;
use crate::records::ShapeFeatureRecord;

/// Default number of Fourier descriptors kept per contour.
pub const DEFAULT_NUM_FOURIER: usize = 20;

/// Default number of bins of the edge direction histogram.
pub const DEFAULT_NUM_DIRECTION_BINS: usize = 36;

/// Offset keeping the logarithm of a vanishing Hu moment finite.
const HU_LOG_EPS: f64 = 1e-10;

/// Configuration of the shape feature extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeParams {
    /// Number of Fourier descriptors to keep.
    pub num_fourier: usize,
    /// Number of bins of the edge direction histogram.
    pub num_direction_bins: usize,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            num_fourier: DEFAULT_NUM_FOURIER,
            num_direction_bins: DEFAULT_NUM_DIRECTION_BINS,
        }
    }
}

/// Compute the Fourier descriptors of a contour.
///
/// The boundary points are mapped to the complex sequence x + iy and run
/// through a forward DFT. The coefficient magnitudes are normalized by the
/// magnitude of coefficient index 1 when it is nonzero, which removes scale;
/// dropping the DC term removes translation and taking magnitudes removes
/// rotation and the starting point. The first `num_descriptors` magnitudes
/// after the DC term form the descriptor, zero padded when the contour yields
/// fewer coefficients.
///
/// # Arguments
///
/// * `contour` - The traced boundary, when one exists.
/// * `num_descriptors` - The fixed descriptor length.
///
/// # Returns
///
/// Exactly `num_descriptors` values; all zero for an absent contour or one
/// with fewer than three points.
pub fn fourier_descriptors(contour: Option<&Contour>, num_descriptors: usize) -> Vec<f64> {
    let points = match contour {
        Some(c) if c.len() >= 3 => c.points(),
        _ => return vec![0.0; num_descriptors],
    };

    let mut buffer: Vec<Complex<f64>> = points
        .iter()
        .map(|p| Complex::new(p.x, p.y))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(buffer.len());
    fft.process(&mut buffer);

    let mut magnitudes: Vec<f64> = buffer.iter().map(|c| c.norm()).collect();

    let anchor = magnitudes[1];
    if anchor != 0.0 {
        magnitudes.iter_mut().for_each(|m| *m /= anchor);
    }

    let mut descriptors: Vec<f64> = magnitudes
        .into_iter()
        .skip(1)
        .take(num_descriptors)
        .collect();
    descriptors.resize(num_descriptors, 0.0);

    descriptors
}

/// Compute the normalized direction histogram of the contour segments.
///
/// Each consecutive point pair contributes the atan2 angle of its delta in
/// degrees, wrapped to [0, 360), binned into `num_bins` equal bins and
/// normalized to sum one.
///
/// # Arguments
///
/// * `contour` - The traced boundary, when one exists.
/// * `num_bins` - The number of histogram bins.
///
/// # Returns
///
/// A histogram summing to one, or all zero for an absent contour or one with
/// fewer than two points.
pub fn edge_direction_histogram(contour: Option<&Contour>, num_bins: usize) -> Vec<f64> {
    let mut histogram = vec![0.0f64; num_bins];

    let points = match contour {
        Some(c) if c.len() >= 2 => c.points(),
        _ => return histogram,
    };

    let bin_width = 360.0 / num_bins as f64;
    for pair in points.windows(2) {
        let dx = pair[1].x - pair[0].x;
        let dy = pair[1].y - pair[0].y;
        let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
        let bin = ((angle / bin_width) as usize).min(num_bins - 1);
        histogram[bin] += 1.0;
    }

    let total: f64 = histogram.iter().sum();
    if total > 0.0 {
        histogram.iter_mut().for_each(|h| *h /= total);
    }

    histogram
}

/// Compute the seven Hu moment invariants of the contour point set.
///
/// The spatial moments are taken over the boundary pixels treated as unit
/// masses; central and normalized central moments then feed the classical
/// invariants, which are invariant to translation, scale and rotation.
fn hu_invariants(contour: &Contour) -> [f64; 7] {
    let points = contour.points();
    let n = points.len() as f64;

    let xc = points.iter().map(|p| p.x).sum::<f64>() / n;
    let yc = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut mu = [[0.0f64; 4]; 4];
    for p in points {
        let dx = p.x - xc;
        let dy = p.y - yc;
        let dx2 = dx * dx;
        let dy2 = dy * dy;
        mu[2][0] += dx2;
        mu[0][2] += dy2;
        mu[1][1] += dx * dy;
        mu[3][0] += dx2 * dx;
        mu[0][3] += dy2 * dy;
        mu[2][1] += dx2 * dy;
        mu[1][2] += dx * dy2;
    }

    let eta = |p: usize, q: usize| -> f64 {
        let order = (p + q) as f64;
        mu[p][q] / n.powf(1.0 + order / 2.0)
    };

    let n20 = eta(2, 0);
    let n02 = eta(0, 2);
    let n11 = eta(1, 1);
    let n30 = eta(3, 0);
    let n03 = eta(0, 3);
    let n21 = eta(2, 1);
    let n12 = eta(1, 2);

    let s1 = n30 + n12;
    let s2 = n21 + n03;

    [
        n20 + n02,
        (n20 - n02).powi(2) + 4.0 * n11 * n11,
        (n30 - 3.0 * n12).powi(2) + (3.0 * n21 - n03).powi(2),
        s1 * s1 + s2 * s2,
        (n30 - 3.0 * n12) * s1 * (s1 * s1 - 3.0 * s2 * s2)
            + (3.0 * n21 - n03) * s2 * (3.0 * s1 * s1 - s2 * s2),
        (n20 - n02) * (s1 * s1 - s2 * s2) + 4.0 * n11 * s1 * s2,
        (3.0 * n21 - n03) * s1 * (s1 * s1 - 3.0 * s2 * s2)
            - (n30 - 3.0 * n12) * s2 * (3.0 * s1 * s1 - s2 * s2),
    ]
}

/// Compute the log transformed Hu moment signature of a contour.
///
/// Each invariant h is reported as ln(|h| + 1e-10); the sign is discarded,
/// which trades the mirror distinction for a compact dynamic range.
///
/// # Arguments
///
/// * `contour` - The traced boundary, when one exists.
///
/// # Returns
///
/// Seven values; seven untransformed zeros for an absent contour.
pub fn hu_moment_signature(contour: Option<&Contour>) -> Vec<f64> {
    match contour {
        Some(c) if !c.is_empty() => hu_invariants(c)
            .iter()
            .map(|h| (h.abs() + HU_LOG_EPS).ln())
            .collect(),
        _ => vec![0.0; 7],
    }
}

/// Extract the contour of the dominant foreground region of a grayscale image.
///
/// The image is binarized with the Otsu threshold, foreground inverted to
/// bright, and the external boundary with the most points is selected.
///
/// # Returns
///
/// `None` for an image without foreground, e.g. a uniform image.
pub fn extract_contour(gray: &Image<u8, 1>) -> Result<Option<Contour>, FeatureError> {
    let threshold = otsu_threshold(gray)?;

    let mut binary = Image::from_size_val(gray.size(), 0u8)?;
    threshold_binary_inverse(gray, &mut binary, threshold, 255)?;

    Ok(largest_contour(find_external_contours(&binary)))
}

/// Extract the shape feature record of an image file.
///
/// Chains loading, grayscale conversion, contour extraction and the three
/// shape descriptors. An image without a usable contour still produces a
/// record, holding the documented default vectors.
///
/// # Arguments
///
/// * `image_path` - The path to the source image.
/// * `params` - The extraction configuration.
pub fn extract_shape_features(
    image_path: impl AsRef<Path>,
    params: &ShapeParams,
) -> Result<ShapeFeatureRecord, FeatureError> {
    let image_path = image_path.as_ref();
    let rgb = cbir_io::read_image_rgb8(image_path)?;

    let mut gray = Image::from_size_val(rgb.size(), 0u8)?;
    gray_from_rgb(&rgb, &mut gray)?;

    let contour = extract_contour(&gray)?;

    let image_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match &contour {
        Some(c) => log::debug!("{image_name}: contour with {} points", c.len()),
        None => log::debug!("{image_name}: no contour found"),
    }

    Ok(ShapeFeatureRecord {
        image_name,
        fourier_descriptors: fourier_descriptors(contour.as_ref(), params.num_fourier),
        direction_histogram: edge_direction_histogram(contour.as_ref(), params.num_direction_bins),
        hu_moments: hu_moment_signature(contour.as_ref()),
    })
}
