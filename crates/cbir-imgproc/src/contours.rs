use cbir_image::Image;

/// A 2D point with floating point coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2d {
    /// Horizontal coordinate in pixels.
    pub x: f64,
    /// Vertical coordinate in pixels.
    pub y: f64,
}

/// An ordered sequence of boundary points of a foreground region.
///
/// Immutable once produced by [`find_external_contours`].
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2d>,
}

impl Contour {
    /// The boundary points in tracing order.
    pub fn points(&self) -> &[Point2d] {
        &self.points
    }

    /// The number of boundary points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the contour has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// clockwise 8-neighborhood in screen coordinates (y grows downwards),
// starting at west: W, NW, N, NE, E, SE, S, SW
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Find the external boundaries of all foreground regions in a binary image.
///
/// Foreground pixels are the non-zero pixels. Regions are 4-connected
/// components; each region contributes one contour obtained by Moore neighbor
/// tracing of its outer border, starting at the topmost-leftmost pixel.
/// Contours are returned in scan order of their starting pixel.
///
/// # Arguments
///
/// * `src` - The input binary image with shape (H, W, 1).
///
/// # Returns
///
/// One contour per region; empty for an image without foreground.
pub fn find_external_contours(src: &Image<u8, 1>) -> Vec<Contour> {
    let (width, height) = (src.width(), src.height());
    let data = src.as_slice();

    let mut labels = vec![0u32; width * height];
    let mut contours = Vec::new();
    let mut next_label = 1u32;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if data[idx] == 0 || labels[idx] != 0 {
                continue;
            }

            // the scan pixel is the topmost-leftmost pixel of this component
            flood_fill_label(data, &mut labels, x, y, width, height, next_label);
            let points = trace_boundary(&labels, width, height, (x as i64, y as i64), next_label);
            contours.push(Contour { points });
            next_label += 1;
        }
    }

    contours
}

/// Select the contour with the most points.
///
/// Ties keep the earlier contour in scan order. Returns `None` when the input
/// is empty, which models a foreground-free image and is data, not a failure.
pub fn largest_contour(contours: Vec<Contour>) -> Option<Contour> {
    let mut best: Option<Contour> = None;
    for contour in contours {
        match &best {
            Some(b) if contour.len() <= b.len() => {}
            _ => best = Some(contour),
        }
    }
    best
}

/// Label a 4-connected component with a flood fill.
fn flood_fill_label(
    data: &[u8],
    labels: &mut [u32],
    start_x: usize,
    start_y: usize,
    width: usize,
    height: usize,
    label: u32,
) {
    let mut stack = vec![(start_x as i64, start_y as i64)];

    while let Some((x, y)) = stack.pop() {
        if x < 0 || x >= width as i64 || y < 0 || y >= height as i64 {
            continue;
        }

        let idx = y as usize * width + x as usize;
        if labels[idx] != 0 || data[idx] == 0 {
            continue;
        }

        labels[idx] = label;

        stack.push((x + 1, y));
        stack.push((x - 1, y));
        stack.push((x, y + 1));
        stack.push((x, y - 1));
    }
}

/// Trace the outer border of a labeled component with Moore neighbor tracing.
fn trace_boundary(
    labels: &[u32],
    width: usize,
    height: usize,
    start: (i64, i64),
    label: u32,
) -> Vec<Point2d> {
    let at = |x: i64, y: i64| -> bool {
        x >= 0
            && x < width as i64
            && y >= 0
            && y < height as i64
            && labels[y as usize * width + x as usize] == label
    };

    let mut points = vec![Point2d {
        x: start.0 as f64,
        y: start.1 as f64,
    }];

    let mut current = start;
    // the west neighbor of the topmost-leftmost pixel is always background
    let mut backtrack_dir = 0usize;

    // the boundary of a region cannot be longer than the number of border
    // crossings in the image
    let max_steps = 4 * width * height;

    for _ in 0..max_steps {
        let mut advanced = false;

        for i in 1..=8 {
            let dir = (backtrack_dir + i) % 8;
            let (dx, dy) = NEIGHBORS[dir];
            let next = (current.0 + dx, current.1 + dy);

            if !at(next.0, next.1) {
                continue;
            }

            if next == start {
                return points;
            }

            points.push(Point2d {
                x: next.0 as f64,
                y: next.1 as f64,
            });
            current = next;
            backtrack_dir = (dir + 4) % 8;
            advanced = true;
            break;
        }

        if !advanced {
            // isolated pixel
            break;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbir_image::{ImageError, ImageSize};

    fn binary_image(width: usize, height: usize, fg: &[(usize, usize)]) -> Image<u8, 1> {
        let mut data = vec![0u8; width * height];
        for &(x, y) in fg {
            data[y * width + x] = 255;
        }
        Image::new(ImageSize { width, height }, data).unwrap()
    }

    #[test]
    fn no_foreground_no_contours() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 8,
                height: 8,
            },
            0u8,
        )?;

        let contours = find_external_contours(&image);
        assert!(contours.is_empty());
        assert!(largest_contour(contours).is_none());

        Ok(())
    }

    #[test]
    fn single_pixel_contour() {
        let image = binary_image(5, 5, &[(2, 2)]);
        let contours = find_external_contours(&image);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 1);
        assert_eq!(contours[0].points()[0], Point2d { x: 2.0, y: 2.0 });
    }

    #[test]
    fn square_boundary() {
        // 4x4 filled square at (2,2)..(5,5) in a 8x8 image
        let mut fg = Vec::new();
        for y in 2..6 {
            for x in 2..6 {
                fg.push((x, y));
            }
        }
        let image = binary_image(8, 8, &fg);

        let contours = find_external_contours(&image);
        assert_eq!(contours.len(), 1);
        // the boundary of a 4x4 square has 4 * 4 - 4 = 12 pixels
        assert_eq!(contours[0].len(), 12);
        // starts at the topmost-leftmost pixel
        assert_eq!(contours[0].points()[0], Point2d { x: 2.0, y: 2.0 });
    }

    #[test]
    fn two_regions_largest_wins() {
        let mut fg = vec![(0, 0)];
        for y in 3..6 {
            for x in 3..6 {
                fg.push((x, y));
            }
        }
        let image = binary_image(8, 8, &fg);

        let contours = find_external_contours(&image);
        assert_eq!(contours.len(), 2);

        let largest = largest_contour(contours).unwrap();
        assert_eq!(largest.len(), 8);
    }

    #[test]
    fn tie_keeps_scan_order() {
        let image = binary_image(8, 8, &[(1, 1), (6, 6)]);
        let contours = find_external_contours(&image);
        assert_eq!(contours.len(), 2);

        let largest = largest_contour(contours).unwrap();
        assert_eq!(largest.points()[0], Point2d { x: 1.0, y: 1.0 });
    }
}
