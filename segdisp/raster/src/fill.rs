//! Anti-aliased polygon coverage.
//!
//! Each pixel row is sampled by `SUBSAMPLES` horizontal scanlines. On each
//! scanline, the spans inside the polygon (non-zero winding number rule) are
//! accumulated with exact horizontal coverage.
use cgmath::Point2;
use std::cmp::Ordering;

/// The number of scanlines per pixel row.
const SUBSAMPLES: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Edge {
    /// The upper endpoint (`y0 < y1`).
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    /// `1` if the original edge goes down, `-1` otherwise.
    winding: i32,
}

impl Edge {
    fn new(p: Point2<f32>, q: Point2<f32>) -> Option<Self> {
        if p.y < q.y {
            Some(Self {
                x0: p.x,
                y0: p.y,
                x1: q.x,
                y1: q.y,
                winding: 1,
            })
        } else if p.y > q.y {
            Some(Self {
                x0: q.x,
                y0: q.y,
                x1: p.x,
                y1: p.y,
                winding: -1,
            })
        } else {
            // Horizontal edges never cross a scanline
            None
        }
    }

    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// Compute the coverage of the specified polygons over a pixel grid of size
/// `size`. The returned vector has `size[0] * size[1]` elements, each in range
/// `[0, 1]` (overlapping contours don't accumulate coverage).
///
/// All points must be finite.
pub fn coverage(contours: &[Vec<Point2<f32>>], size: [usize; 2]) -> Vec<f32> {
    let [width, height] = size;
    let mut out = vec![0.0f32; width * height];

    let edges: Vec<Edge> = contours
        .iter()
        .flat_map(|c| {
            let n = c.len();
            (0..n).filter_map(move |i| Edge::new(c[i], c[(i + 1) % n]))
        })
        .collect();

    if edges.is_empty() || width == 0 {
        return out;
    }

    // Only visit rows touched by the polygons
    let (min_y, max_y) = edges.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(a, b), e| {
        (a.min(e.y0), b.max(e.y1))
    });
    let row_start = (min_y.max(0.0).floor() as usize).min(height);
    let row_end = (max_y.max(0.0).ceil() as usize).min(height);

    let weight = 1.0 / SUBSAMPLES as f32;
    let mut crossings: Vec<(f32, i32)> = Vec::new();

    for y in row_start..row_end {
        let row = &mut out[y * width..][..width];

        for s in 0..SUBSAMPLES {
            let sy = y as f32 + (s as f32 + 0.5) * weight;

            crossings.clear();
            crossings.extend(
                edges
                    .iter()
                    .filter(|e| sy >= e.y0 && sy < e.y1)
                    .map(|e| (e.x_at(sy), e.winding)),
            );
            crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut winding = 0;
            let mut span_start = 0.0;
            for &(x, w) in crossings.iter() {
                let was_inside = winding != 0;
                winding += w;
                let is_inside = winding != 0;

                if !was_inside && is_inside {
                    span_start = x;
                } else if was_inside && !is_inside {
                    add_span(row, span_start, x, weight);
                }
            }
        }

        for c in row.iter_mut() {
            *c = c.min(1.0);
        }
    }

    out
}

/// Add `weight` times the horizontal overlap of `x0..x1` with each pixel.
fn add_span(row: &mut [f32], x0: f32, x1: f32, weight: f32) {
    let x0 = x0.max(0.0);
    let x1 = x1.min(row.len() as f32);
    if !(x0 < x1) {
        return;
    }

    let i0 = x0.floor() as usize;
    let i1 = (x1.ceil() as usize).min(row.len());

    for (i, c) in row[i0..i1].iter_mut().enumerate() {
        let px = (i0 + i) as f32;
        let overlap = x1.min(px + 1.0) - x0.max(px);
        if overlap > 0.0 {
            *c += overlap * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point2<f32>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn pixel_aligned_rect() {
        let cov = coverage(&[rect(1.0, 1.0, 3.0, 2.0)], [4, 3]);
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ];
        assert_eq!(cov, expected);
    }

    #[test]
    fn fractional_edges() {
        let cov = coverage(&[rect(0.5, 0.0, 2.25, 1.0)], [3, 1]);
        assert_eq!(cov, [0.5, 1.0, 0.25]);
    }

    #[test]
    fn winding_direction_does_not_matter() {
        let mut reversed = rect(0.0, 0.0, 2.0, 2.0);
        reversed.reverse();
        assert_eq!(
            coverage(&[reversed], [2, 2]),
            coverage(&[rect(0.0, 0.0, 2.0, 2.0)], [2, 2])
        );
    }

    #[test]
    fn overlapping_contours_saturate() {
        let r = rect(0.0, 0.0, 2.0, 1.0);
        assert_eq!(coverage(&[r.clone(), r], [2, 1]), [1.0, 1.0]);
    }

    #[test]
    fn opposite_windings_cancel() {
        let outer = rect(0.0, 0.0, 3.0, 1.0);
        let mut hole = rect(1.0, 0.0, 2.0, 1.0);
        hole.reverse();
        assert_eq!(coverage(&[outer, hole], [3, 1]), [1.0, 0.0, 1.0]);
    }

    #[test]
    fn clipped_outside_grid() {
        let cov = coverage(&[rect(-5.0, -5.0, 1.0, 10.0)], [2, 2]);
        assert_eq!(cov, [1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn triangle_area() {
        let tri = vec![
            Point2::new(0.0, 0.0),
            Point2::new(8.0, 0.0),
            Point2::new(0.0, 8.0),
        ];
        let total: f32 = coverage(&[tri], [8, 8]).iter().sum();
        assert!((total - 32.0).abs() < 0.5, "{}", total);
    }
}
