//! The built-in segment outlines.
//!
//! The outlines are authored in a 64×100 design grid and normalized when the
//! tables are built.
//!
//! ```text
//!        a1    a2
//!      ------ ------
//!     |\     |     /|
//!   f | h    j    k | b
//!     |   \  |  /   |
//!      --g1-- --g2--
//!     |   /  |  \   |
//!   e | l    m    n | c
//!     |/     |     \|
//!      ------ ------  . dp
//!        d1    d2     , comma
//! ```
use arrayvec::ArrayVec;
use cgmath::Point2;
use once_cell::sync::Lazy;

use crate::{Geometry, Outline, SegmentType, MAX_SEGMENTS};

const DESIGN_SIZE: [f32; 2] = [64.0, 100.0];

/// Stroke thickness
const T: f32 = 7.0;
/// Gap between adjacent strokes
const G: f32 = 1.5;

// Stroke centre lines
const LEFT: f32 = 6.0;
const RIGHT: f32 = 50.0;
const CENTER: f32 = 28.0;
const TOP: f32 = 5.0;
const MIDDLE: f32 = 48.0;
const BOTTOM: f32 = 91.0;

/// The geometry of the built-in segment types.
#[derive(Debug)]
pub struct BuiltinGeometry {
    /// Indexed by `SegmentType as usize`.
    cells: [Cell; 3],
}

#[derive(Debug)]
struct Cell {
    segments: Vec<Outline>,
    full: Outline,
}

static BUILTIN: Lazy<BuiltinGeometry> = Lazy::new(BuiltinGeometry::new);

/// Get the process-wide instance of [`BuiltinGeometry`].
pub fn builtin() -> &'static BuiltinGeometry {
    &BUILTIN
}

impl BuiltinGeometry {
    fn new() -> Self {
        Self {
            cells: [
                Cell::new(numeric8()),
                Cell::new(alphanumeric14()),
                Cell::new(alphanumeric16()),
            ],
        }
    }

    fn cell(&self, ty: SegmentType) -> &Cell {
        &self.cells[ty as usize]
    }
}

impl Geometry for BuiltinGeometry {
    fn outlines(&self, ty: SegmentType) -> &[Outline] {
        &self.cell(ty).segments
    }

    fn full_outline(&self, ty: SegmentType) -> &Outline {
        &self.cell(ty).full
    }
}

impl Cell {
    fn new(segments: Vec<Outline>) -> Self {
        assert!(segments.len() <= MAX_SEGMENTS);
        let segments: Vec<_> = segments.iter().map(normalize).collect();
        let full = Outline::union(&segments);
        Self { segments, full }
    }
}

fn normalize(o: &Outline) -> Outline {
    o.map_points(|p| Point2::new(p.x / DESIGN_SIZE[0], p.y / DESIGN_SIZE[1]))
}

fn numeric8() -> Vec<Outline> {
    vec![
        hbar(LEFT + G, RIGHT - G, TOP),      // a
        vbar(RIGHT, TOP + G, MIDDLE - G),    // b
        vbar(RIGHT, MIDDLE + G, BOTTOM - G), // c
        hbar(LEFT + G, RIGHT - G, BOTTOM),   // d
        vbar(LEFT, MIDDLE + G, BOTTOM - G),  // e
        vbar(LEFT, TOP + G, MIDDLE - G),     // f
        hbar(LEFT + G, RIGHT - G, MIDDLE),   // g
        dot(),
    ]
}

fn alphanumeric14() -> Vec<Outline> {
    vec![
        hbar(LEFT + G, RIGHT - G, TOP),        // a
        vbar(RIGHT, TOP + G, MIDDLE - G),      // b
        vbar(RIGHT, MIDDLE + G, BOTTOM - G),   // c
        hbar(LEFT + G, RIGHT - G, BOTTOM),     // d
        vbar(LEFT, MIDDLE + G, BOTTOM - G),    // e
        vbar(LEFT, TOP + G, MIDDLE - G),       // f
        hbar(LEFT + G, CENTER - G, MIDDLE),    // g1
        comma(),
        diagonal_upper_left(),                 // h
        upper_vertical(),                      // j
        diagonal_upper_right(),                // k
        hbar(CENTER + G, RIGHT - G, MIDDLE),   // g2
        diagonal_lower_left(),                 // l
        lower_vertical(),                      // m
        diagonal_lower_right(),                // n
        dot(),
    ]
}

fn alphanumeric16() -> Vec<Outline> {
    vec![
        hbar(LEFT + G, CENTER - G, TOP),       // a1
        hbar(CENTER + G, RIGHT - G, TOP),      // a2
        vbar(RIGHT, TOP + G, MIDDLE - G),      // b
        vbar(RIGHT, MIDDLE + G, BOTTOM - G),   // c
        hbar(CENTER + G, RIGHT - G, BOTTOM),   // d2
        hbar(LEFT + G, CENTER - G, BOTTOM),    // d1
        vbar(LEFT, MIDDLE + G, BOTTOM - G),    // e
        vbar(LEFT, TOP + G, MIDDLE - G),       // f
        hbar(LEFT + G, CENTER - G, MIDDLE),    // g1
        hbar(CENTER + G, RIGHT - G, MIDDLE),   // g2
        diagonal_upper_left(),                 // h
        upper_vertical(),                      // j
        diagonal_upper_right(),                // k
        diagonal_lower_left(),                 // l
        lower_vertical(),                      // m
        diagonal_lower_right(),                // n
        dot(),
    ]
}

fn polygon(points: ArrayVec<[[f32; 2]; 6]>) -> Outline {
    Outline::polygon(points.into_iter().map(Point2::from))
}

/// A horizontal bar with pointed ends, spanning `x0..x1`.
fn hbar(x0: f32, x1: f32, y: f32) -> Outline {
    let h = T * 0.5;
    let mut p = ArrayVec::new();
    p.push([x0, y]);
    p.push([x0 + h, y - h]);
    p.push([x1 - h, y - h]);
    p.push([x1, y]);
    p.push([x1 - h, y + h]);
    p.push([x0 + h, y + h]);
    polygon(p)
}

/// A vertical bar with pointed ends, spanning `y0..y1`.
fn vbar(x: f32, y0: f32, y1: f32) -> Outline {
    let h = T * 0.5;
    let mut p = ArrayVec::new();
    p.push([x, y0]);
    p.push([x + h, y0 + h]);
    p.push([x + h, y1 - h]);
    p.push([x, y1]);
    p.push([x - h, y1 - h]);
    p.push([x - h, y0 + h]);
    polygon(p)
}

/// A parallelogram of horizontal thickness `T` whose left edge runs from
/// `(x0, y0)` to `(x1, y1)`.
fn slanted(x0: f32, y0: f32, x1: f32, y1: f32) -> Outline {
    let mut p = ArrayVec::new();
    p.push([x0, y0]);
    p.push([x0 + T, y0]);
    p.push([x1 + T, y1]);
    p.push([x1, y1]);
    polygon(p)
}

// Corners of the four cavities enclosed by the outer and the middle bars
const CAVITY_LEFT: f32 = LEFT + T * 0.5 + G;
const CAVITY_RIGHT: f32 = RIGHT - T * 0.5 - G;
const CAVITY_CENTER_LEFT: f32 = CENTER - T * 0.5 - G;
const CAVITY_CENTER_RIGHT: f32 = CENTER + T * 0.5 + G;
const CAVITY_UPPER_TOP: f32 = TOP + T * 0.5 + G;
const CAVITY_UPPER_BOTTOM: f32 = MIDDLE - T * 0.5 - G;
const CAVITY_LOWER_TOP: f32 = MIDDLE + T * 0.5 + G;
const CAVITY_LOWER_BOTTOM: f32 = BOTTOM - T * 0.5 - G;

fn diagonal_upper_left() -> Outline {
    slanted(
        CAVITY_LEFT,
        CAVITY_UPPER_TOP,
        CAVITY_CENTER_LEFT - T,
        CAVITY_UPPER_BOTTOM,
    )
}

fn diagonal_upper_right() -> Outline {
    slanted(
        CAVITY_RIGHT - T,
        CAVITY_UPPER_TOP,
        CAVITY_CENTER_RIGHT,
        CAVITY_UPPER_BOTTOM,
    )
}

fn diagonal_lower_left() -> Outline {
    slanted(
        CAVITY_CENTER_LEFT - T,
        CAVITY_LOWER_TOP,
        CAVITY_LEFT,
        CAVITY_LOWER_BOTTOM,
    )
}

fn diagonal_lower_right() -> Outline {
    slanted(
        CAVITY_CENTER_RIGHT,
        CAVITY_LOWER_TOP,
        CAVITY_RIGHT - T,
        CAVITY_LOWER_BOTTOM,
    )
}

fn upper_vertical() -> Outline {
    vbar(CENTER, CAVITY_UPPER_TOP, CAVITY_UPPER_BOTTOM)
}

fn lower_vertical() -> Outline {
    vbar(CENTER, CAVITY_LOWER_TOP, CAVITY_LOWER_BOTTOM)
}

fn dot() -> Outline {
    let (cx, cy, h) = (57.5, 89.0, 3.5);
    let mut p = ArrayVec::new();
    p.push([cx - h, cy - h]);
    p.push([cx + h, cy - h]);
    p.push([cx + h, cy + h]);
    p.push([cx - h, cy + h]);
    polygon(p)
}

fn comma() -> Outline {
    let mut p = ArrayVec::new();
    p.push([54.0, 93.5]);
    p.push([61.0, 93.5]);
    p.push([55.0, 99.5]);
    p.push([51.5, 99.5]);
    polygon(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signed_area;

    #[test]
    fn segment_counts() {
        let g = builtin();
        assert_eq!(g.segment_count(SegmentType::Numeric8), 8);
        assert_eq!(g.segment_count(SegmentType::Alphanumeric14), 16);
        assert_eq!(g.segment_count(SegmentType::Alphanumeric16), 17);
    }

    #[test]
    fn outlines_are_normalized() {
        let g = builtin();
        for &ty in SegmentType::ALL.iter() {
            for (i, o) in g.outlines(ty).iter().enumerate() {
                let [min, max] = o.bounds().unwrap();
                assert!(
                    min.x >= 0.0 && min.y >= 0.0 && max.x <= 1.0 && max.y <= 1.0,
                    "{:?} segment {} is out of the cell: {:?}",
                    ty,
                    i,
                    (min, max)
                );
                assert!(o.area() > 0.0);
            }
        }
    }

    #[test]
    fn contours_are_wound_clockwise() {
        // The non-zero fill of the full outline relies on this
        let g = builtin();
        for &ty in SegmentType::ALL.iter() {
            for c in g.full_outline(ty).contours() {
                assert!(signed_area(c) > 0.0, "{:?}: {:?}", ty, c);
            }
        }
    }

    #[test]
    fn full_outline_covers_every_segment() {
        let g = builtin();
        for &ty in SegmentType::ALL.iter() {
            let full = g.full_outline(ty);
            let sum: f32 = g.outlines(ty).iter().map(Outline::area).sum();
            assert_eq!(full.contours().len(), g.segment_count(ty));
            assert!((full.area() - sum).abs() < 1.0e-5);
        }
    }

    #[test]
    fn split_bars_match_whole_bars() {
        let g = builtin();
        let a14 = g.outlines(SegmentType::Alphanumeric14);
        let a16 = g.outlines(SegmentType::Alphanumeric16);
        // `b` is shared
        assert_eq!(a14[1], a16[2]);
        // `a1` and `a2` occupy the same band as `a`
        let [min, max] = a14[0].bounds().unwrap();
        let [min1, _] = a16[0].bounds().unwrap();
        let [_, max2] = a16[1].bounds().unwrap();
        assert_eq!(min, min1);
        assert_eq!(max, max2);
    }
}
