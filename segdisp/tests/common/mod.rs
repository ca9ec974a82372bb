#![allow(dead_code)]
use cgmath::Point2;
use segdisp::{Geometry, Outline, SegmentType};

pub fn try_init_logger_for_default_harness() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A cell with two segments: the left and right halves. The full-segment
/// outline only covers the top half, so that some pixels are covered by
/// segments but not by the background.
pub struct TwoSegments {
    segments: Vec<Outline>,
    full: Outline,
}

impl TwoSegments {
    pub fn new() -> Self {
        Self {
            segments: vec![rect(0.0, 0.0, 0.5, 1.0), rect(0.5, 0.0, 1.0, 1.0)],
            full: rect(0.0, 0.0, 1.0, 0.5),
        }
    }
}

impl Geometry for TwoSegments {
    fn outlines(&self, _: SegmentType) -> &[Outline] {
        &self.segments
    }

    fn full_outline(&self, _: SegmentType) -> &Outline {
        &self.full
    }
}

pub fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Outline {
    Outline::polygon(vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ])
}
