//! Software rasterizer for segment outlines.
//!
//! [`rasterize`] converts an [`Outline`] into a [`Surface`] according to a
//! [`LayerStyle`]. The output only depends on the inputs; the same inputs
//! always produce bit-identical pixels, which is what makes caching the output
//! sound.
//!
//! # Restrictions
//!
//!  - The only supported pixel format is RGBA8888 with premultiplied alpha.
//!  - Skew angles must be in range `(-90°, 90°)`.
//!
use cgmath::{prelude::*, vec2, Deg, Matrix3};
use log::trace;
use quick_error::quick_error;
use segdisp_geom::Outline;

mod fill;
mod filter;
mod stroke;
mod style;
mod surface;
mod xform;

pub use self::{style::*, surface::*, xform::Matrix3TwoDimExt};

/// Outlines enclosing less than this area (in square pixels) are considered
/// degenerate.
const MIN_AREA: f32 = 1.0e-3;

quick_error! {
    /// Describes why [`rasterize`] failed.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum RasterError {
        EmptySurface {
            display("the cell layout leaves no pixels to draw on")
        }
        EmptyOutline {
            display("the outline encloses no area")
        }
        InvalidParameter(name: &'static str) {
            display("invalid {}", name)
        }
    }
}

/// The pixel geometry shared by every surface of a display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayout {
    /// The size of a surface, measured in pixels.
    pub size: [usize; 2],
    /// The space (in pixels) left around the normalized cell, making room for
    /// glow and skew.
    pub padding: [f32; 2],
}

impl CellLayout {
    /// Construct a `CellLayout` without padding.
    pub fn new(size: [usize; 2]) -> Self {
        Self {
            size,
            padding: [0.0; 2],
        }
    }

    /// Assign `padding`, returning a new `CellLayout`.
    pub fn with_padding(self, padding: [f32; 2]) -> Self {
        Self { padding, ..self }
    }

    /// Get the transformation from the normalized cell space to pixels.
    ///
    /// The skew is applied around the vertical center of the cell. A positive
    /// angle leans the glyph to the right.
    pub fn transform(&self, skew_angle: Deg<f32>) -> Result<Matrix3<f32>, RasterError> {
        if self.size[0] == 0 || self.size[1] == 0 {
            return Err(RasterError::EmptySurface);
        }
        if !self.padding.iter().all(|&p| p.is_finite() && p >= 0.0) {
            return Err(RasterError::InvalidParameter("padding"));
        }
        if !(skew_angle.0.abs() < 90.0) {
            return Err(RasterError::InvalidParameter("skew angle"));
        }

        let size = vec2(self.size[0] as f32, self.size[1] as f32);
        let inner = size - vec2(self.padding[0], self.padding[1]) * 2.0;
        if !(inner.x > 0.0 && inner.y > 0.0) {
            return Err(RasterError::EmptySurface);
        }

        let center_y = size.y * 0.5;

        Ok(Matrix3::from_translation_2d(vec2(0.0, center_y))
            * Matrix3::from_shear_x(-skew_angle.tan())
            * Matrix3::from_translation_2d(vec2(self.padding[0], self.padding[1] - center_y))
            * Matrix3::from_nonuniform_scale_2d(inner.x, inner.y))
    }
}

/// Rasterize an outline.
///
/// The outline is filled and/or stroked, after which the glow filters are
/// applied if `style.glow` is set. `style.enabled` is ignored.
pub fn rasterize(
    outline: &Outline,
    style: &LayerStyle,
    skew_angle: Deg<f32>,
    cell: &CellLayout,
) -> Result<Surface, RasterError> {
    style.validate()?;
    let xform = cell.transform(skew_angle)?;

    let outline = outline.map_points(|p| xform.transform_point_2d(p));
    if !(outline.area() >= MIN_AREA) {
        return Err(RasterError::EmptyOutline);
    }

    let mut surface = Surface::new(cell.size);

    if let Some(color) = style.fill {
        let cov = fill::coverage(outline.contours(), cell.size);
        surface.fill_coverage(&cov, color);
    }

    if let Some(stroke) = &style.stroke {
        let polygons = stroke::stroke_polygons(outline.contours(), stroke.width);
        let cov = fill::coverage(&polygons, cell.size);
        surface.fill_coverage(&cov, stroke.color);
    }

    if let Some(glow) = &style.glow {
        filter::dilate(&mut surface, (glow.dilate + 0.5) as usize);
        filter::blur(&mut surface, glow.blur);
    }

    trace!(
        "rasterized {} contour(s) into {:?}",
        outline.contours().len(),
        cell.size
    );

    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use rgb::RGBA8;

    const RED: RGBA8 = RGBA8 {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Outline {
        Outline::polygon(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }

    #[test]
    fn fills_mapped_rect() {
        let cell = CellLayout::new([20, 10]);
        let s = rasterize(
            &rect(0.25, 0.0, 0.75, 1.0),
            &LayerStyle::solid(RED),
            Deg(0.0),
            &cell,
        )
        .unwrap();

        for y in 0..10 {
            for x in 0..20 {
                let expected = if (5..15).contains(&x) {
                    RED
                } else {
                    RGBA8::new(0, 0, 0, 0)
                };
                assert_eq!(s.pixel(x, y), expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn padding_shrinks_cell() {
        let cell = CellLayout::new([20, 20]).with_padding([5.0, 5.0]);
        let s = rasterize(&rect(0.0, 0.0, 1.0, 1.0), &LayerStyle::solid(RED), Deg(0.0), &cell)
            .unwrap();
        assert_eq!(s.pixel(4, 10).a, 0);
        assert_eq!(s.pixel(5, 10), RED);
        assert_eq!(s.pixel(14, 14), RED);
        assert_eq!(s.pixel(15, 14).a, 0);
    }

    #[test]
    fn skew_leans_right() {
        let cell = CellLayout::new([40, 40]);
        let outline = rect(0.4, 0.0, 0.6, 1.0);
        let s = rasterize(&outline, &LayerStyle::solid(RED), Deg(20.0), &cell).unwrap();

        let centroid_x = |y: usize| {
            let row = s.row(y);
            let (sum, weight) = row
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(s, w), (x, p)| {
                    (s + x as f32 * p.a as f32, w + p.a as f32)
                });
            sum / weight
        };

        assert!(centroid_x(2) > centroid_x(20) + 3.0);
        assert!(centroid_x(20) > centroid_x(37) + 3.0);
    }

    #[test]
    fn glow_spreads_beyond_outline() {
        let cell = CellLayout::new([30, 30]).with_padding([10.0, 10.0]);
        let outline = rect(0.0, 0.0, 1.0, 1.0);
        let plain = rasterize(&outline, &LayerStyle::solid(RED), Deg(0.0), &cell).unwrap();
        let glow = rasterize(&outline, &LayerStyle::glowing(RED, 2.0, 2.0), Deg(0.0), &cell)
            .unwrap();

        assert_eq!(plain.pixel(7, 15).a, 0);
        assert!(glow.pixel(7, 15).a > 0);
    }

    #[test]
    fn stroke_only() {
        let cell = CellLayout::new([20, 20]).with_padding([4.0, 4.0]);
        let style = LayerStyle::default().with_stroke(Some(Stroke {
            color: RED,
            width: 2.0,
        }));
        let s = rasterize(&rect(0.0, 0.0, 1.0, 1.0), &style, Deg(0.0), &cell).unwrap();
        assert_eq!(s.pixel(10, 3), RED);
        assert_eq!(s.pixel(10, 4), RED);
        assert_eq!(s.pixel(10, 10).a, 0);
    }

    #[test]
    fn degenerate_inputs() {
        let style = LayerStyle::solid(RED);
        let cell = CellLayout::new([10, 10]);
        assert_eq!(
            rasterize(&Outline::new(), &style, Deg(0.0), &cell),
            Err(RasterError::EmptyOutline)
        );
        assert_eq!(
            rasterize(&rect(0.5, 0.0, 0.5, 1.0), &style, Deg(0.0), &cell),
            Err(RasterError::EmptyOutline)
        );
        assert_eq!(
            rasterize(&rect(0.0, 0.0, 1.0, 1.0), &style, Deg(0.0), &CellLayout::new([0, 10])),
            Err(RasterError::EmptySurface)
        );
        assert_eq!(
            rasterize(
                &rect(0.0, 0.0, 1.0, 1.0),
                &style,
                Deg(0.0),
                &CellLayout::new([10, 10]).with_padding([5.0, 0.0])
            ),
            Err(RasterError::EmptySurface)
        );
        assert_eq!(
            rasterize(&rect(0.0, 0.0, 1.0, 1.0), &style, Deg(90.0), &cell),
            Err(RasterError::InvalidParameter("skew angle"))
        );
    }

    #[test]
    fn oversized_glow_is_bounded() {
        let cell = CellLayout::new([8, 8]);
        let s = rasterize(
            &rect(0.25, 0.25, 0.75, 0.75),
            &LayerStyle::glowing(RED, 1.0e20, 1.0e12),
            Deg(0.0),
            &cell,
        )
        .unwrap();
        assert_eq!(s.size(), [8, 8]);
        assert!(s.pixel(0, 0).a > 0);

        let s = rasterize(
            &rect(0.25, 0.25, 0.75, 0.75),
            &LayerStyle::glowing(RED, 1.0e20, 0.0),
            Deg(0.0),
            &cell,
        )
        .unwrap();
        assert!(s.pixels().iter().all(|&p| p == RED));
    }

    #[quickcheck]
    fn deterministic(
        x0: u8,
        y0: u8,
        skew: i8,
        dilate: u8,
        blur: u8,
        stroke: u8,
    ) -> TestResult {
        let x0 = x0 as f32 / 600.0;
        let y0 = y0 as f32 / 600.0;
        let outline = rect(x0, y0, 1.0 - x0, 1.0 - y0);
        let style = LayerStyle::glowing(RGBA8::new(200, 150, 20, 220), dilate as f32 / 64.0, blur as f32 / 64.0)
            .with_stroke(Some(Stroke {
                color: RGBA8::new(20, 40, 250, 128),
                width: stroke as f32 / 64.0,
            }));
        let cell = CellLayout::new([24, 32]).with_padding([4.0, 4.0]);
        let skew = Deg(skew as f32 / 8.0);

        let a = rasterize(&outline, &style, skew, &cell).unwrap();
        let b = rasterize(&outline, &style, skew, &cell).unwrap();

        if a != b {
            return TestResult::error("outputs differ");
        }
        TestResult::passed()
    }
}
