use cgmath::Point2;

/// A set of closed polygonal contours, filled using the non-zero winding
/// number rule.
///
/// Each contour is implicitly closed; the last point connects back to the
/// first one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    contours: Vec<Vec<Point2<f32>>>,
}

impl Outline {
    /// Construct an empty `Outline`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an `Outline` consisting of a single polygon.
    pub fn polygon(points: impl IntoIterator<Item = Point2<f32>>) -> Self {
        let mut this = Self::new();
        this.push_contour(points);
        this
    }

    /// Construct an `Outline` containing every contour of `outlines`.
    pub fn union<'a>(outlines: impl IntoIterator<Item = &'a Outline>) -> Self {
        Self {
            contours: outlines
                .into_iter()
                .flat_map(|o| o.contours.iter().cloned())
                .collect(),
        }
    }

    /// Append a contour. Contours with less than three points enclose no area
    /// and are ignored.
    pub fn push_contour(&mut self, points: impl IntoIterator<Item = Point2<f32>>) {
        let contour: Vec<_> = points.into_iter().collect();
        if contour.len() >= 3 {
            self.contours.push(contour);
        }
    }

    pub fn contours(&self) -> &[Vec<Point2<f32>>] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Get the sum of the absolute areas of the contours. Overlapping regions
    /// are counted more than once.
    pub fn area(&self) -> f32 {
        self.contours
            .iter()
            .map(|c| signed_area(c).abs())
            .sum()
    }

    /// Get the axis-aligned bounding box as `[min, max]`. Returns `None` if the
    /// outline is empty.
    pub fn bounds(&self) -> Option<[Point2<f32>; 2]> {
        let mut points = self.contours.iter().flatten();
        let first = *points.next()?;
        Some(points.fold([first, first], |[min, max], p| {
            [
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            ]
        }))
    }

    /// Apply `f` to every point.
    pub fn map_points(&self, mut f: impl FnMut(Point2<f32>) -> Point2<f32>) -> Self {
        Self {
            contours: self
                .contours
                .iter()
                .map(|c| c.iter().map(|&p| f(p)).collect())
                .collect(),
        }
    }
}

/// Compute the signed area of a closed polygon using the shoelace formula.
/// The result is positive for clockwise contours in a y-down space.
pub fn signed_area(contour: &[Point2<f32>]) -> f32 {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let p = contour[i];
            let q = contour[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum::<f32>()
        * 0.5
}
