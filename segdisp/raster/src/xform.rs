use cgmath::{BaseFloat, Matrix3, Point2, Vector2, Vector3};

/// An extension trait for [`cgmath::Matrix3`] that adds methods for
/// constructing and applying 2D homogeneous transformations.
///
/// `cgmath` treats `Matrix3` as a non-translating 3D transformation, so these
/// don't exist there.
pub trait Matrix3TwoDimExt<S>: Sized {
    /// Create a homogeneous transformation matrix from a translation vector.
    fn from_translation_2d(v: Vector2<S>) -> Self;
    /// Create a homogeneous transformation matrix from a set of scale values.
    fn from_nonuniform_scale_2d(x: S, y: S) -> Self;
    /// Create a homogeneous transformation matrix that shears along the X
    /// axis: `x' = x + k·y`.
    fn from_shear_x(k: S) -> Self;
    /// Transform a point.
    fn transform_point_2d(&self, p: Point2<S>) -> Point2<S>;
}

impl<S: BaseFloat> Matrix3TwoDimExt<S> for Matrix3<S> {
    #[inline]
    fn from_translation_2d(v: Vector2<S>) -> Self {
        #[rustfmt::skip]
        let m = Self::new(
            S::one(), S::zero(), S::zero(),
            S::zero(), S::one(), S::zero(),
            v.x, v.y, S::one(),
        );
        m
    }

    #[inline]
    fn from_nonuniform_scale_2d(x: S, y: S) -> Self {
        #[rustfmt::skip]
        let m = Self::new(
            x, S::zero(), S::zero(),
            S::zero(), y, S::zero(),
            S::zero(), S::zero(), S::one(),
        );
        m
    }

    #[inline]
    fn from_shear_x(k: S) -> Self {
        #[rustfmt::skip]
        let m = Self::new(
            S::one(), S::zero(), S::zero(),
            k, S::one(), S::zero(),
            S::zero(), S::zero(), S::one(),
        );
        m
    }

    #[inline]
    fn transform_point_2d(&self, p: Point2<S>) -> Point2<S> {
        let v = *self * Vector3::new(p.x, p.y, S::one());
        Point2::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec2;

    #[test]
    fn compose() {
        let m = Matrix3::from_translation_2d(vec2(10.0f32, 20.0))
            * Matrix3::from_nonuniform_scale_2d(2.0, 3.0);
        assert_eq!(
            m.transform_point_2d(Point2::new(1.0, 1.0)),
            Point2::new(12.0, 23.0)
        );
    }

    #[test]
    fn shear() {
        let m = Matrix3::from_shear_x(0.5f32);
        assert_eq!(
            m.transform_point_2d(Point2::new(1.0, 4.0)),
            Point2::new(3.0, 4.0)
        );
    }
}
