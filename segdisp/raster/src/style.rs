use rgb::RGBA8;

use crate::RasterError;

/// Describes how a visual layer of a segment is rendered.
///
/// Colors are non-premultiplied. Lengths are measured in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Whether the compositor draws the layer at all. Doesn't affect
    /// rasterization.
    pub enabled: bool,
    /// The fill color of the outline.
    pub fill: Option<RGBA8>,
    pub stroke: Option<Stroke>,
    /// Blurs and expands the filled/stroked pixels.
    pub glow: Option<Glow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: RGBA8,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// The radius of the max filter applied before blurring.
    pub dilate: f32,
    /// The standard deviation of the blur.
    pub blur: f32,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            fill: None,
            stroke: None,
            glow: None,
        }
    }
}

impl LayerStyle {
    /// Construct an enabled `LayerStyle` that fills the outline with `color`.
    pub fn solid(color: RGBA8) -> Self {
        Self {
            enabled: true,
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Construct an enabled `LayerStyle` that renders a glow of `color`.
    pub fn glowing(color: RGBA8, dilate: f32, blur: f32) -> Self {
        Self {
            glow: Some(Glow { dilate, blur }),
            ..Self::solid(color)
        }
    }

    /// Assign `enabled`, returning a new `LayerStyle`.
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Assign `fill`, returning a new `LayerStyle`.
    pub fn with_fill(self, fill: Option<RGBA8>) -> Self {
        Self { fill, ..self }
    }

    /// Assign `stroke`, returning a new `LayerStyle`.
    pub fn with_stroke(self, stroke: Option<Stroke>) -> Self {
        Self { stroke, ..self }
    }

    /// Assign `glow`, returning a new `LayerStyle`.
    pub fn with_glow(self, glow: Option<Glow>) -> Self {
        Self { glow, ..self }
    }

    pub(crate) fn validate(&self) -> Result<(), RasterError> {
        let valid_len = |x: f32| x.is_finite() && x >= 0.0;

        if let Some(stroke) = &self.stroke {
            if !valid_len(stroke.width) {
                return Err(RasterError::InvalidParameter("stroke width"));
            }
        }
        if let Some(glow) = &self.glow {
            if !valid_len(glow.dilate) {
                return Err(RasterError::InvalidParameter("glow dilation"));
            }
            if !valid_len(glow.blur) {
                return Err(RasterError::InvalidParameter("glow blur"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate() {
        let red = RGBA8::new(255, 0, 0, 255);
        assert!(LayerStyle::solid(red).validate().is_ok());
        assert!(LayerStyle::glowing(red, 2.0, 3.0).validate().is_ok());
        assert_eq!(
            LayerStyle::glowing(red, std::f32::NAN, 3.0).validate(),
            Err(RasterError::InvalidParameter("glow dilation"))
        );
        assert_eq!(
            LayerStyle::glowing(red, 1.0, -3.0).validate(),
            Err(RasterError::InvalidParameter("glow blur"))
        );
        assert_eq!(
            LayerStyle::solid(red)
                .with_stroke(Some(Stroke {
                    color: red,
                    width: std::f32::INFINITY
                }))
                .validate(),
            Err(RasterError::InvalidParameter("stroke width"))
        );
    }
}
