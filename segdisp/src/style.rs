use cgmath::Deg;
use rgb::RGBA8;
use segdisp_geom::SegmentType;
use segdisp_raster::{CellLayout, LayerStyle};

use crate::{DisplayId, Layer};

/// The styles of all layers of a display.
///
/// `DisplayStyle` is a value type. A style change produces a new
/// `DisplayStyle` (see [`DisplayStyle::with_layer`]) instead of mutating a
/// shared one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStyle {
    pub foreground: LayerStyle,
    pub inner_glow: LayerStyle,
    pub outer_glow: LayerStyle,
    pub background: LayerStyle,
    /// The skew applied to every layer. Positive values lean the glyphs to the
    /// right.
    pub skew_angle: Deg<f32>,
}

impl Default for DisplayStyle {
    /// Orange plasma segments on a dim unlit glyph.
    fn default() -> Self {
        let lit = RGBA8::new(255, 110, 20, 255);
        Self {
            foreground: LayerStyle::solid(RGBA8::new(255, 190, 120, 255)),
            inner_glow: LayerStyle::glowing(RGBA8 { a: 200, ..lit }, 1.0, 1.5),
            outer_glow: LayerStyle::glowing(RGBA8 { a: 96, ..lit }, 3.0, 5.0),
            background: LayerStyle::solid(RGBA8::new(40, 22, 12, 255)),
            skew_angle: Deg(0.0),
        }
    }
}

impl DisplayStyle {
    pub fn layer(&self, layer: Layer) -> &LayerStyle {
        match layer {
            Layer::Foreground => &self.foreground,
            Layer::InnerGlow => &self.inner_glow,
            Layer::OuterGlow => &self.outer_glow,
            Layer::Background => &self.background,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut LayerStyle {
        match layer {
            Layer::Foreground => &mut self.foreground,
            Layer::InnerGlow => &mut self.inner_glow,
            Layer::OuterGlow => &mut self.outer_glow,
            Layer::Background => &mut self.background,
        }
    }

    /// Replace the style of `layer`, returning a new `DisplayStyle`.
    pub fn with_layer(mut self, layer: Layer, style: LayerStyle) -> Self {
        *self.layer_mut(layer) = style;
        self
    }

    /// Assign `skew_angle`, returning a new `DisplayStyle`.
    pub fn with_skew_angle(self, skew_angle: Deg<f32>) -> Self {
        Self { skew_angle, ..self }
    }
}

/// The configuration of a display, fixed for the lifetime of its cache
/// partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    pub id: DisplayId,
    pub segment_type: SegmentType,
    /// The layout of every surface of the display.
    pub cell: CellLayout,
}

impl DisplayConfig {
    pub fn new(id: DisplayId, segment_type: SegmentType, cell: CellLayout) -> Self {
        Self {
            id,
            segment_type,
            cell,
        }
    }

    /// Get the configuration of the settings preview of this display.
    pub fn for_preview(&self) -> Self {
        Self {
            id: self.id.preview(),
            ..*self
        }
    }

    /// Assign `cell`, returning a new `DisplayConfig`.
    pub fn with_cell(self, cell: CellLayout) -> Self {
        Self { cell, ..self }
    }
}
