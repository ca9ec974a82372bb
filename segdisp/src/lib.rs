//! Renders segmented alphanumeric displays (the 14/16-segment character cells
//! found on pinball and arcade score displays) by compositing independently
//! styled layers.
//!
//! Every segment is rasterized once per layer and stored in a
//! [`RasterCache`]. Each frame, [`composite`] blits the cached surfaces of
//! the lit segments in the fixed layer order (background, outer glow, inner
//! glow, foreground). When the style of a layer changes, only that layer is
//! rasterized again.
//!
//! [`Preview`] ties these together the way a settings window does: it accepts
//! style-change events and redraw ticks from arbitrary threads.
//!
//! # Examples
//!
//! ```
//! use segdisp::{
//!     composite, CellLayout, DisplayConfig, DisplayId, DisplayStyle, LitMask, RasterCache,
//!     SegmentType, Surface,
//! };
//!
//! let cache = RasterCache::with_builtin_geometry();
//! let config = DisplayConfig::new(DisplayId(1), SegmentType::Alphanumeric14, CellLayout::new([40, 60]));
//! let style = DisplayStyle::default();
//! cache.rasterize_all(&config, &style).unwrap();
//!
//! let mut frame = Surface::new([40, 60]);
//! let lit = segdisp::charmap::lit_mask(SegmentType::Alphanumeric14, 'A').unwrap();
//! composite(&cache, config.id, config.segment_type, lit, &style, &mut frame, [0, 0]);
//! ```
use std::{fmt, ops};

mod cache;
pub mod charmap;
mod composite;
mod preview;
mod style;

pub use self::{cache::*, composite::*, preview::*, style::*};
pub use segdisp_geom::{builtin, Geometry, Outline, SegmentType, MAX_SEGMENTS};
pub use segdisp_raster::{
    rasterize, CellLayout, Glow, LayerStyle, RasterError, Stroke, Surface,
};

/// Identifies a logical display instance. Only used to partition the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// Get the identifier of the settings preview of this display.
    ///
    /// A preview never shares a cache partition with the display being
    /// edited, so the live display keeps its surfaces while the user
    /// experiments with styles.
    pub fn preview(self) -> Self {
        DisplayId(self.0.wrapping_add(100))
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A visual layer of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Foreground,
    InnerGlow,
    OuterGlow,
    /// The unlit glyph. Doesn't have per-segment surfaces.
    Background,
}

impl Layer {
    /// All layers, ordered from bottom to top.
    pub const Z_ORDER: [Layer; 4] = [
        Layer::Background,
        Layer::OuterGlow,
        Layer::InnerGlow,
        Layer::Foreground,
    ];

    /// Return `true` if the layer has a surface per segment (as opposed to a
    /// single [`SegmentIndex::Full`] surface).
    pub fn is_per_segment(self) -> bool {
        self != Layer::Background
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Layer::Foreground => "foreground",
            Layer::InnerGlow => "inner glow",
            Layer::OuterGlow => "outer glow",
            Layer::Background => "background",
        })
    }
}

/// Identifies a surface within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentIndex {
    /// The segment at the specified index.
    Segment(usize),
    /// The whole cell. Used by [`Layer::Background`].
    Full,
}

impl fmt::Display for SegmentIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SegmentIndex::Segment(i) => write!(f, "segment {}", i),
            SegmentIndex::Full => f.write_str("full segment"),
        }
    }
}

/// A set of lit segments. Bit `j` corresponds to segment `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LitMask(pub u32);

impl LitMask {
    pub const EMPTY: Self = LitMask(0);

    /// Construct a `LitMask` with the first `count` segments lit.
    ///
    /// Panics if `count` is greater than [`MAX_SEGMENTS`].
    pub fn all(count: usize) -> Self {
        assert!(count <= MAX_SEGMENTS, "too many segments: {}", count);
        if count == MAX_SEGMENTS {
            LitMask(!0)
        } else {
            LitMask((1u32 << count) - 1)
        }
    }

    /// Construct a `LitMask` from segment indices.
    ///
    /// Panics if any of the indices is out of range.
    pub fn from_segments(segments: impl IntoIterator<Item = usize>) -> Self {
        segments.into_iter().fold(Self::EMPTY, |m, i| {
            assert!(i < MAX_SEGMENTS, "segment index out of range: {}", i);
            LitMask(m.0 | 1 << i)
        })
    }

    /// Return `true` if segment `i` is lit. Indices past [`MAX_SEGMENTS`]
    /// are never lit.
    pub fn is_lit(self, i: usize) -> bool {
        i < MAX_SEGMENTS && (self.0 >> i) & 1 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the lit segments in `0..count`, in ascending order.
    pub fn lit_segments(self, count: usize) -> impl Iterator<Item = usize> {
        (0..count.min(MAX_SEGMENTS)).filter(move |&i| self.is_lit(i))
    }
}

impl ops::BitOr for LitMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        LitMask(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for LitMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Binary for LitMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn preview_id() {
        assert_eq!(DisplayId(3).preview(), DisplayId(103));
        assert_ne!(DisplayId(3).preview(), DisplayId(3));
    }

    #[test]
    fn lit_mask_bits() {
        let m = LitMask::from_segments(vec![0, 3, 31]);
        assert_eq!(m.0, 0x8000_0009);
        assert!(m.is_lit(3));
        assert!(!m.is_lit(4));
        assert!(!m.is_lit(40));
        assert_eq!(m.lit_segments(8).collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(m.lit_segments(64).collect::<Vec<_>>(), vec![0, 3, 31]);
    }

    #[test]
    fn lit_mask_all() {
        assert_eq!(LitMask::all(0), LitMask::EMPTY);
        assert_eq!(LitMask::all(2).0, 0b11);
        assert_eq!(LitMask::all(32).0, !0);
        assert_eq!(LitMask(0b01) | LitMask(0b10), LitMask::all(2));
    }

    #[test]
    #[should_panic]
    fn lit_mask_out_of_range() {
        LitMask::from_segments(vec![32]);
    }

    #[quickcheck]
    fn lit_segments_rebuild_mask(bits: u32, count: u8) -> bool {
        let count = count as usize % (MAX_SEGMENTS + 1);
        let mask = LitMask(bits);
        LitMask::from_segments(mask.lit_segments(count)) == LitMask(bits & LitMask::all(count).0)
    }

    #[test]
    fn z_order() {
        assert_eq!(Layer::Z_ORDER[0], Layer::Background);
        assert_eq!(Layer::Z_ORDER[3], Layer::Foreground);
        let mut indices: Vec<_> = Layer::Z_ORDER.iter().map(|l| l.index()).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
