//! Provides the vector outlines of the segments of segmented character cells.
//!
//! Outlines are expressed in a normalized cell space where the character cell
//! occupies `[0, 1] × [0, 1]` (x grows rightward, y grows downward). It's up
//! to the rasterizer to map this space onto actual pixels.
use std::fmt;

mod builtin;
mod outline;

pub use self::{builtin::*, outline::*};

/// The maximum number of segments a character cell can have. Lit segments are
/// specified by a 32-bit mask, so this can't be raised without changing the
/// mask type.
pub const MAX_SEGMENTS: usize = 32;

/// The geometry class of a character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentType {
    /// Seven bars and a decimal point.
    ///
    /// Bit order: `a b c d e f g dp`.
    Numeric8,

    /// Fourteen strokes, a comma, and a decimal point. This is the layout used
    /// by the alphanumeric displays of most solid-state pinball machines.
    ///
    /// Bit order: `a b c d e f g1 comma h j k g2 l m n dp`, where `h`, `k`,
    /// `l`, and `n` are the upper-left, upper-right, lower-left, and
    /// lower-right diagonals, and `j` and `m` are the upper and lower halves of
    /// the centre vertical.
    Alphanumeric14,

    /// Sixteen strokes (the top and bottom bars are split in halves) and a
    /// decimal point.
    ///
    /// Bit order: `a1 a2 b c d2 d1 e f g1 g2 h j k l m n dp`.
    Alphanumeric16,
}

impl SegmentType {
    /// All segment types known to the built-in geometry.
    pub const ALL: [SegmentType; 3] = [
        SegmentType::Numeric8,
        SegmentType::Alphanumeric14,
        SegmentType::Alphanumeric16,
    ];
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SegmentType::Numeric8 => "numeric8",
            SegmentType::Alphanumeric14 => "alnum14",
            SegmentType::Alphanumeric16 => "alnum16",
        })
    }
}

impl std::str::FromStr for SegmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numeric8" => Ok(SegmentType::Numeric8),
            "alnum14" => Ok(SegmentType::Alphanumeric14),
            "alnum16" => Ok(SegmentType::Alphanumeric16),
            _ => Err(format!("unknown segment type: {:?}", s)),
        }
    }
}

/// Supplies the outlines of character cells.
///
/// Implementations must be pure: the same `SegmentType` always yields the same
/// outlines. Passing a `SegmentType` an implementation doesn't support is a
/// programming error and should panic.
pub trait Geometry: Send + Sync + 'static {
    /// Get the outlines of the individual segments, ordered by segment index.
    /// The length must not exceed [`MAX_SEGMENTS`].
    fn outlines(&self, ty: SegmentType) -> &[Outline];

    /// Get the outline of the whole cell, used to draw the unlit background.
    fn full_outline(&self, ty: SegmentType) -> &Outline;

    /// Get the number of segments.
    fn segment_count(&self, ty: SegmentType) -> usize {
        self.outlines(ty).len()
    }
}

impl<T: Geometry + ?Sized> Geometry for &'static T {
    fn outlines(&self, ty: SegmentType) -> &[Outline] {
        (**self).outlines(ty)
    }

    fn full_outline(&self, ty: SegmentType) -> &Outline {
        (**self).full_outline(ty)
    }

    fn segment_count(&self, ty: SegmentType) -> usize {
        (**self).segment_count(ty)
    }
}
