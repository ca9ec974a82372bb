use segdisp_geom::SegmentType;
use segdisp_raster::Surface;

use crate::{DisplayId, DisplayStyle, Layer, LitMask, RasterCache};

/// Draw the cached surfaces of a character cell onto `dest`.
///
/// The layers are drawn in [`Layer::Z_ORDER`], each only if it's enabled in
/// `style` (nothing else in `style` is consulted). The background's full
/// segment is drawn regardless of `lit`; the other layers only draw the lit
/// segments. Bits of `lit` past the segment count are ignored. Every surface
/// is drawn with its top-left corner at `offset`.
///
/// Absent surfaces are skipped, so compositing a display without a cache
/// partition (or with a different segment type) draws nothing. `dest` isn't
/// cleared beforehand.
pub fn composite(
    cache: &RasterCache,
    display: DisplayId,
    segment_type: SegmentType,
    lit: LitMask,
    style: &DisplayStyle,
    dest: &mut Surface,
    offset: [isize; 2],
) {
    let partition = match cache.partition(display) {
        Some(p) if p.segment_type() == segment_type => p,
        _ => return,
    };

    for &layer in Layer::Z_ORDER.iter() {
        if !style.layer(layer).enabled {
            continue;
        }

        let slots = partition.read_layer(layer);

        if layer.is_per_segment() {
            for i in lit.lit_segments(slots.len()) {
                if let Some(surface) = slots[i].surface() {
                    dest.draw_surface(surface, offset);
                }
            }
        } else if let Some(surface) = slots.first().and_then(|s| s.surface()) {
            dest.draw_surface(surface, offset);
        }
    }
}
