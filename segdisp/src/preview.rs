use log::{debug, warn};
use rgb::RGBA8;
use segdisp_raster::{LayerStyle, Surface};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, PoisonError, RwLock,
};

use crate::{
    charmap::PREVIEW_MASK, composite, DisplayConfig, DisplayStyle, Layer, LitMask, RasterCache,
    RasterizeError,
};

/// Drives the rendering of a single character cell from style-change events
/// and redraw ticks, like the live preview of a display settings window.
///
/// [`Preview::set_layer_style`] and [`Preview::redraw`] take `&self` and may
/// be called from different threads. The current [`DisplayStyle`] is kept as
/// an immutable snapshot that is replaced on every change.
///
/// The cache partition of the display is created by [`Preview::new`] and
/// disposed when the `Preview` is dropped.
#[derive(Debug)]
pub struct Preview {
    cache: Arc<RasterCache>,
    config: DisplayConfig,
    style: RwLock<Arc<DisplayStyle>>,
    lit: AtomicU32,
    offset: [isize; 2],
    clear_color: RGBA8,
}

impl Preview {
    /// Construct a `Preview`, rasterizing every surface of the display.
    ///
    /// Surfaces that fail to rasterize are logged and left out of the
    /// rendered frames.
    ///
    /// The partition is identified by `config.id` alone. Two `Preview`s
    /// sharing a `RasterCache` and a display id share the partition, and
    /// dropping either of them disposes it for both.
    pub fn new(cache: Arc<RasterCache>, config: DisplayConfig, style: DisplayStyle) -> Self {
        if let Err(e) = cache.rasterize_all(&config, &style) {
            warn!("preview of display {}: {}", config.id, e);
            log_failures(&e);
        }

        Self {
            cache,
            config,
            style: RwLock::new(Arc::new(style)),
            lit: AtomicU32::new(PREVIEW_MASK.0),
            offset: [0, 0],
            clear_color: RGBA8::new(0, 0, 0, 255),
        }
    }

    /// Assign the position of the cell in a frame, returning a new `Preview`.
    pub fn with_offset(mut self, offset: [isize; 2]) -> Self {
        self.offset = offset;
        self
    }

    /// Assign the color a frame is cleared with before compositing,
    /// returning a new `Preview`. Defaults to opaque black.
    pub fn with_clear_color(mut self, clear_color: RGBA8) -> Self {
        self.clear_color = clear_color;
        self
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Get a snapshot of the current style.
    pub fn style(&self) -> Arc<DisplayStyle> {
        Arc::clone(&self.style.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn lit_mask(&self) -> LitMask {
        LitMask(self.lit.load(Ordering::Relaxed))
    }

    /// Set the segments drawn by the subsequent frames.
    pub fn set_lit_mask(&self, lit: LitMask) {
        self.lit.store(lit.0, Ordering::Relaxed);
    }

    /// Handle a style-change event.
    ///
    /// If `style` is identical to the current style of `layer`, nothing
    /// happens and `Ok(false)` is returned. Otherwise, the style snapshot is
    /// replaced and the surfaces of `layer` are rasterized again.
    pub fn set_layer_style(&self, layer: Layer, style: LayerStyle) -> Result<bool, RasterizeError> {
        // The generation is taken together with the snapshot so that the
        // cache ends up with the surfaces of the last stored style
        let (skew_angle, generation) = {
            let mut current = self.style.write().unwrap_or_else(PoisonError::into_inner);
            if *current.layer(layer) == style {
                return Ok(false);
            }
            *current = Arc::new(current.with_layer(layer, style));
            (current.skew_angle, self.cache.next_generation())
        };

        debug!("{} of display {} changed", layer, self.config.id);

        let segment_count = self.cache.segment_count(self.config.segment_type);
        self.cache
            .rasterize_layer_as(
                generation,
                self.config.id,
                layer,
                &style,
                0..segment_count,
                skew_angle,
            )
            .map(|()| true)
            .map_err(|e| {
                warn!("{} of display {}: {}", layer, self.config.id, e);
                log_failures(&e);
                e
            })
    }

    /// Render a frame. `frame` is cleared first.
    pub fn redraw(&self, frame: &mut Surface) {
        let style = self.style();
        frame.clear(self.clear_color);
        composite(
            &self.cache,
            self.config.id,
            self.config.segment_type,
            self.lit_mask(),
            &style,
            frame,
            self.offset,
        );
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.cache.dispose(self.config.id);
    }
}

fn log_failures(e: &RasterizeError) {
    if let RasterizeError::Rasterization(failures) = e {
        for f in failures.iter() {
            debug!("  {} {}: {}", f.layer, f.index, f.error);
        }
    }
}
