use cgmath::Deg;
use log::{debug, trace};
use once_cell::sync::Lazy;
use quick_error::quick_error;
use rayon::prelude::*;
use segdisp_geom::{builtin, Geometry, Outline, SegmentType, MAX_SEGMENTS};
use segdisp_raster::{rasterize, CellLayout, LayerStyle, RasterError, Surface};
use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    time::Instant,
};

use crate::{DisplayConfig, DisplayId, DisplayStyle, Layer, SegmentIndex};

quick_error! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum RasterizeError {
        /// The display has no cache partition.
        UnknownDisplay(id: DisplayId) {
            display("display {} is not configured", id)
        }
        /// Some surfaces couldn't be rasterized. The other surfaces were
        /// stored nonetheless.
        Rasterization(failures: Vec<SlotFailure>) {
            display("failed to rasterize {} surface(s)", failures.len())
        }
    }
}

/// A surface [`RasterCache`] failed to rasterize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotFailure {
    pub layer: Layer,
    pub index: SegmentIndex,
    pub error: RasterError,
}

/// Stores the rasterized surfaces of segments, partitioned by display.
///
/// A surface is identified by `(DisplayId, Layer, SegmentType, SegmentIndex)`.
/// [`Layer::Background`] has a single [`SegmentIndex::Full`] surface; the
/// other layers have one surface per segment.
///
/// # Concurrency
///
/// All methods take `&self` and may be called from any thread. Surfaces are
/// never modified after they are stored; an update replaces the stored
/// `Arc<Surface>`, so readers never observe a partially drawn surface. Every
/// layer of every display has its own lock, so updating one layer doesn't
/// block readers of another. Rasterization happens outside of any lock.
pub struct RasterCache {
    geometry: Box<dyn Geometry>,
    displays: RwLock<HashMap<DisplayId, Arc<Partition>>>,
    /// The last generation number assigned to a rasterization request.
    generation: AtomicU64,
}

/// The surfaces of a display.
pub(crate) struct Partition {
    segment_type: SegmentType,
    cell: CellLayout,
    /// Indexed by `Layer::index`.
    layers: Vec<LayerSlots>,
}

struct LayerSlots {
    /// The generation of the newest request that has claimed each slot.
    /// Requests skip slots claimed by a newer request.
    claimed: Vec<AtomicU64>,
    slots: RwLock<Vec<Slot>>,
}

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    /// The generation of the request that produced `surface`.
    generation: u64,
    surface: Option<Arc<Surface>>,
}

static GLOBAL: Lazy<Arc<RasterCache>> = Lazy::new(|| Arc::new(RasterCache::with_builtin_geometry()));

impl RasterCache {
    /// Construct an empty `RasterCache` that takes segment outlines from
    /// `geometry`.
    pub fn new(geometry: impl Geometry) -> Self {
        Self {
            geometry: Box::new(geometry),
            displays: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Construct an empty `RasterCache` using the built-in geometry.
    pub fn with_builtin_geometry() -> Self {
        Self::new(builtin())
    }

    /// Get the process-wide `RasterCache`, which uses the built-in geometry.
    pub fn global() -> Arc<RasterCache> {
        Arc::clone(&GLOBAL)
    }

    pub fn geometry(&self) -> &dyn Geometry {
        &*self.geometry
    }

    /// Get the number of segments of `segment_type`.
    pub fn segment_count(&self, segment_type: SegmentType) -> usize {
        self.geometry.segment_count(segment_type)
    }

    /// Rasterize every surface of a display and install them as a new
    /// partition, replacing any existing partition of the same display.
    ///
    /// The surfaces are rasterized in parallel. Surfaces that fail to
    /// rasterize are left absent and reported through
    /// [`RasterizeError::Rasterization`]; the partition is installed in any
    /// case.
    ///
    /// Panics if the geometry has more than [`MAX_SEGMENTS`] segments.
    pub fn rasterize_all(
        &self,
        config: &DisplayConfig,
        style: &DisplayStyle,
    ) -> Result<(), RasterizeError> {
        let ty = config.segment_type;
        let segment_count = self.segment_count(ty);
        assert!(
            segment_count <= MAX_SEGMENTS,
            "{} has {} segments, more than {}",
            ty,
            segment_count,
            MAX_SEGMENTS
        );
        let generation = self.next_generation();
        let start = Instant::now();

        let jobs: Vec<(Layer, usize)> = Layer::Z_ORDER
            .iter()
            .flat_map(|&layer| (0..slot_count(layer, segment_count)).map(move |i| (layer, i)))
            .collect();

        let results: Vec<Result<Surface, RasterError>> = jobs
            .par_iter()
            .map(|&(layer, i)| {
                rasterize(
                    self.outline(ty, layer, i),
                    style.layer(layer),
                    style.skew_angle,
                    &config.cell,
                )
            })
            .collect();

        let mut failures = Vec::new();
        let mut slots: Vec<Vec<Slot>> = vec![Vec::new(); Layer::Z_ORDER.len()];
        for (&(layer, i), result) in jobs.iter().zip(results) {
            let surface = match result {
                Ok(surface) => Some(Arc::new(surface)),
                Err(error) => {
                    failures.push(SlotFailure {
                        layer,
                        index: segment_index(layer, i),
                        error,
                    });
                    None
                }
            };
            slots[layer.index()].push(Slot {
                generation,
                surface,
            });
        }

        let partition = Arc::new(Partition {
            segment_type: ty,
            cell: config.cell,
            layers: slots
                .into_iter()
                .map(|slots| LayerSlots {
                    claimed: slots.iter().map(|_| AtomicU64::new(generation)).collect(),
                    slots: RwLock::new(slots),
                })
                .collect(),
        });

        let replaced = self.write_displays().insert(config.id, partition).is_some();

        debug!(
            "rasterized {} surface(s) of display {} ({}, {:?}) in {:?}{}",
            jobs.len() - failures.len(),
            config.id,
            ty,
            config.cell.size,
            start.elapsed(),
            if replaced { ", replacing the old partition" } else { "" }
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RasterizeError::Rasterization(failures))
        }
    }

    /// Rasterize the surfaces of `layer` at `indices` using `style` and
    /// replace the stored ones.
    ///
    /// [`Layer::Background`] ignores `indices` and rasterizes its
    /// [`SegmentIndex::Full`] surface instead.
    ///
    /// When requests for the same surface overlap, the one issued last wins
    /// regardless of the order in which they finish. Surfaces already claimed
    /// by a newer request are not rasterized at all. Surfaces that fail to
    /// rasterize keep their previous contents and are reported through
    /// [`RasterizeError::Rasterization`].
    ///
    /// Panics if any of `indices` is out of range for the display's segment
    /// type.
    pub fn rasterize_layer(
        &self,
        display: DisplayId,
        layer: Layer,
        style: &LayerStyle,
        indices: impl IntoIterator<Item = usize>,
        skew_angle: Deg<f32>,
    ) -> Result<(), RasterizeError> {
        let generation = self.next_generation();
        self.rasterize_layer_as(generation, display, layer, style, indices, skew_angle)
    }

    /// Like [`RasterCache::rasterize_layer`], but with a generation number
    /// obtained from [`RasterCache::next_generation`] beforehand. This lets
    /// the caller order requests by something other than the time of the
    /// call.
    pub(crate) fn rasterize_layer_as(
        &self,
        generation: u64,
        display: DisplayId,
        layer: Layer,
        style: &LayerStyle,
        indices: impl IntoIterator<Item = usize>,
        skew_angle: Deg<f32>,
    ) -> Result<(), RasterizeError> {
        let partition = self
            .partition(display)
            .ok_or(RasterizeError::UnknownDisplay(display))?;
        let ty = partition.segment_type;

        let mut slots: Vec<usize> = if layer.is_per_segment() {
            let segment_count = self.segment_count(ty);
            indices
                .into_iter()
                .inspect(|&i| assert_index_in_range(ty, i, segment_count))
                .collect()
        } else {
            vec![0]
        };
        slots.sort_unstable();
        slots.dedup();

        let layer_slots = &partition.layers[layer.index()];

        for &i in slots.iter() {
            layer_slots.claimed[i].fetch_max(generation, Ordering::AcqRel);
        }

        let results: Vec<(usize, Result<Surface, RasterError>)> = slots
            .par_iter()
            .filter_map(|&i| {
                if layer_slots.claimed[i].load(Ordering::Acquire) > generation {
                    trace!("{} of {} superseded, skipping", segment_index(layer, i), layer);
                    return None;
                }
                Some((
                    i,
                    rasterize(self.outline(ty, layer, i), style, skew_angle, &partition.cell),
                ))
            })
            .collect();

        let mut failures = Vec::new();
        {
            let mut stored = write_lock(&layer_slots.slots);
            for (i, result) in results {
                match result {
                    Ok(surface) => {
                        let slot = &mut stored[i];
                        if slot.generation < generation {
                            *slot = Slot {
                                generation,
                                surface: Some(Arc::new(surface)),
                            };
                        }
                    }
                    Err(error) => failures.push(SlotFailure {
                        layer,
                        index: segment_index(layer, i),
                        error,
                    }),
                }
            }
        }

        trace!(
            "rasterized {} of display {} ({} slot(s), generation {})",
            layer,
            display,
            slots.len(),
            generation
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RasterizeError::Rasterization(failures))
        }
    }

    /// Get a stored surface.
    ///
    /// Returns `None` if the surface is absent, including when the display
    /// isn't configured or `segment_type` doesn't match the display's segment
    /// type.
    ///
    /// Panics if `index` is out of range for `segment_type`.
    pub fn get(
        &self,
        display: DisplayId,
        layer: Layer,
        segment_type: SegmentType,
        index: SegmentIndex,
    ) -> Option<Arc<Surface>> {
        if let SegmentIndex::Segment(i) = index {
            assert_index_in_range(segment_type, i, self.segment_count(segment_type));
        }

        let partition = self.partition(display)?;
        if partition.segment_type != segment_type {
            return None;
        }
        let slot = slot_of(layer, index)?;
        let surface = partition.read_layer(layer)[slot].surface.clone();
        surface
    }

    /// Remove the partition of a display. Returns `false` if the display
    /// wasn't configured.
    pub fn dispose(&self, display: DisplayId) -> bool {
        let removed = self.write_displays().remove(&display).is_some();
        if removed {
            debug!("disposed the partition of display {}", display);
        }
        removed
    }

    /// Return `true` if the display has a partition.
    pub fn contains(&self, display: DisplayId) -> bool {
        self.read_displays().contains_key(&display)
    }

    /// Get the number of partitions.
    pub fn display_count(&self) -> usize {
        self.read_displays().len()
    }

    pub(crate) fn partition(&self, display: DisplayId) -> Option<Arc<Partition>> {
        self.read_displays().get(&display).cloned()
    }

    fn outline(&self, ty: SegmentType, layer: Layer, slot: usize) -> &Outline {
        if layer.is_per_segment() {
            &self.geometry.outlines(ty)[slot]
        } else {
            self.geometry.full_outline(ty)
        }
    }

    /// Reserve a generation number. Requests with greater numbers win.
    pub(crate) fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn read_displays(&self) -> RwLockReadGuard<'_, HashMap<DisplayId, Arc<Partition>>> {
        self.displays.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_displays(&self) -> RwLockWriteGuard<'_, HashMap<DisplayId, Arc<Partition>>> {
        self.displays.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RasterCache {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RasterCache")
            .field("displays", &self.read_displays().keys().collect::<Vec<_>>())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Partition {
    pub(crate) fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    /// Lock the slots of `layer` for reading. The slots of a per-segment
    /// layer are indexed by segment index; the background layer has a single
    /// slot.
    pub(crate) fn read_layer(&self, layer: Layer) -> RwLockReadGuard<'_, Vec<Slot>> {
        self.layers[layer.index()]
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Slot {
    pub(crate) fn surface(&self) -> Option<&Surface> {
        self.surface.as_deref()
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn assert_index_in_range(ty: SegmentType, i: usize, segment_count: usize) {
    assert!(
        i < segment_count,
        "segment index {} is out of range for {} ({} segments)",
        i,
        ty,
        segment_count
    );
}

fn slot_count(layer: Layer, segment_count: usize) -> usize {
    if layer.is_per_segment() {
        segment_count
    } else {
        1
    }
}

fn slot_of(layer: Layer, index: SegmentIndex) -> Option<usize> {
    match (layer.is_per_segment(), index) {
        (true, SegmentIndex::Segment(i)) => Some(i),
        (false, SegmentIndex::Full) => Some(0),
        _ => None,
    }
}

fn segment_index(layer: Layer, slot: usize) -> SegmentIndex {
    if layer.is_per_segment() {
        SegmentIndex::Segment(slot)
    } else {
        SegmentIndex::Full
    }
}
