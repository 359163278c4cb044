//! Zone layer data model: per-tile zone types, per-zone desirability grids,
//! sector membership bitsets, and the ranked sector permutations the growth
//! pass walks. Owned exclusively by the city world; other systems read it
//! through the query methods and never write it directly.

use bevy::prelude::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH, SECTORS_PER_TICK, SECTOR_SIZE};
use crate::grid::ZoneType;
use crate::sector_grid::{GridRect, SectorGrid, SectorRecord};

pub const GROWABLE_ZONE_COUNT: usize = ZoneType::GROWABLE.len();

// Zone-presence flag bits, indexed by ZoneType::index().
pub(crate) const HAS_ZONE: [u8; 3] = [1 << 0, 1 << 2, 1 << 4];
pub(crate) const HAS_EMPTY_ZONE: [u8; 3] = [1 << 1, 1 << 3, 1 << 5];

/// Per-sector record: bounds, zone-presence flags, and the cached average
/// desirability per zone type. Entirely recomputed on each sector visit; the
/// cached averages are read between visits by the ranking step.
#[derive(Debug, Clone)]
pub struct ZoneSector {
    bounds: GridRect,
    pub(crate) flags: u8,
    pub(crate) avg_desirability: [f32; GROWABLE_ZONE_COUNT],
}

impl SectorRecord for ZoneSector {
    fn new(bounds: GridRect) -> Self {
        Self {
            bounds,
            flags: 0,
            avg_desirability: [0.0; GROWABLE_ZONE_COUNT],
        }
    }

    fn bounds(&self) -> GridRect {
        self.bounds
    }
}

impl ZoneSector {
    pub fn has_zone(&self, zone_index: usize) -> bool {
        self.flags & HAS_ZONE[zone_index] != 0
    }

    pub fn has_empty_zone(&self, zone_index: usize) -> bool {
        self.flags & HAS_EMPTY_ZONE[zone_index] != 0
    }

    pub fn avg_desirability(&self, zone_index: usize) -> f32 {
        self.avg_desirability[zone_index]
    }
}

/// Compact sector membership set with O(1) test/set and a cheap
/// "is anything set" check to short-circuit growth when no empty zones
/// remain anywhere.
#[derive(Debug, Clone, Default)]
pub struct SectorBitset {
    words: Vec<u64>,
}

impl SectorBitset {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        self.words[index / 64] |= 1 << (index % 64);
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.words[index / 64] &= !(1 << (index % 64));
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        self.words[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }
}

#[derive(Resource)]
pub struct ZoneLayer {
    width: usize,
    height: usize,
    pub(crate) tile_zone: Vec<ZoneType>,
    /// One byte grid per growable zone type; 0–255 is the clamped 0–100%
    /// desirability score. Rewritten only by the sector refresh pass.
    pub(crate) desirability: [Vec<u8>; GROWABLE_ZONE_COUNT],
    pub(crate) sectors: SectorGrid<ZoneSector>,
    pub(crate) with_zones: [SectorBitset; GROWABLE_ZONE_COUNT],
    pub(crate) with_empty_zones: [SectorBitset; GROWABLE_ZONE_COUNT],
    /// Permutation of all sector indices, most desirable first. Re-derived by
    /// a full sort after every batch of sector visits.
    pub(crate) ranked: [Vec<usize>; GROWABLE_ZONE_COUNT],
    /// Set after deserialization: the next update visits every sector once
    /// instead of the amortized batch, rebuilding all derived state.
    pub(crate) needs_full_refresh: bool,
}

impl Default for ZoneLayer {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT, SECTOR_SIZE, SECTORS_PER_TICK)
    }
}

impl ZoneLayer {
    pub fn new(
        width: usize,
        height: usize,
        sector_size: usize,
        sectors_per_tick: usize,
    ) -> Self {
        let sectors: SectorGrid<ZoneSector> =
            SectorGrid::new(width, height, sector_size, sectors_per_tick);
        let sector_count = sectors.len();
        Self {
            width,
            height,
            tile_zone: vec![ZoneType::None; width * height],
            desirability: std::array::from_fn(|_| vec![0; width * height]),
            with_zones: std::array::from_fn(|_| SectorBitset::new(sector_count)),
            with_empty_zones: std::array::from_fn(|_| SectorBitset::new(sector_count)),
            ranked: std::array::from_fn(|_| (0..sector_count).collect()),
            sectors,
            needs_full_refresh: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub(crate) fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn zone_at(&self, x: usize, y: usize) -> ZoneType {
        self.tile_zone[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn set_zone(&mut self, x: usize, y: usize, zone: ZoneType) {
        let idx = self.index(x, y);
        self.tile_zone[idx] = zone;
    }

    /// Stored desirability byte for a growable zone at (x, y). Returns 0 and
    /// logs for `ZoneType::None`, which has no desirability.
    pub fn desirability_at(&self, zone: ZoneType, x: usize, y: usize) -> u8 {
        match zone.index() {
            Some(zi) => self.desirability[zi][self.index(x, y)],
            None => {
                warn!("desirability_at: ZoneType::None has no desirability");
                0
            }
        }
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn sector_containing(&self, x: usize, y: usize) -> Option<&ZoneSector> {
        self.sectors.sector_at(x, y)
    }

    /// True while any sector still holds an unoccupied tile of this zone
    /// type, according to the cached bitsets.
    pub fn has_empty_zones(&self, zone: ZoneType) -> bool {
        match zone.index() {
            Some(zi) => self.with_empty_zones[zi].any(),
            None => false,
        }
    }

    /// Ranked sector indices for a growable zone, most desirable first.
    pub fn ranked_sectors(&self, zone: ZoneType) -> &[usize] {
        match zone.index() {
            Some(zi) => &self.ranked[zi],
            None => &[],
        }
    }

    pub fn request_full_refresh(&mut self) {
        self.needs_full_refresh = true;
    }
}
