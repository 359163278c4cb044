//! Generic sector partition of the tile grid.
//!
//! Every simulation layer that cannot afford a full-grid scan per tick splits
//! the world into fixed-size sectors and refreshes a bounded number of them
//! each tick via the round-robin cursor. The grid owns its sector records in
//! one contiguous allocation; records embed their own clipped bounds.

/// Axis-aligned tile rectangle. `right()`/`bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl GridRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Per-sector payload stored inside a [`SectorGrid`].
pub trait SectorRecord {
    fn new(bounds: GridRect) -> Self;
    fn bounds(&self) -> GridRect;
}

pub struct SectorGrid<T> {
    world_width: usize,
    world_height: usize,
    sector_size: usize,
    sectors_x: usize,
    sectors_y: usize,
    sectors_per_tick: usize,
    cursor: usize,
    sectors: Vec<T>,
}

impl<T: SectorRecord> SectorGrid<T> {
    pub fn new(
        world_width: usize,
        world_height: usize,
        sector_size: usize,
        sectors_per_tick: usize,
    ) -> Self {
        assert!(
            world_width > 0 && world_height > 0,
            "world dimensions must be positive"
        );
        assert!(sector_size > 0, "sector size must be positive");
        assert!(sectors_per_tick > 0, "sectors per tick must be positive");

        let sectors_x = world_width.div_ceil(sector_size);
        let sectors_y = world_height.div_ceil(sector_size);
        let mut sectors = Vec::with_capacity(sectors_x * sectors_y);
        for sy in 0..sectors_y {
            for sx in 0..sectors_x {
                let x = sx * sector_size;
                let y = sy * sector_size;
                // Edge sectors are clipped to the world bounds.
                let width = sector_size.min(world_width - x);
                let height = sector_size.min(world_height - y);
                sectors.push(T::new(GridRect::new(x, y, width, height)));
            }
        }

        Self {
            world_width,
            world_height,
            sector_size,
            sectors_x,
            sectors_y,
            sectors_per_tick,
            cursor: 0,
            sectors,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    #[inline]
    pub fn sectors_per_tick(&self) -> usize {
        self.sectors_per_tick
    }

    #[inline]
    pub fn get(&self, index: usize) -> &T {
        &self.sectors[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.sectors[index]
    }

    /// Index of the sector containing world tile (x, y), or `None` when the
    /// position is outside the world bounds.
    pub fn sector_index_at(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.world_width && y < self.world_height {
            Some((y / self.sector_size) * self.sectors_x + x / self.sector_size)
        } else {
            None
        }
    }

    pub fn sector_at(&self, x: usize, y: usize) -> Option<&T> {
        self.sector_index_at(x, y).map(|i| &self.sectors[i])
    }

    /// Returns the sector index at the round-robin cursor and advances it,
    /// wrapping modulo the sector count. The sole mechanism for spreading
    /// per-tile recomputation across ticks.
    pub fn next_index(&mut self) -> usize {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.sectors.len();
        index
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.sectors.iter()
    }
}
