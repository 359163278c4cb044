use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellType {
    #[default]
    Grass,
    Water,
}

impl CellType {
    pub fn is_buildable(self) -> bool {
        matches!(self, CellType::Grass)
    }
}

/// Tile-level zoning classification. `None` means "not zoned" and must never
/// reach the desirability or growth formulas, which are defined only over the
/// three real zone types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ZoneType {
    #[default]
    None,
    Residential,
    Commercial,
    Industrial,
}

impl ZoneType {
    /// The three zone types that buildings can spontaneously grow into,
    /// in the order the growth pass visits them.
    pub const GROWABLE: [ZoneType; 3] = [
        ZoneType::Residential,
        ZoneType::Commercial,
        ZoneType::Industrial,
    ];

    pub fn is_growable(self) -> bool {
        self != ZoneType::None
    }

    /// Index into the per-zone arrays kept by the zone layer. `None` has no
    /// slot there.
    pub fn index(self) -> Option<usize> {
        match self {
            ZoneType::None => None,
            ZoneType::Residential => Some(0),
            ZoneType::Commercial => Some(1),
            ZoneType::Industrial => Some(2),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Cell {
    pub cell_type: CellType,
    /// Entity of the building occupying this tile, if any. A multi-tile
    /// building stamps its id over every tile of its footprint.
    pub building_id: Option<Entity>,
}

#[derive(Resource)]
pub struct WorldGrid {
    pub cells: Vec<Cell>,
    pub width: usize,
    pub height: usize,
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }
}
