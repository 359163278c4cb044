use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::ZoneType;
use crate::sector_grid::GridRect;

pub type BuildingDefId = u16;

/// One entry of the building catalog. Definitions are loaded by an external
/// asset pipeline; the zone engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingDef {
    pub id: BuildingDefId,
    pub name: String,
    pub zone: ZoneType,
    pub width: usize,
    pub height: usize,
    /// Residents housed (residential) or jobs provided (all other zones).
    pub capacity: u32,
    /// Whether the growth pass may place this definition spontaneously.
    pub growable: bool,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingCatalog {
    pub defs: Vec<BuildingDef>,
}

impl BuildingCatalog {
    pub fn get(&self, id: BuildingDefId) -> Option<&BuildingDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    pub fn growable_defs(&self, zone: ZoneType) -> Vec<&BuildingDef> {
        self.defs
            .iter()
            .filter(|d| d.growable && d.zone == zone)
            .collect()
    }

    /// Largest footprint among growable definitions of the zone, as
    /// (width, height) taken independently per axis. Bounds the rectangle
    /// expansion: there is no value in growing past the biggest building.
    pub fn max_growable_footprint(&self, zone: ZoneType) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for def in self.defs.iter().filter(|d| d.growable && d.zone == zone) {
            let (w, h) = best.unwrap_or((0, 0));
            best = Some((w.max(def.width), h.max(def.height)));
        }
        best
    }
}

/// A placed building. Every tile of `footprint` carries this entity's id in
/// `WorldGrid::cells[..].building_id`.
#[derive(Component, Debug, Clone)]
pub struct Building {
    pub def_id: BuildingDefId,
    pub zone: ZoneType,
    pub footprint: GridRect,
    pub capacity: u32,
}
