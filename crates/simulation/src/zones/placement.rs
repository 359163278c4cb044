//! User/tool-driven rezoning and its read-only preview queries.

use bevy::prelude::*;

use crate::grid::{WorldGrid, ZoneType};
use crate::sector_grid::GridRect;

use super::layer::ZoneLayer;

/// Per-tile legality plus aggregate cost for a rectangle the UI is about to
/// zone. `tiles` is row-major over the queried rectangle.
#[derive(Debug, Clone)]
pub struct ZonePreview {
    pub tiles: Vec<bool>,
    pub zoneable: u32,
    pub cost: i64,
}

/// A tile can be rezoned to `zone` iff it is buildable terrain, unoccupied,
/// and not already of that type.
pub fn can_zone_tile(layer: &ZoneLayer, grid: &WorldGrid, zone: ZoneType, x: usize, y: usize) -> bool {
    zone.is_growable()
        && layer.in_bounds(x, y)
        && layer.zone_at(x, y) != zone
        && grid.get(x, y).cell_type.is_buildable()
        && grid.get(x, y).building_id.is_none()
}

/// Read-only preview used by the UI before committing a [`place_zone`] call.
pub fn query_can_zone_tiles(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    zone: ZoneType,
    rect: GridRect,
    price_per_tile: i64,
) -> ZonePreview {
    let mut tiles = Vec::with_capacity(rect.area());
    let mut zoneable = 0u32;
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let ok = can_zone_tile(layer, grid, zone, x, y);
            zoneable += ok as u32;
            tiles.push(ok);
        }
    }
    ZonePreview {
        tiles,
        zoneable,
        cost: zoneable as i64 * price_per_tile,
    }
}

pub fn zone_cost(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    zone: ZoneType,
    rect: GridRect,
    price_per_tile: i64,
) -> i64 {
    query_can_zone_tiles(layer, grid, zone, rect, price_per_tile).cost
}

/// Rezone a rectangle. Tiles already of the requested type are left
/// untouched (repeated identical calls are idempotent); occupied or
/// unbuildable tiles are rejected and logged, never silently rewritten.
/// Returns the number of tiles actually zoned.
///
/// A rectangle outside the city bounds is a programmer error and asserts.
pub fn place_zone(layer: &mut ZoneLayer, grid: &WorldGrid, zone: ZoneType, rect: GridRect) -> u32 {
    assert!(
        rect.right() <= layer.width() && rect.bottom() <= layer.height(),
        "place_zone: rectangle outside city bounds"
    );
    if !zone.is_growable() {
        warn!("place_zone: ZoneType::None is not a placeable zone");
        return 0;
    }

    let mut zoned = 0u32;
    let mut rejected = 0u32;
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            if layer.zone_at(x, y) == zone {
                continue;
            }
            let cell = grid.get(x, y);
            if cell.cell_type.is_buildable() && cell.building_id.is_none() {
                layer.set_zone(x, y, zone);
                zoned += 1;
            } else {
                rejected += 1;
            }
        }
    }
    if rejected > 0 {
        warn!("place_zone: {rejected} tiles rejected (occupied or unbuildable)");
    }
    zoned
}
