//! Procedural building growth.
//!
//! For each zone type with positive demand, the pass walks the ranked sector
//! list for the most desirable empty zoned tile, expands it into a maximal
//! rectangle of acceptable tiles, picks a catalog definition that fits under
//! the capacity headroom, and places it. Exhaustion of tiles, quota, or
//! demand are normal termination, never errors; buildings placed earlier in
//! the tick are never rolled back.

use bevy::prelude::*;
use rand::Rng;

use crate::buildings::{Building, BuildingCatalog, BuildingDef};
use crate::game_params::GameParams;
use crate::grid::{WorldGrid, ZoneType};
use crate::roads::RoadAccessGrid;
use crate::sector_grid::{GridRect, SectorRecord};
use crate::sim_rng::SimRng;

use super::demand::{ZoneDemand, ZonePopulation};
use super::layer::ZoneLayer;

/// Sent for every building the growth pass places, so the renderer can
/// refresh tile visuals and pick a variant over the footprint.
#[derive(Event, Debug, Clone)]
pub struct BuildingGrown {
    pub entity: Entity,
    pub zone: ZoneType,
    pub footprint: GridRect,
}

/// A tile can receive growth of `zone` iff it is zoned as that type, on
/// buildable terrain, unoccupied, and close enough to a connected road.
/// Signed coordinates so rectangle expansion can probe past the world edge.
pub fn zone_acceptable(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    roads: &RoadAccessGrid,
    zone: ZoneType,
    max_road_distance: u16,
    x: isize,
    y: isize,
) -> bool {
    if x < 0 || y < 0 {
        return false;
    }
    let (x, y) = (x as usize, y as usize);
    layer.in_bounds(x, y)
        && layer.zone_at(x, y) == zone
        && grid.get(x, y).cell_type.is_buildable()
        && grid.get(x, y).building_id.is_none()
        && roads.distance_to_road(x, y) <= max_road_distance
}

/// Walk the ranked sector list from `resume` for the first acceptable tile.
/// Sectors whose empty-zone bit is unset are skipped; within a sector the
/// scan starts at a random (x, y) rotation so different ticks favor different
/// tiles. Returns the tile and the rank it was found at, so the caller can
/// resume there instead of re-scanning exhausted higher-ranked sectors.
fn find_candidate(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    roads: &RoadAccessGrid,
    rng: &mut SimRng,
    zone: ZoneType,
    zone_index: usize,
    max_road_distance: u16,
    resume: usize,
) -> Option<((usize, usize), usize)> {
    let ranked = &layer.ranked[zone_index];
    for rank in resume..ranked.len() {
        let sector_index = ranked[rank];
        if !layer.with_empty_zones[zone_index].get(sector_index) {
            continue;
        }
        let bounds = layer.sectors.get(sector_index).bounds();
        let off_x = rng.0.gen_range(0..bounds.width);
        let off_y = rng.0.gen_range(0..bounds.height);
        for row in 0..bounds.height {
            let y = bounds.y + (row + off_y) % bounds.height;
            for col in 0..bounds.width {
                let x = bounds.x + (col + off_x) % bounds.width;
                if zone_acceptable(
                    layer,
                    grid,
                    roads,
                    zone,
                    max_road_distance,
                    x as isize,
                    y as isize,
                ) {
                    return Some(((x, y), rank));
                }
            }
        }
    }
    None
}

fn edge_acceptable_x(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    roads: &RoadAccessGrid,
    zone: ZoneType,
    max_road_distance: u16,
    rect: &GridRect,
    new_x: isize,
) -> bool {
    (rect.y..rect.bottom()).all(|y| {
        zone_acceptable(layer, grid, roads, zone, max_road_distance, new_x, y as isize)
    })
}

fn edge_acceptable_y(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    roads: &RoadAccessGrid,
    zone: ZoneType,
    max_road_distance: u16,
    rect: &GridRect,
    new_y: isize,
) -> bool {
    (rect.x..rect.right()).all(|x| {
        zone_acceptable(layer, grid, roads, zone, max_road_distance, x as isize, new_y)
    })
}

/// Grow a 1x1 rectangle at `start` into a maximal rectangle of acceptable
/// tiles: pick a random axis among those still able to grow, try a random
/// direction first and the opposite one on failure, give up on an axis once
/// both directions fail, and stop once both dimensions reach the largest
/// growable footprint.
fn expand_rect(
    layer: &ZoneLayer,
    grid: &WorldGrid,
    roads: &RoadAccessGrid,
    rng: &mut SimRng,
    zone: ZoneType,
    max_road_distance: u16,
    start: (usize, usize),
    max_footprint: (usize, usize),
) -> GridRect {
    let mut rect = GridRect::new(start.0, start.1, 1, 1);
    let (max_w, max_h) = max_footprint;
    let mut can_x = rect.width < max_w;
    let mut can_y = rect.height < max_h;

    while can_x || can_y {
        let grow_x = if can_x && can_y {
            rng.0.gen_bool(0.5)
        } else {
            can_x
        };

        if grow_x {
            let right_first = rng.0.gen_bool(0.5);
            let mut grown = false;
            for rightward in [right_first, !right_first] {
                let new_x = if rightward {
                    rect.right() as isize
                } else {
                    rect.x as isize - 1
                };
                if edge_acceptable_x(layer, grid, roads, zone, max_road_distance, &rect, new_x) {
                    if !rightward {
                        rect.x -= 1;
                    }
                    rect.width += 1;
                    grown = true;
                    break;
                }
            }
            can_x = grown && rect.width < max_w;
        } else {
            let down_first = rng.0.gen_bool(0.5);
            let mut grown = false;
            for downward in [down_first, !down_first] {
                let new_y = if downward {
                    rect.bottom() as isize
                } else {
                    rect.y as isize - 1
                };
                if edge_acceptable_y(layer, grid, roads, zone, max_road_distance, &rect, new_y) {
                    if !downward {
                        rect.y -= 1;
                    }
                    rect.height += 1;
                    grown = true;
                    break;
                }
            }
            can_y = grown && rect.height < max_h;
        }
    }
    rect
}

/// Pick a growable definition of `zone` that fits the rectangle with positive
/// capacity at most `headroom_pct`% of remaining demand. Iteration starts at
/// a random offset and takes the first match, so equally eligible
/// definitions are chosen with roughly equal frequency over time.
fn select_building<'a>(
    catalog: &'a BuildingCatalog,
    rng: &mut SimRng,
    zone: ZoneType,
    rect: GridRect,
    remaining_demand: i64,
    headroom_pct: i64,
) -> Option<&'a BuildingDef> {
    let defs = catalog.growable_defs(zone);
    if defs.is_empty() {
        return None;
    }
    let start = rng.0.gen_range(0..defs.len());
    for k in 0..defs.len() {
        let def = defs[(start + k) % defs.len()];
        if def.capacity == 0 || def.width > rect.width || def.height > rect.height {
            continue;
        }
        if def.capacity as i64 * 100 > remaining_demand * headroom_pct {
            continue;
        }
        return Some(def);
    }
    None
}

/// FixedUpdate system: run the growth loop for every zone type with positive
/// demand. The sector bitsets are deliberately not updated here; they are
/// cache-only state refreshed by the next sector visit, and the per-tile
/// acceptability check already sees this tick's placements.
#[allow(clippy::too_many_arguments)]
pub fn grow_zones(
    mut commands: Commands,
    layer: Res<ZoneLayer>,
    mut grid: ResMut<WorldGrid>,
    roads: Res<RoadAccessGrid>,
    catalog: Res<BuildingCatalog>,
    demand: Res<ZoneDemand>,
    mut population: ResMut<ZonePopulation>,
    params: Res<GameParams>,
    mut rng: ResMut<SimRng>,
    mut grown: EventWriter<BuildingGrown>,
) {
    for zone in ZoneType::GROWABLE {
        let Some(zone_index) = zone.index() else {
            continue;
        };
        let original = demand.get(zone) as i64;
        if original <= 0 {
            continue;
        }
        let Some(max_footprint) = catalog.max_growable_footprint(zone) else {
            continue;
        };
        let max_road_distance = params.growth.max_road_distance[zone_index];
        let demand_floor = original * params.growth.demand_floor_pct / 100;
        let mut remaining = original;
        let mut quota = params.growth.quota_per_zone;
        let mut resume = 0usize;

        while quota > 0 && remaining > demand_floor && layer.has_empty_zones(zone) {
            let Some((candidate, rank)) = find_candidate(
                &layer,
                &grid,
                &roads,
                &mut rng,
                zone,
                zone_index,
                max_road_distance,
                resume,
            ) else {
                break;
            };
            resume = rank;

            let rect = expand_rect(
                &layer,
                &grid,
                &roads,
                &mut rng,
                zone,
                max_road_distance,
                candidate,
                max_footprint,
            );

            match select_building(
                &catalog,
                &mut rng,
                zone,
                rect,
                remaining,
                params.growth.capacity_headroom_pct,
            ) {
                Some(def) => {
                    let fx = rect.x + rng.0.gen_range(0..=rect.width - def.width);
                    let fy = rect.y + rng.0.gen_range(0..=rect.height - def.height);
                    let footprint = GridRect::new(fx, fy, def.width, def.height);

                    let entity = commands
                        .spawn(Building {
                            def_id: def.id,
                            zone,
                            footprint,
                            capacity: def.capacity,
                        })
                        .id();
                    for y in footprint.y..footprint.bottom() {
                        for x in footprint.x..footprint.right() {
                            grid.get_mut(x, y).building_id = Some(entity);
                        }
                    }

                    population.add(zone, def.capacity);
                    remaining -= def.capacity as i64;
                    quota -= 1;
                    grown.send(BuildingGrown {
                        entity,
                        zone,
                        footprint,
                    });
                }
                None => {
                    // Nothing fits this rectangle; move past the sector so
                    // the loop does not spin on one oversized candidate.
                    resume += 1;
                    if resume >= layer.sector_count() {
                        break;
                    }
                }
            }
        }
    }
}
