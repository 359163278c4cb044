use bevy::prelude::*;

use crate::buildings::BuildingDef;
use crate::game_params::DemandParams;
use crate::grid::{WorldGrid, ZoneType};
use crate::roads::UNREACHABLE;
use crate::sector_grid::{GridRect, SectorRecord};
use crate::test_harness::TestCity;
use crate::zones::growth::BuildingGrown;
use crate::zones::{
    can_zone_tile, compute_zone_demand, place_zone, query_can_zone_tiles, ZoneLayer,
    ZonePopulation,
};

fn growable_def(id: u16, zone: ZoneType, w: usize, h: usize, cap: u32) -> BuildingDef {
    BuildingDef {
        id,
        name: format!("def-{id}"),
        zone,
        width: w,
        height: h,
        capacity: cap,
        growable: true,
    }
}

// ---------------------------------------------------------------------------
// Rezoning tool
// ---------------------------------------------------------------------------

#[test]
fn test_rezone_is_idempotent() {
    let mut layer = ZoneLayer::new(32, 32, 8, 4);
    let grid = WorldGrid::new(32, 32);
    let rect = GridRect::new(4, 4, 6, 5);

    let first = place_zone(&mut layer, &grid, ZoneType::Commercial, rect);
    assert_eq!(first, 30);
    let before: Vec<ZoneType> = (0..32 * 32).map(|i| layer.zone_at(i % 32, i / 32)).collect();

    let second = place_zone(&mut layer, &grid, ZoneType::Commercial, rect);
    assert_eq!(second, 0, "tiles already of the type are left untouched");
    let after: Vec<ZoneType> = (0..32 * 32).map(|i| layer.zone_at(i % 32, i / 32)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_rezone_rejects_occupied_and_water() {
    let mut layer = ZoneLayer::new(16, 16, 8, 4);
    let mut grid = WorldGrid::new(16, 16);
    grid.get_mut(2, 2).cell_type = crate::grid::CellType::Water;
    grid.get_mut(3, 2).building_id = Some(Entity::from_raw(1));

    let zoned = place_zone(&mut layer, &grid, ZoneType::Residential, GridRect::new(2, 2, 2, 1));
    assert_eq!(zoned, 0);
    assert_eq!(layer.zone_at(2, 2), ZoneType::None);
    assert_eq!(layer.zone_at(3, 2), ZoneType::None);

    // Re-zoning an unoccupied tile to a different type is allowed.
    place_zone(&mut layer, &grid, ZoneType::Residential, GridRect::new(5, 5, 1, 1));
    let changed = place_zone(&mut layer, &grid, ZoneType::Industrial, GridRect::new(5, 5, 1, 1));
    assert_eq!(changed, 1);
    assert_eq!(layer.zone_at(5, 5), ZoneType::Industrial);
}

#[test]
fn test_rezone_none_is_rejected() {
    let mut layer = ZoneLayer::new(16, 16, 8, 4);
    let grid = WorldGrid::new(16, 16);
    let zoned = place_zone(&mut layer, &grid, ZoneType::None, GridRect::new(0, 0, 4, 4));
    assert_eq!(zoned, 0);
    assert_eq!(layer.zone_at(0, 0), ZoneType::None);
}

#[test]
#[should_panic]
fn test_rezone_out_of_bounds_panics() {
    let mut layer = ZoneLayer::new(16, 16, 8, 4);
    let grid = WorldGrid::new(16, 16);
    place_zone(&mut layer, &grid, ZoneType::Residential, GridRect::new(10, 10, 10, 1));
}

#[test]
fn test_zone_preview_counts_and_cost() {
    let mut layer = ZoneLayer::new(16, 16, 8, 4);
    let mut grid = WorldGrid::new(16, 16);
    grid.get_mut(1, 0).cell_type = crate::grid::CellType::Water;
    place_zone(&mut layer, &grid, ZoneType::Residential, GridRect::new(2, 0, 1, 1));

    assert!(can_zone_tile(&layer, &grid, ZoneType::Residential, 0, 0));
    assert!(!can_zone_tile(&layer, &grid, ZoneType::Residential, 1, 0));
    assert!(!can_zone_tile(&layer, &grid, ZoneType::Residential, 2, 0));

    let preview =
        query_can_zone_tiles(&layer, &grid, ZoneType::Residential, GridRect::new(0, 0, 4, 1), 5);
    assert_eq!(preview.tiles, vec![true, false, false, true]);
    assert_eq!(preview.zoneable, 2);
    assert_eq!(preview.cost, 10);
}

// ---------------------------------------------------------------------------
// Demand formulas
// ---------------------------------------------------------------------------

#[test]
fn test_demand_empty_city_equals_biases() {
    let demand = compute_zone_demand(&ZonePopulation::default(), &DemandParams::default());
    assert_eq!(demand.residential, 100);
    assert_eq!(demand.commercial, 20);
    assert_eq!(demand.industrial, 50);
}

#[test]
fn test_demand_formula_values() {
    let mut population = ZonePopulation::default();
    population.add(ZoneType::Residential, 300);
    population.add(ZoneType::Commercial, 10);
    population.add(ZoneType::Industrial, 20);
    population.add(ZoneType::None, 5); // non-zoned job providers count as jobs

    let demand = compute_zone_demand(&population, &DemandParams::default());
    // jobs = 35, residents = 300, jobs_needed = 100
    assert_eq!(demand.residential, 3 * 35 - 300 + 100);
    assert_eq!(demand.commercial, 20 - 10 + 20);
    assert_eq!(demand.industrial, 80 - 20 + 50);
}

// ---------------------------------------------------------------------------
// Desirability
// ---------------------------------------------------------------------------

#[test]
fn test_desirability_clamped_to_byte_range() {
    let all = GridRect::new(0, 0, 16, 16);
    // Maximal land value: the commercial formula's raw score is 2.0 and must
    // clamp to 255.
    let mut city = TestCity::new(16, 16).with_land_value(all, 255);
    city.tick(1);
    assert_eq!(city.layer().desirability_at(ZoneType::Commercial, 5, 5), 255);
    // Industry wants cheap land: score 1 - 1 = 0.
    assert_eq!(city.layer().desirability_at(ZoneType::Industrial, 5, 5), 0);

    // Heavy pollution on worthless land drives residential below zero.
    let mut city = TestCity::new(16, 16)
        .with_land_value(all, 0)
        .with_pollution(all, 255);
    city.tick(1);
    assert_eq!(city.layer().desirability_at(ZoneType::Residential, 3, 3), 0);
    // Industrial: 1.0 - 0.15 = 0.85.
    let ind = city.layer().desirability_at(ZoneType::Industrial, 3, 3);
    assert!((215..=217).contains(&ind), "got {ind}");
}

#[test]
fn test_rankings_sorted_descending() {
    // High land value on the left half, none on the right.
    let mut city = TestCity::new(32, 32)
        .with_land_value(GridRect::new(0, 0, 16, 32), 255)
        .with_land_value(GridRect::new(16, 0, 16, 32), 0);
    city.tick(1);

    let layer = city.layer();
    for zone in ZoneType::GROWABLE {
        let zi = zone.index().unwrap();
        let ranked = layer.ranked_sectors(zone);
        assert_eq!(ranked.len(), layer.sector_count());
        for pair in ranked.windows(2) {
            let a = layer.sectors.get(pair[0]).avg_desirability(zi);
            let b = layer.sectors.get(pair[1]).avg_desirability(zi);
            assert!(a >= b, "ranking out of order for {zone:?}: {a} < {b}");
        }
    }

    // Commercial favors expensive land, industry cheap land.
    let top_commercial = layer.sectors.get(layer.ranked_sectors(ZoneType::Commercial)[0]);
    assert!(top_commercial.bounds().x < 16);
    let top_industrial = layer.sectors.get(layer.ranked_sectors(ZoneType::Industrial)[0]);
    assert!(top_industrial.bounds().x >= 16);
}

#[test]
fn test_sector_batch_is_bounded_per_tick() {
    // 16 sectors, 2 refreshed per tick: presence flags appear incrementally.
    let grid = WorldGrid::new(32, 32);
    let layer = ZoneLayer::new(32, 32, 8, 2);
    let mut city = TestCity::with_layer(grid, layer)
        .with_zone(ZoneType::Residential, GridRect::new(0, 0, 32, 32));

    city.tick(1);
    let flagged = |city: &mut TestCity| {
        let layer = city.layer();
        (0..layer.sector_count())
            .filter(|&i| layer.sectors.get(i).has_zone(0))
            .count()
    };
    assert_eq!(flagged(&mut city), 2);
    city.tick(7);
    assert_eq!(flagged(&mut city), 16);
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[test]
fn test_growth_stops_at_quota_then_demand() {
    // Empty city: residential demand is exactly 100. One 2x2 definition
    // housing 10, quota 4 per tick.
    let mut city = TestCity::new(32, 32)
        .with_zone(ZoneType::Residential, GridRect::new(4, 4, 20, 20))
        .with_catalog(vec![growable_def(1, ZoneType::Residential, 2, 2, 10)]);

    city.tick(1);
    assert_eq!(city.buildings().len(), 4, "per-tick quota");
    assert_eq!(city.population().residents(), 40);

    city.tick(9);
    // Demand reaches zero at 100 residents and growth stops for good.
    assert_eq!(city.population().residents(), 100);
    assert_eq!(city.buildings().len(), 10);
    assert_eq!(city.demand().residential, 0);
}

#[test]
fn test_growth_never_overshoots_remaining_demand() {
    // Residential demand is 5; the only definition houses 10, which exceeds
    // 110% of remaining demand, so nothing may grow.
    let mut city = TestCity::new(32, 32)
        .with_population(ZoneType::Residential, 95)
        .with_zone(ZoneType::Residential, GridRect::new(0, 0, 16, 16))
        .with_catalog(vec![growable_def(1, ZoneType::Residential, 2, 2, 10)]);

    city.tick(3);
    assert_eq!(city.demand().residential, 5);
    assert!(city.buildings().is_empty());
    assert_eq!(city.population().residents(), 95);
}

#[test]
fn test_growth_skips_sectors_where_nothing_fits() {
    // A one-tile-wide strip cannot hold a 2x2 footprint; the resume position
    // must advance past every sector and terminate without placing.
    let mut city = TestCity::new(32, 32)
        .with_zone(ZoneType::Residential, GridRect::new(3, 0, 1, 32))
        .with_catalog(vec![growable_def(1, ZoneType::Residential, 2, 2, 10)]);

    city.tick(2);
    assert!(city.buildings().is_empty());
}

#[test]
fn test_no_illegal_placements() {
    // Water strip through the middle, roads only serving the top half.
    let mut city = TestCity::new(32, 32)
        .with_water(GridRect::new(10, 0, 4, 32))
        .with_road_distance(GridRect::new(0, 16, 32, 16), UNREACHABLE)
        .with_zone(ZoneType::Residential, GridRect::new(0, 0, 32, 32))
        .with_catalog(vec![
            growable_def(1, ZoneType::Residential, 2, 2, 10),
            growable_def(2, ZoneType::Residential, 1, 1, 3),
        ]);

    city.tick(6);
    let buildings = city.buildings();
    assert!(!buildings.is_empty());

    let grid = city.grid();
    let layer = city.layer();
    let roads = city.app.world().resource::<crate::roads::RoadAccessGrid>();
    let mut footprint_tiles = 0usize;
    for b in &buildings {
        footprint_tiles += b.footprint.area();
        for y in b.footprint.y..b.footprint.bottom() {
            for x in b.footprint.x..b.footprint.right() {
                assert!(grid.get(x, y).cell_type.is_buildable(), "building on water");
                assert_eq!(layer.zone_at(x, y), b.zone, "zone mismatch under building");
                assert_ne!(grid.get(x, y).building_id, None);
                assert!(roads.distance_to_road(x, y) <= 3, "grew beyond road reach");
            }
        }
    }
    // Footprints are disjoint: every occupied tile belongs to exactly one.
    let occupied = grid.cells.iter().filter(|c| c.building_id.is_some()).count();
    assert_eq!(occupied, footprint_tiles);
}

#[test]
fn test_growth_emits_refresh_events() {
    let mut city = TestCity::new(32, 32)
        .with_zone(ZoneType::Commercial, GridRect::new(2, 2, 12, 12))
        .with_catalog(vec![growable_def(1, ZoneType::Commercial, 2, 2, 8)]);

    city.tick(1);
    let placed = city.buildings().len();
    assert!(placed > 0);
    let events = city
        .app
        .world_mut()
        .resource_mut::<Events<BuildingGrown>>()
        .drain()
        .count();
    assert_eq!(events, placed);
}

#[test]
fn test_growth_requires_positive_demand() {
    // Plenty of residents and no jobs: residential demand is negative.
    let mut city = TestCity::new(32, 32)
        .with_population(ZoneType::Residential, 500)
        .with_zone(ZoneType::Residential, GridRect::new(0, 0, 16, 16))
        .with_catalog(vec![growable_def(1, ZoneType::Residential, 2, 2, 10)]);

    city.tick(3);
    assert!(city.demand().residential < 0);
    assert!(city.buildings().is_empty());
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

#[test]
fn test_loaded_layer_rebuilds_derived_state_in_one_tick() {
    use crate::Saveable;

    let mut layer = ZoneLayer::new(32, 32, 8, 2);
    let grid = WorldGrid::new(32, 32);
    place_zone(&mut layer, &grid, ZoneType::Industrial, GridRect::new(8, 8, 10, 10));
    let bytes = layer.save_to_bytes().unwrap();

    let restored = ZoneLayer::load_from_bytes(&bytes);
    assert!(!restored.has_empty_zones(ZoneType::Industrial), "derived state not persisted");

    // The post-load refresh visits every sector in a single update instead
    // of the amortized batch.
    let mut city = TestCity::with_layer(WorldGrid::new(32, 32), restored);
    city.tick(1);
    assert!(city.layer().has_empty_zones(ZoneType::Industrial));
}
