//! Headless test harness: a fluent builder wrapping `App` + `SimulationPlugin`
//! for driving the zone engine without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::buildings::{Building, BuildingCatalog, BuildingDef};
use crate::coverage::{
    CoverageGrid, FireCoverageGrid, HealthCoverageGrid, LandValueGrid, PoliceCoverageGrid,
    PollutionGrid,
};
use crate::grid::{CellType, WorldGrid, ZoneType};
use crate::roads::RoadAccessGrid;
use crate::sector_grid::GridRect;
use crate::sim_rng::SimRng;
use crate::world_init::SkipWorldInit;
use crate::zones::{place_zone, ZoneDemand, ZoneLayer, ZonePopulation};
use crate::SimulationPlugin;

pub struct TestCity {
    pub app: App,
}

impl TestCity {
    /// An empty grass city of the given size. Sectors are 8 tiles wide and
    /// all of them are refreshed every tick, so scenario assertions do not
    /// depend on where the round-robin cursor happens to be. Every tile
    /// starts road-connected (distance 0); override per test as needed.
    pub fn new(width: usize, height: usize) -> Self {
        let sector_size = 8;
        let sector_count = width.div_ceil(sector_size) * height.div_ceil(sector_size);
        Self::with_layer(
            WorldGrid::new(width, height),
            ZoneLayer::new(width, height, sector_size, sector_count),
        )
    }

    /// Like [`TestCity::new`] but with caller-supplied grid and layer, for
    /// tests that exercise the sector batching itself.
    pub fn with_layer(grid: WorldGrid, layer: ZoneLayer) -> Self {
        let (width, height) = (grid.width, grid.height);
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(SkipWorldInit);
        app.add_plugins(SimulationPlugin);

        app.insert_resource(grid);
        app.insert_resource(layer);
        app.insert_resource(LandValueGrid(CoverageGrid::filled(width, height, 128)));
        app.insert_resource(HealthCoverageGrid(CoverageGrid::new(width, height)));
        app.insert_resource(FireCoverageGrid(CoverageGrid::new(width, height)));
        app.insert_resource(PoliceCoverageGrid(CoverageGrid::new(width, height)));
        app.insert_resource(PollutionGrid(CoverageGrid::new(width, height)));
        let mut roads = RoadAccessGrid::new(width, height);
        roads.fill(0);
        app.insert_resource(roads);
        app.insert_resource(SimRng::from_seed_u64(7));

        // Run Startup once (init_world no-ops because of SkipWorldInit).
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    pub fn with_catalog(mut self, defs: Vec<BuildingDef>) -> Self {
        self.app.insert_resource(BuildingCatalog { defs });
        self
    }

    pub fn with_zone(mut self, zone: ZoneType, rect: GridRect) -> Self {
        self.app
            .world_mut()
            .resource_scope(|world, mut layer: Mut<ZoneLayer>| {
                let grid = world.resource::<WorldGrid>();
                place_zone(&mut layer, grid, zone, rect);
            });
        self
    }

    pub fn with_water(mut self, rect: GridRect) -> Self {
        let mut grid = self.app.world_mut().resource_mut::<WorldGrid>();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                grid.get_mut(x, y).cell_type = CellType::Water;
            }
        }
        self
    }

    pub fn with_population(mut self, zone: ZoneType, count: u32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<ZonePopulation>()
            .add(zone, count);
        self
    }

    pub fn with_road_distance(mut self, rect: GridRect, distance: u16) -> Self {
        let mut roads = self.app.world_mut().resource_mut::<RoadAccessGrid>();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                roads.set_distance(x, y, distance);
            }
        }
        self
    }

    pub fn with_land_value(mut self, rect: GridRect, value: u8) -> Self {
        let mut land = self.app.world_mut().resource_mut::<LandValueGrid>();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                land.0.set(x, y, value);
            }
        }
        self
    }

    pub fn with_pollution(mut self, rect: GridRect, value: u8) -> Self {
        let mut pollution = self.app.world_mut().resource_mut::<PollutionGrid>();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                pollution.0.set(x, y, value);
            }
        }
        self
    }

    // -----------------------------------------------------------------------
    // Driving and queries
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn layer(&self) -> &ZoneLayer {
        self.app.world().resource::<ZoneLayer>()
    }

    pub fn grid(&self) -> &WorldGrid {
        self.app.world().resource::<WorldGrid>()
    }

    pub fn demand(&self) -> &ZoneDemand {
        self.app.world().resource::<ZoneDemand>()
    }

    pub fn population(&self) -> &ZonePopulation {
        self.app.world().resource::<ZonePopulation>()
    }

    pub fn buildings(&mut self) -> Vec<Building> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Building>();
        query.iter(world).cloned().collect()
    }
}
