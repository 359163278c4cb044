//! Incremental zone simulation: sector-amortized desirability, city-wide
//! demand, and procedural building growth.

pub mod demand;
pub mod desirability;
pub mod growth;
pub mod layer;
pub mod placement;

#[cfg(test)]
mod tests;

pub use demand::{compute_zone_demand, update_zone_demand, ZoneDemand, ZonePopulation};
pub use desirability::update_zone_sectors;
pub use growth::{grow_zones, zone_acceptable, BuildingGrown};
pub use layer::{SectorBitset, ZoneLayer, ZoneSector};
pub use placement::{can_zone_tile, place_zone, query_can_zone_tiles, zone_cost, ZonePreview};

use bevy::prelude::*;

pub struct ZonesPlugin;

impl Plugin for ZonesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZonePopulation>()
            .init_resource::<ZoneDemand>()
            .add_event::<BuildingGrown>()
            .add_systems(
                FixedUpdate,
                (update_zone_sectors, update_zone_demand, grow_zones).chain(),
            );
    }
}
