//! One-time world setup.

use bevy::prelude::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::coverage::{
    FireCoverageGrid, HealthCoverageGrid, LandValueGrid, PoliceCoverageGrid, PollutionGrid,
};
use crate::grid::WorldGrid;
use crate::roads::RoadAccessGrid;
use crate::zones::ZoneLayer;

/// Marker resource: when present, [`init_world`] does nothing. Tests and
/// embedders insert their own (differently sized) grids before the first
/// update.
#[derive(Resource)]
pub struct SkipWorldInit;

pub fn init_world(mut commands: Commands, skip: Option<Res<SkipWorldInit>>) {
    if skip.is_some() {
        return;
    }
    commands.insert_resource(WorldGrid::new(GRID_WIDTH, GRID_HEIGHT));
    commands.insert_resource(ZoneLayer::default());
    commands.insert_resource(LandValueGrid::default());
    commands.insert_resource(HealthCoverageGrid::default());
    commands.insert_resource(FireCoverageGrid::default());
    commands.insert_resource(PoliceCoverageGrid::default());
    commands.insert_resource(PollutionGrid::default());
    commands.insert_resource(RoadAccessGrid::default());
}
