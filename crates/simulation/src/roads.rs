//! Road-access distances supplied by the transport layer.
//!
//! The zone engine never pathfinds; it only asks "how far is the nearest
//! connected road from this tile" and compares against the per-zone limit in
//! [`crate::game_params::GrowthParams::max_road_distance`].

use bevy::prelude::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};

/// Distance value meaning "no connected road reaches this tile".
pub const UNREACHABLE: u16 = u16::MAX;

#[derive(Resource, Debug, Clone)]
pub struct RoadAccessGrid {
    pub distances: Vec<u16>,
    pub width: usize,
    pub height: usize,
}

impl Default for RoadAccessGrid {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_HEIGHT)
    }
}

impl RoadAccessGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            distances: vec![UNREACHABLE; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn distance_to_road(&self, x: usize, y: usize) -> u16 {
        self.distances[y * self.width + x]
    }

    pub fn set_distance(&mut self, x: usize, y: usize, distance: u16) {
        self.distances[y * self.width + x] = distance;
    }

    pub fn fill(&mut self, distance: u16) {
        self.distances.fill(distance);
    }
}
