//! Read-only per-tile coverage layers consumed by desirability scoring.
//!
//! Each layer stores one byte per tile (0 = 0%, 255 = 100%) and is written by
//! its own subsystem; the zone engine only samples `percent_at`.

use bevy::prelude::*;

use crate::config::{GRID_HEIGHT, GRID_WIDTH};

#[derive(Debug, Clone)]
pub struct CoverageGrid {
    pub values: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl CoverageGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            values: vec![value; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.values[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.values[y * self.width + x] = value;
    }

    /// Coverage at (x, y) as a fraction in [0, 1].
    #[inline]
    pub fn percent_at(&self, x: usize, y: usize) -> f32 {
        self.get(x, y) as f32 / 255.0
    }

    pub fn fill(&mut self, value: u8) {
        self.values.fill(value);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct LandValueGrid(pub CoverageGrid);

impl Default for LandValueGrid {
    fn default() -> Self {
        // Baseline 50% until the land value system writes real data.
        Self(CoverageGrid::filled(GRID_WIDTH, GRID_HEIGHT, 128))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct HealthCoverageGrid(pub CoverageGrid);

impl Default for HealthCoverageGrid {
    fn default() -> Self {
        Self(CoverageGrid::new(GRID_WIDTH, GRID_HEIGHT))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct FireCoverageGrid(pub CoverageGrid);

impl Default for FireCoverageGrid {
    fn default() -> Self {
        Self(CoverageGrid::new(GRID_WIDTH, GRID_HEIGHT))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PoliceCoverageGrid(pub CoverageGrid);

impl Default for PoliceCoverageGrid {
    fn default() -> Self {
        Self(CoverageGrid::new(GRID_WIDTH, GRID_HEIGHT))
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PollutionGrid(pub CoverageGrid);

impl Default for PollutionGrid {
    fn default() -> Self {
        Self(CoverageGrid::new(GRID_WIDTH, GRID_HEIGHT))
    }
}
