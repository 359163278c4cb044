//! City-wide zone demand.
//!
//! A single integer formula per zone type, recomputed once per tick from the
//! running population totals. Positive demand means the zone type should
//! grow this tick.

use bevy::prelude::*;

use crate::game_params::{DemandParams, GameParams};
use crate::grid::ZoneType;

/// Residents/jobs currently housed per zone type. The `None` slot counts
/// jobs provided by non-zoned buildings (services, landmarks). Incremented by
/// the growth pass; decremented by external collaborators (demolition,
/// abandonment).
#[derive(Resource, Debug, Clone, Default)]
pub struct ZonePopulation {
    counts: [u32; 4],
}

impl ZonePopulation {
    pub fn get(&self, zone: ZoneType) -> u32 {
        self.counts[zone as usize]
    }

    pub fn add(&mut self, zone: ZoneType, amount: u32) {
        self.counts[zone as usize] += amount;
    }

    pub fn remove(&mut self, zone: ZoneType, amount: u32) {
        let slot = &mut self.counts[zone as usize];
        *slot = slot.saturating_sub(amount);
    }

    pub fn residents(&self) -> u32 {
        self.get(ZoneType::Residential)
    }

    /// Total jobs: commercial + industrial + non-zoned job providers.
    pub fn jobs(&self) -> u32 {
        self.get(ZoneType::Commercial) + self.get(ZoneType::Industrial) + self.get(ZoneType::None)
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDemand {
    pub residential: i32,
    pub commercial: i32,
    pub industrial: i32,
}

impl ZoneDemand {
    pub fn get(&self, zone: ZoneType) -> i32 {
        match zone {
            ZoneType::Residential => self.residential,
            ZoneType::Commercial => self.commercial,
            ZoneType::Industrial => self.industrial,
            ZoneType::None => 0,
        }
    }
}

/// Pure demand computation, testable without the ECS.
pub fn compute_zone_demand(population: &ZonePopulation, params: &DemandParams) -> ZoneDemand {
    let residents = population.residents() as i64;
    let jobs = population.jobs() as i64;

    let residential = jobs * params.job_multiplier - residents + params.residential_bias;

    let jobs_needed = residents / params.residents_per_job;
    let commercial = jobs_needed * params.commercial_share_pct / 100
        - population.get(ZoneType::Commercial) as i64
        + params.commercial_bias;
    let industrial = jobs_needed * params.industrial_share_pct / 100
        - population.get(ZoneType::Industrial) as i64
        + params.industrial_bias;

    ZoneDemand {
        residential: clamp_i32(residential),
        commercial: clamp_i32(commercial),
        industrial: clamp_i32(industrial),
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn update_zone_demand(
    population: Res<ZonePopulation>,
    params: Res<GameParams>,
    mut demand: ResMut<ZoneDemand>,
) {
    *demand = compute_zone_demand(&population, &params.demand);
}
