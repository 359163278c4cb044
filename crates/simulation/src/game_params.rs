//! Data-driven simulation parameters.
//!
//! The zoning formulas are policy, not structure: the weights and constants
//! below live in a single [`GameParams`] resource so they can be tuned
//! without touching the systems that use them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::ZoneType;

// ---------------------------------------------------------------------------
// Desirability scoring
// ---------------------------------------------------------------------------

/// Linear scoring weights for one zone type. The per-tile score is
/// `base + land_value·L + health·H + fire·F + police·P − pollution·X`
/// with every input in [0, 1], clamped to [0, 1] after summing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesirabilityWeights {
    pub base: f32,
    pub land_value: f32,
    pub health: f32,
    pub fire: f32,
    pub police: f32,
    pub pollution: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesirabilityParams {
    pub residential: DesirabilityWeights,
    pub commercial: DesirabilityWeights,
    pub industrial: DesirabilityWeights,
}

impl Default for DesirabilityParams {
    fn default() -> Self {
        Self {
            residential: DesirabilityWeights {
                base: 0.0,
                land_value: 1.0,
                health: 0.3,
                fire: 0.2,
                police: 0.3,
                pollution: 0.4,
            },
            commercial: DesirabilityWeights {
                base: 0.0,
                land_value: 2.0,
                health: 0.0,
                fire: 0.2,
                police: 0.3,
                pollution: 0.2,
            },
            // Industry prefers cheap land: (1 - land value).
            industrial: DesirabilityWeights {
                base: 1.0,
                land_value: -1.0,
                health: 0.0,
                fire: 0.2,
                police: 0.2,
                pollution: 0.15,
            },
        }
    }
}

impl DesirabilityParams {
    pub fn for_zone(&self, zone: ZoneType) -> Option<&DesirabilityWeights> {
        match zone {
            ZoneType::Residential => Some(&self.residential),
            ZoneType::Commercial => Some(&self.commercial),
            ZoneType::Industrial => Some(&self.industrial),
            ZoneType::None => None,
        }
    }
}

// ---------------------------------------------------------------------------
// City-wide demand
// ---------------------------------------------------------------------------

/// Constants of the demand formulas:
///   residential = jobs · job_multiplier − residents + residential_bias
///   jobs_needed = residents / residents_per_job
///   commercial  = jobs_needed · commercial_share_pct / 100 − pop + bias
///   industrial  = jobs_needed · industrial_share_pct / 100 − pop + bias
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandParams {
    pub job_multiplier: i64,
    pub residential_bias: i64,
    pub residents_per_job: i64,
    pub commercial_share_pct: i64,
    pub commercial_bias: i64,
    pub industrial_share_pct: i64,
    pub industrial_bias: i64,
}

impl Default for DemandParams {
    fn default() -> Self {
        Self {
            job_multiplier: 3,
            residential_bias: 100,
            residents_per_job: 3,
            commercial_share_pct: 20,
            commercial_bias: 20,
            industrial_share_pct: 80,
            industrial_bias: 50,
        }
    }
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Buildings placed per growable zone type per tick.
    pub quota_per_zone: u32,
    /// Growth stops once remaining demand falls to this share of the
    /// tick-start demand (percent).
    pub demand_floor_pct: i64,
    /// A selected building's capacity may exceed remaining demand by at most
    /// this factor (percent, 110 = +10%).
    pub capacity_headroom_pct: i64,
    /// Maximum distance to a connected road, in tiles, indexed by
    /// [`ZoneType::index`]. Industry tolerates more remote lots.
    pub max_road_distance: [u16; 3],
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            quota_per_zone: 4,
            demand_floor_pct: 5,
            capacity_headroom_pct: 110,
            max_road_distance: [3, 4, 5],
        }
    }
}

// ---------------------------------------------------------------------------
// Zoning tool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoningParams {
    /// Price charged per tile actually zoned by the rezoning tool.
    pub price_per_tile: i64,
}

impl Default for ZoningParams {
    fn default() -> Self {
        Self { price_per_tile: 5 }
    }
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameParams {
    pub desirability: DesirabilityParams,
    pub demand: DemandParams,
    pub growth: GrowthParams,
    pub zoning: ZoningParams,
}
