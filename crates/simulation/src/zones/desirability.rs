//! Per-sector refresh pass.
//!
//! Each tick drains a bounded batch of sectors from the round-robin cursor,
//! recomputes their zone-presence flags and per-tile desirability for all
//! three zone types, caches the per-sector averages, and then re-sorts the
//! global rankings. Unvisited sectors keep their previous cached averages and
//! still participate in the sort.

use bevy::prelude::*;

use crate::coverage::{
    FireCoverageGrid, HealthCoverageGrid, LandValueGrid, PoliceCoverageGrid, PollutionGrid,
};
use crate::game_params::{DesirabilityWeights, GameParams};
use crate::grid::{WorldGrid, ZoneType};
use crate::sector_grid::SectorRecord;

use super::layer::{ZoneLayer, GROWABLE_ZONE_COUNT, HAS_EMPTY_ZONE, HAS_ZONE};

/// The five external layer queries feeding the scoring formulas.
pub(crate) struct ScoreInputs<'a> {
    pub land_value: &'a LandValueGrid,
    pub health: &'a HealthCoverageGrid,
    pub fire: &'a FireCoverageGrid,
    pub police: &'a PoliceCoverageGrid,
    pub pollution: &'a PollutionGrid,
}

/// Weighted desirability score for one tile, before clamping.
pub(crate) fn tile_score(weights: &DesirabilityWeights, inputs: &ScoreInputs, x: usize, y: usize) -> f32 {
    weights.base
        + weights.land_value * inputs.land_value.0.percent_at(x, y)
        + weights.health * inputs.health.0.percent_at(x, y)
        + weights.fire * inputs.fire.0.percent_at(x, y)
        + weights.police * inputs.police.0.percent_at(x, y)
        - weights.pollution * inputs.pollution.0.percent_at(x, y)
}

fn score_to_byte(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 255.0) as u8
}

/// Recompute one sector from scratch: presence flags, per-tile desirability
/// bytes, cached averages, and the global bitsets for that sector.
pub(crate) fn refresh_sector(
    layer: &mut ZoneLayer,
    sector_index: usize,
    grid: &WorldGrid,
    params: &GameParams,
    inputs: &ScoreInputs,
) {
    let bounds = layer.sectors.get(sector_index).bounds();
    let weights: [&DesirabilityWeights; GROWABLE_ZONE_COUNT] = [
        &params.desirability.residential,
        &params.desirability.commercial,
        &params.desirability.industrial,
    ];

    let mut flags = 0u8;
    let mut sums = [0.0f32; GROWABLE_ZONE_COUNT];
    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            let tile = layer.index(x, y);
            if let Some(zi) = layer.tile_zone[tile].index() {
                flags |= HAS_ZONE[zi];
                if grid.get(x, y).building_id.is_none() {
                    flags |= HAS_EMPTY_ZONE[zi];
                }
            }
            for zi in 0..GROWABLE_ZONE_COUNT {
                let score = tile_score(weights[zi], inputs, x, y);
                sums[zi] += score;
                layer.desirability[zi][tile] = score_to_byte(score);
            }
        }
    }

    let area = bounds.area() as f32;
    let sector = layer.sectors.get_mut(sector_index);
    sector.flags = flags;
    for zi in 0..GROWABLE_ZONE_COUNT {
        // Averages use the pre-clamp scores.
        sector.avg_desirability[zi] = sums[zi] / area;
        if flags & HAS_ZONE[zi] != 0 {
            layer.with_zones[zi].set(sector_index);
        } else {
            layer.with_zones[zi].clear(sector_index);
        }
        if flags & HAS_EMPTY_ZONE[zi] != 0 {
            layer.with_empty_zones[zi].set(sector_index);
        } else {
            layer.with_empty_zones[zi].clear(sector_index);
        }
    }
}

/// Full re-sort of every zone's sector permutation by cached average
/// desirability, descending. Unstable sort: tie order between equally
/// desirable sectors is unspecified.
pub(crate) fn resort_rankings(layer: &mut ZoneLayer) {
    let sectors = &layer.sectors;
    for (zi, ranked) in layer.ranked.iter_mut().enumerate() {
        ranked.sort_unstable_by(|&a, &b| {
            sectors
                .get(b)
                .avg_desirability(zi)
                .total_cmp(&sectors.get(a).avg_desirability(zi))
        });
    }
}

/// FixedUpdate system: drain this tick's sector batch and refresh rankings.
/// After a load the layer flags itself for one full pass so all derived state
/// is rebuilt before growth resumes.
pub fn update_zone_sectors(
    mut layer: ResMut<ZoneLayer>,
    grid: Res<WorldGrid>,
    params: Res<GameParams>,
    land_value: Res<LandValueGrid>,
    health: Res<HealthCoverageGrid>,
    fire: Res<FireCoverageGrid>,
    police: Res<PoliceCoverageGrid>,
    pollution: Res<PollutionGrid>,
) {
    let inputs = ScoreInputs {
        land_value: &land_value,
        health: &health,
        fire: &fire,
        police: &police,
        pollution: &pollution,
    };

    let batch = if layer.needs_full_refresh {
        layer.needs_full_refresh = false;
        layer.sector_count()
    } else {
        layer.sectors.sectors_per_tick().min(layer.sector_count())
    };

    for _ in 0..batch {
        let sector_index = layer.sectors.next_index();
        refresh_sector(&mut layer, sector_index, &grid, &params, &inputs);
    }

    resort_rankings(&mut layer);
}
