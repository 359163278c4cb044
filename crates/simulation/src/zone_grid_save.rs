//! Saveable implementation for the zone layer.
//!
//! Only the per-tile zone grid is persisted, run-length encoded (zoning is
//! large contiguous blocks, so this is very compact). Desirability, sector
//! flags, rankings, and demand are derived state: the restored layer flags
//! itself for one full sector refresh on the first tick after load instead.

use bevy::prelude::*;
use bitcode::{Decode, Encode};

use crate::config::{SECTORS_PER_TICK, SECTOR_SIZE};
use crate::grid::ZoneType;
use crate::zones::ZoneLayer;
use crate::Saveable;

#[derive(Encode, Decode)]
struct ZoneRun {
    count: u32,
    zone: u8,
}

#[derive(Encode, Decode)]
struct ZoneLayerSnapshot {
    width: u32,
    height: u32,
    runs: Vec<ZoneRun>,
}

fn zone_to_byte(zone: ZoneType) -> u8 {
    match zone {
        ZoneType::None => 0,
        ZoneType::Residential => 1,
        ZoneType::Commercial => 2,
        ZoneType::Industrial => 3,
    }
}

fn zone_from_byte(byte: u8) -> Option<ZoneType> {
    match byte {
        0 => Some(ZoneType::None),
        1 => Some(ZoneType::Residential),
        2 => Some(ZoneType::Commercial),
        3 => Some(ZoneType::Industrial),
        _ => None,
    }
}

fn encode_runs(layer: &ZoneLayer) -> Vec<ZoneRun> {
    let mut runs: Vec<ZoneRun> = Vec::new();
    for y in 0..layer.height() {
        for x in 0..layer.width() {
            let byte = zone_to_byte(layer.zone_at(x, y));
            match runs.last_mut() {
                Some(run) if run.zone == byte => run.count += 1,
                _ => runs.push(ZoneRun {
                    count: 1,
                    zone: byte,
                }),
            }
        }
    }
    runs
}

impl Saveable for ZoneLayer {
    const SAVE_KEY: &'static str = "zone_layer";

    fn save_to_bytes(&self) -> Option<Vec<u8>> {
        let snapshot = ZoneLayerSnapshot {
            width: self.width() as u32,
            height: self.height() as u32,
            runs: encode_runs(self),
        };
        Some(bitcode::encode(&snapshot))
    }

    fn load_from_bytes(bytes: &[u8]) -> Self {
        let snapshot: ZoneLayerSnapshot = match bitcode::decode(bytes) {
            Ok(s) => s,
            Err(e) => {
                warn!("ZoneLayer: failed to decode save data, starting unzoned: {e}");
                return Self::default();
            }
        };
        let (width, height) = (snapshot.width as usize, snapshot.height as usize);
        if width == 0 || height == 0 {
            warn!("ZoneLayer: save data has empty dimensions, starting unzoned");
            return Self::default();
        }

        let mut layer = ZoneLayer::new(width, height, SECTOR_SIZE, SECTORS_PER_TICK);
        let mut tile = 0usize;
        let total = width * height;
        for run in &snapshot.runs {
            let Some(zone) = zone_from_byte(run.zone) else {
                warn!("ZoneLayer: invalid zone byte {} in save data", run.zone);
                return Self::default();
            };
            for _ in 0..run.count {
                if tile >= total {
                    warn!("ZoneLayer: save data overruns {}x{} grid", width, height);
                    return Self::default();
                }
                let (x, y) = (tile % width, tile / width);
                layer.set_zone(x, y, zone);
                tile += 1;
            }
        }
        if tile != total {
            warn!("ZoneLayer: save data covers {tile} of {total} tiles, starting unzoned");
            return Self::default();
        }

        layer.request_full_refresh();
        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sector_grid::GridRect;
    use crate::zones::place_zone;
    use crate::grid::WorldGrid;

    #[test]
    fn test_rle_roundtrip_restores_zones() {
        let mut layer = ZoneLayer::new(32, 32, 8, 4);
        let grid = WorldGrid::new(32, 32);
        place_zone(&mut layer, &grid, ZoneType::Residential, GridRect::new(2, 2, 10, 6));
        place_zone(&mut layer, &grid, ZoneType::Industrial, GridRect::new(20, 20, 5, 5));

        let bytes = layer.save_to_bytes().unwrap();
        let restored = ZoneLayer::load_from_bytes(&bytes);

        assert_eq!(restored.width(), 32);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(restored.zone_at(x, y), layer.zone_at(x, y), "({x},{y})");
            }
        }
    }

    #[test]
    fn test_corrupt_save_falls_back_to_unzoned() {
        let restored = ZoneLayer::load_from_bytes(&[0xFF, 0x01, 0x02]);
        assert_eq!(restored.zone_at(0, 0), ZoneType::None);
    }
}
