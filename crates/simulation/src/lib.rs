//! Incremental zone-simulation engine.
//!
//! Tracks which tiles are zoned residential/commercial/industrial, scores
//! per-tile desirability from the surrounding coverage layers, computes
//! city-wide demand, and grows buildings into the most attractive empty
//! zoned tiles. All per-tick work runs single-threaded on `FixedUpdate`;
//! the sector cursor amortizes full-grid recomputation across ticks.

use bevy::prelude::*;
use std::collections::BTreeMap;

pub mod buildings;
pub mod config;
pub mod coverage;
pub mod game_params;
pub mod grid;
pub mod roads;
pub mod sector_grid;
pub mod sim_rng;
pub mod world_init;
pub mod zone_grid_save;
pub mod zones;

#[cfg(test)]
pub mod test_harness;

// ---------------------------------------------------------------------------
// Saveable trait + registry for the extension map save pattern
// ---------------------------------------------------------------------------

/// Trait for resources that persist through the save file's extension map.
/// Each implementer provides its own serialization; the outer save system
/// only sees opaque key/bytes pairs.
pub trait Saveable: Resource + Default + Send + Sync + 'static {
    /// Unique, version-stable key in the extension map.
    const SAVE_KEY: &'static str;

    /// Serialize to bytes. `None` skips saving (resource at default state).
    fn save_to_bytes(&self) -> Option<Vec<u8>>;

    fn load_from_bytes(bytes: &[u8]) -> Self;
}

pub type SaveFn = Box<dyn Fn(&World) -> Option<Vec<u8>> + Send + Sync>;
pub type LoadFn = Box<dyn Fn(&mut World, &[u8]) + Send + Sync>;

pub struct SaveableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
}

/// Registry of all saveable resources, populated during plugin setup and
/// iterated by the (external) save system.
#[derive(Resource, Default)]
pub struct SaveableRegistry {
    pub entries: Vec<SaveableEntry>,
}

impl SaveableRegistry {
    pub fn register<T: Saveable>(&mut self) {
        let key = T::SAVE_KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!("SaveableRegistry: duplicate key '{key}', ignoring second registration");
            return;
        }
        self.entries.push(SaveableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(|r| r.save_to_bytes())
            }),
            load_fn: Box::new(|world: &mut World, bytes: &[u8]| {
                let value = T::load_from_bytes(bytes);
                world.insert_resource(value);
            }),
        });
    }

    pub fn save_all(&self, world: &World) -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        for entry in &self.entries {
            if let Some(bytes) = (entry.save_fn)(world) {
                extensions.insert(entry.key.clone(), bytes);
            }
        }
        extensions
    }

    /// Resources whose key is absent keep their current value.
    pub fn load_all(&self, world: &mut World, extensions: &BTreeMap<String, Vec<u8>>) {
        for entry in &self.entries {
            if let Some(bytes) = extensions.get(&entry.key) {
                (entry.load_fn)(world, bytes);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<game_params::GameParams>()
            .init_resource::<sim_rng::SimRng>()
            .init_resource::<buildings::BuildingCatalog>()
            .init_resource::<SaveableRegistry>()
            .add_systems(Startup, world_init::init_world);

        {
            let mut registry = app.world_mut().resource_mut::<SaveableRegistry>();
            registry.register::<zones::ZoneLayer>();
            registry.register::<sim_rng::SimRng>();
        }

        app.add_plugins(zones::ZonesPlugin);
    }
}
