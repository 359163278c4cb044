pub mod types;

pub use types::{Building, BuildingCatalog, BuildingDef, BuildingDefId};
