//! Data structures for the upstream catalogs the valuation engine consults.
//!
//! This module contains pure data structures describing resources, parts,
//! equipment, vehicle types and production processes. All structs are
//! designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types and
//! parses strings handed to it. File loading is handled by `colony_tools`.

mod item_data;
mod process_data;
mod resource_data;
mod vehicle_data;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, Result};

pub use item_data::{EquipmentData, EquipmentKind, PartData};
pub use process_data::{ConstructionStageData, ProcessCatalog, ProcessData, ProcessItem};
pub use resource_data::{Phase, ResourceData, ResourceKind};
pub use vehicle_data::{VehicleClass, VehicleData};

/// Every tradeable thing known to the simulation, before it becomes a good.
///
/// # Example RON
///
/// ```ron
/// CatalogData(
///     resources: [ResourceData(id: 1, name: "oxygen", phase: Gas, kind: Chemical, life_support: true)],
///     parts: [PartData(id: 1000, name: "microcontroller", mass: 0.1)],
///     equipment: [],
///     vehicles: [],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    /// Bulk resources.
    #[serde(default)]
    pub resources: Vec<ResourceData>,
    /// Discrete items.
    #[serde(default)]
    pub parts: Vec<PartData>,
    /// Equipment and container types.
    #[serde(default)]
    pub equipment: Vec<EquipmentData>,
    /// Vehicle types.
    #[serde(default)]
    pub vehicles: Vec<VehicleData>,
}

impl CatalogData {
    /// Parse catalog data from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| EconomyError::parse("catalog data", &e))
    }

    /// Find a resource by (normalized) name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&ResourceData> {
        self.resources.iter().find(|r| r.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Find a vehicle type by (normalized) name.
    #[must_use]
    pub fn vehicle(&self, name: &str) -> Option<&VehicleData> {
        self.vehicles.iter().find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }
}
