//! Part and equipment definitions.

use serde::{Deserialize, Serialize};

use super::resource_data::Phase;

/// Data-driven discrete item (part) definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartData {
    /// Stable good id, in the item range.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Mass of one unit in kg.
    pub mass: f64,
}

/// The kinds of equipment a settlement trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentKind {
    /// Pressure suit for surface work.
    EvaSuit,
    /// Small solid container.
    Bag,
    /// Large solid container.
    LargeBag,
    /// Liquid container.
    Barrel,
    /// Rock sample container.
    SpecimenBox,
    /// Gas container.
    GasCanister,
}

impl EquipmentKind {
    /// Whether this kind stores resources.
    #[must_use]
    pub const fn is_container(self) -> bool {
        !matches!(self, Self::EvaSuit)
    }
}

/// Data-driven equipment definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentData {
    /// Stable good id, in the equipment range.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Equipment kind.
    pub kind: EquipmentKind,
    /// Empty mass in kg.
    pub mass: f64,
    /// Storage capacity in kg (containers only).
    #[serde(default)]
    pub capacity: f64,
    /// Phase of resource the container holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}
