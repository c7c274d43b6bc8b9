//! Bulk resource definitions.

use serde::{Deserialize, Serialize};

/// Physical phase of a bulk resource. Decides which container stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Solids go in bags.
    Solid,
    /// Liquids go in barrels.
    Liquid,
    /// Gases go in gas canisters.
    Gas,
}

/// Resource sub-type used by the base value table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResourceKind {
    /// Chemicals and reagents.
    Chemical,
    /// Chemical compounds.
    Compound,
    /// Pure elements.
    Element,
    /// Harvested crops.
    Crop,
    /// Food derived from crops (flour, soymilk).
    Derived,
    /// Oils.
    Oil,
    /// Rock samples.
    Rock,
    /// Regolith of any grade.
    Regolith,
    /// Mineral ores.
    Ore,
    /// Concentrated minerals.
    Mineral,
    /// Waste streams.
    Waste,
    /// Anything else.
    #[default]
    Standard,
}

/// Data-driven bulk resource definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceData {
    /// Stable good id, in the resource range.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Physical phase.
    pub phase: Phase,
    /// Sub-type for the base value table.
    #[serde(default)]
    pub kind: ResourceKind,
    /// Whether people can eat it.
    #[serde(default)]
    pub edible: bool,
    /// Oxygen, water, hydrogen, methane: valuation floors apply.
    #[serde(default)]
    pub life_support: bool,
}
