//! Production process definitions: manufacturing, food production and
//! construction stages.

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, Result};

/// A named quantity flowing into or out of a process.
///
/// Quantity is kg for bulk resources and a unit count for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessItem {
    /// Good name.
    pub name: String,
    /// Quantity.
    pub quantity: f64,
}

impl ProcessItem {
    /// Create a new process item.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }

    /// Whether this item names the given good (case-insensitive).
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }
}

/// A manufacturing or food production process.
///
/// # Example RON
///
/// ```ron
/// ProcessData(
///     name: "make microcontroller",
///     inputs: [ProcessItem(name: "semiconductor wafer", quantity: 1.0)],
///     outputs: [ProcessItem(name: "microcontroller", quantity: 10.0)],
///     labor_time: 200.0,
///     power: 0.5,
///     process_time: 100.0,
///     skill_level: 3,
///     tech_level: 4,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessData {
    /// Process name.
    pub name: String,
    /// Consumed goods.
    #[serde(default)]
    pub inputs: Vec<ProcessItem>,
    /// Produced goods.
    #[serde(default)]
    pub outputs: Vec<ProcessItem>,
    /// Work time in millisols.
    #[serde(default)]
    pub labor_time: f64,
    /// Power draw in kW.
    #[serde(default)]
    pub power: f64,
    /// Unattended process time in millisols.
    #[serde(default)]
    pub process_time: f64,
    /// Minimum skill level of the operator.
    #[serde(default)]
    pub skill_level: u32,
    /// Minimum workshop tech level.
    #[serde(default)]
    pub tech_level: u32,
}

impl ProcessData {
    /// Whether any output names the good.
    #[must_use]
    pub fn produces(&self, name: &str) -> bool {
        self.outputs.iter().any(|o| o.is(name))
    }

    /// Quantity of the good consumed per run, zero if not an input.
    #[must_use]
    pub fn input_quantity(&self, name: &str) -> f64 {
        self.inputs
            .iter()
            .filter(|i| i.is(name))
            .map(|i| i.quantity)
            .sum()
    }
}

/// One stage of a building's construction and what it consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructionStageData {
    /// Stage name.
    pub name: String,
    /// Resources and parts consumed by the stage.
    #[serde(default)]
    pub inputs: Vec<ProcessItem>,
}

impl ConstructionStageData {
    /// Quantity of the good the stage consumes, zero if none.
    #[must_use]
    pub fn input_quantity(&self, name: &str) -> f64 {
        self.inputs
            .iter()
            .filter(|i| i.is(name))
            .map(|i| i.quantity)
            .sum()
    }
}

/// Read-only catalogs of every production process in the simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessCatalog {
    /// Workshop manufacturing processes.
    #[serde(default)]
    pub manufacturing: Vec<ProcessData>,
    /// Kitchen food production processes.
    #[serde(default)]
    pub food_production: Vec<ProcessData>,
    /// Construction stages.
    #[serde(default)]
    pub construction_stages: Vec<ConstructionStageData>,
}

impl ProcessCatalog {
    /// Parse process catalogs from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| EconomyError::parse("process catalog", &e))
    }

    /// Find a construction stage by name.
    #[must_use]
    pub fn construction_stage(&self, name: &str) -> Option<&ConstructionStageData> {
        self.construction_stages
            .iter()
            .find(|s| s.name.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Manufacturing processes that consume the good.
    pub fn manufacturing_consumers<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ProcessData> + 'a {
        self.manufacturing
            .iter()
            .filter(move |p| p.input_quantity(name) > 0.0)
    }

    /// Food production processes that consume the good.
    pub fn food_production_consumers<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ProcessData> + 'a {
        self.food_production
            .iter()
            .filter(move |p| p.input_quantity(name) > 0.0)
    }

    /// Every good name mentioned anywhere in the catalogs.
    pub fn mentioned_names(&self) -> impl Iterator<Item = &str> {
        self.manufacturing
            .iter()
            .chain(self.food_production.iter())
            .flat_map(|p| p.inputs.iter().chain(p.outputs.iter()))
            .chain(self.construction_stages.iter().flat_map(|s| s.inputs.iter()))
            .map(|i| i.name.as_str())
    }
}
