//! Loading of the RON data directory.
//!
//! A data directory holds `catalog.ron` and `processes.ron`, plus optional
//! `valuation.ron` and `scenario.ron`. Missing optional files fall back to
//! built-in defaults.

use std::fs;
use std::path::Path;

use colony_core::colony::{Colony, ScenarioData};
use colony_core::config::ValuationConfig;
use colony_core::context::SimulationContext;
use colony_core::data::{CatalogData, ProcessCatalog};

use crate::error::{Result, ToolError};

/// Goods catalog file name.
pub const CATALOG_FILE: &str = "catalog.ron";
/// Process catalog file name.
pub const PROCESSES_FILE: &str = "processes.ron";
/// Tuning file name.
pub const VALUATION_FILE: &str = "valuation.ron";
/// Scenario file name.
pub const SCENARIO_FILE: &str = "scenario.ron";

/// Parsed contents of a data directory.
#[derive(Debug, Clone)]
pub struct DataSet {
    /// Goods catalog.
    pub catalog: CatalogData,
    /// Production processes.
    pub processes: ProcessCatalog,
    /// Valuation tuning.
    pub config: ValuationConfig,
    /// Settlements and credit.
    pub scenario: ScenarioData,
}

impl DataSet {
    /// Load every data file from a directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let catalog = CatalogData::from_ron_str(&read(dir, CATALOG_FILE)?)?;
        let processes = ProcessCatalog::from_ron_str(&read(dir, PROCESSES_FILE)?)?;

        let config = match read_optional(dir, VALUATION_FILE)? {
            Some(source) => ValuationConfig::from_ron_str(&source)?,
            None => ValuationConfig::default(),
        };
        let scenario = match read_optional(dir, SCENARIO_FILE)? {
            Some(source) => ScenarioData::from_ron_str(&source)?,
            None => ScenarioData::default(),
        };

        tracing::debug!(
            resources = catalog.resources.len(),
            parts = catalog.parts.len(),
            equipment = catalog.equipment.len(),
            vehicles = catalog.vehicles.len(),
            settlements = scenario.settlements.len(),
            "Data directory loaded"
        );

        Ok(Self {
            catalog,
            processes,
            config,
            scenario,
        })
    }

    /// Build the simulation context.
    pub fn context(&self) -> Result<SimulationContext> {
        Ok(SimulationContext::new(
            self.config.clone(),
            self.catalog.clone(),
            self.processes.clone(),
        )?)
    }

    /// Build the colony described by the scenario.
    pub fn colony(&self) -> Result<Colony> {
        Ok(Colony::from_scenario(self.context()?, self.scenario.clone())?)
    }
}

fn read(dir: &Path, file: &str) -> Result<String> {
    let path = dir.join(file);
    fs::read_to_string(&path).map_err(|source| ToolError::Io { path, source })
}

fn read_optional(dir: &Path, file: &str) -> Result<Option<String>> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::info!(file, "Optional data file missing, using defaults");
        return Ok(None);
    }
    read(dir, file).map(Some)
}
