//! Data validation utilities.
//!
//! Parsing and catalog construction already reject malformed files, blank
//! names, out-of-range ids and processes naming unknown goods. The checks
//! here cover references that only make sense across files.

use std::path::Path;

use colony_core::context::SimulationContext;
use colony_core::goods::GoodId;

use crate::error::{Result, ToolError};
use crate::loader::DataSet;

/// Counts reported after a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Goods in the built catalog.
    pub goods: usize,
    /// Manufacturing, food production and construction entries.
    pub processes: usize,
    /// Scenario settlements.
    pub settlements: usize,
}

/// Validate all RON data files in a directory.
///
/// # Errors
///
/// Returns an error if any data file fails to load or validation finds
/// dangling references.
pub fn validate_data_directory(path: &Path) -> Result<ValidationSummary> {
    let data = DataSet::load(path)?;
    validate_data_set(&data)
}

/// Validate already loaded data.
///
/// # Errors
///
/// Returns [`ToolError::Invalid`] listing every dangling reference.
pub fn validate_data_set(data: &DataSet) -> Result<ValidationSummary> {
    let ctx = data.context()?;
    let mut problems = scenario_problems(&ctx, data);

    for part in &ctx.config.eva_suit_parts {
        if ctx.catalog().id_of(part).is_none() {
            tracing::warn!(part = %part, "EVA suit part not in catalog, it will get no demand");
        }
    }

    if problems.is_empty() {
        // Duplicate settlement ids and unknown credit parties.
        if let Err(e) = data.colony() {
            problems.push(e.to_string());
        }
    }

    if !problems.is_empty() {
        return Err(ToolError::Invalid(problems));
    }

    let processes = data.processes.manufacturing.len()
        + data.processes.food_production.len()
        + data.processes.construction_stages.len();
    Ok(ValidationSummary {
        goods: ctx.catalog().len(),
        processes,
        settlements: data.scenario.settlements.len(),
    })
}

fn scenario_problems(ctx: &SimulationContext, data: &DataSet) -> Vec<String> {
    let catalog = ctx.catalog();
    let mut problems = Vec::new();

    for settlement in &data.scenario.settlements {
        let label = format!("settlement {} ({})", settlement.id, settlement.name);

        let referenced = settlement
            .stored
            .keys()
            .chain(settlement.demand.keys())
            .chain(settlement.supply.keys())
            .chain(settlement.capacity.keys())
            .chain(settlement.maintenance.keys());
        for &id in referenced {
            if catalog.get(GoodId(id)).is_err() {
                problems.push(format!("{label}: unknown good id {id}"));
            }
        }

        for vehicle_type in settlement.fleet.keys() {
            if catalog.lookup_by_vehicle_name(vehicle_type).is_err() {
                problems.push(format!("{label}: unknown vehicle type '{vehicle_type}'"));
            }
        }

        for stage in &settlement.construction {
            if ctx.processes().construction_stage(stage).is_none() {
                problems.push(format!("{label}: unknown construction stage '{stage}'"));
            }
        }
    }

    problems.sort();
    problems.dedup();
    problems
}
