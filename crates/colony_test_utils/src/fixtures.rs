//! Test fixtures and helpers.
//!
//! The shipped RON data is embedded at compile time so tests and benchmarks
//! run against the same catalog the tools load, without touching the
//! filesystem.

use colony_core::colony::{Colony, ScenarioData};
use colony_core::config::ValuationConfig;
use colony_core::context::SimulationContext;
use colony_core::data::{CatalogData, ProcessCatalog};
use colony_core::goods::GoodId;
use colony_core::math::Coordinates;
use colony_core::settlement::{Job, SettlementSnapshot};

/// Shipped goods catalog.
pub const CATALOG_RON: &str = include_str!("../../../assets/data/catalog.ron");
/// Shipped production processes.
pub const PROCESSES_RON: &str = include_str!("../../../assets/data/processes.ron");
/// Shipped valuation tuning.
pub const VALUATION_RON: &str = include_str!("../../../assets/data/valuation.ron");
/// Shipped two-settlement scenario.
pub const SCENARIO_RON: &str = include_str!("../../../assets/data/scenario.ron");

/// Parse the shipped catalog.
///
/// # Panics
///
/// Panics if the embedded data does not parse.
#[must_use]
pub fn catalog_data() -> CatalogData {
    CatalogData::from_ron_str(CATALOG_RON).expect("shipped catalog parses")
}

/// Parse the shipped process catalog.
///
/// # Panics
///
/// Panics if the embedded data does not parse.
#[must_use]
pub fn processes() -> ProcessCatalog {
    ProcessCatalog::from_ron_str(PROCESSES_RON).expect("shipped processes parse")
}

/// Parse the shipped valuation tuning.
///
/// # Panics
///
/// Panics if the embedded data does not parse.
#[must_use]
pub fn config() -> ValuationConfig {
    ValuationConfig::from_ron_str(VALUATION_RON).expect("shipped valuation config parses")
}

/// Parse the shipped scenario.
///
/// # Panics
///
/// Panics if the embedded data does not parse.
#[must_use]
pub fn scenario() -> ScenarioData {
    ScenarioData::from_ron_str(SCENARIO_RON).expect("shipped scenario parses")
}

/// Simulation context over the shipped data.
///
/// # Panics
///
/// Panics if the shipped catalog is inconsistent.
#[must_use]
pub fn context() -> SimulationContext {
    context_with(config())
}

/// Simulation context over the shipped data with custom tuning.
///
/// # Panics
///
/// Panics if the shipped catalog is inconsistent.
#[must_use]
pub fn context_with(config: ValuationConfig) -> SimulationContext {
    SimulationContext::new(config, catalog_data(), processes()).expect("shipped catalog builds")
}

/// Colony built from the shipped scenario.
///
/// # Panics
///
/// Panics if the scenario is inconsistent with the catalog.
#[must_use]
pub fn colony() -> Colony {
    Colony::from_scenario(context(), scenario()).expect("shipped scenario builds")
}

/// Id of a good in the shipped catalog.
///
/// # Panics
///
/// Panics if the name is unknown.
#[must_use]
pub fn good_id(ctx: &SimulationContext, name: &str) -> GoodId {
    ctx.catalog()
        .id_of(name)
        .unwrap_or_else(|| panic!("no good named '{name}'"))
}

/// A settlement with a population and nothing else.
#[must_use]
pub fn bare_settlement(id: u32, population: u32) -> SettlementSnapshot {
    SettlementSnapshot::new(id, format!("Outpost {id}"), Coordinates::default(), population)
}

/// A staffed settlement at the given location with a modest inventory.
///
/// # Panics
///
/// Panics if the shipped catalog lacks the stocked goods.
#[must_use]
pub fn staffed_settlement(
    ctx: &SimulationContext,
    id: u32,
    location: Coordinates,
    population: u32,
) -> SettlementSnapshot {
    SettlementSnapshot::new(id, format!("Settlement {id}"), location, population)
        .with_job(Job::Areologist, 1)
        .with_job(Job::Engineer, 1)
        .with_job(Job::Trader, 1)
        .with_job(Job::Pilot, 1)
        .with_stored(good_id(ctx, "oxygen"), 200.0)
        .with_stored(good_id(ctx, "water"), 150.0)
        .with_stored(good_id(ctx, "ice"), 80.0)
        .with_stored(good_id(ctx, "pipe valve"), 4.0)
        .with_vehicles("cargo rover", 1)
}
