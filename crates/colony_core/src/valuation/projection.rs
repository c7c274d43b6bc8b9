//! Projected demand contributors.
//!
//! Each contributor estimates future demand for a good from one angle
//! (population consumption, process inputs, construction). The engine sums
//! the contributors configured for the good's category and clamps the total.

use std::fmt;

use super::state::{ValuationState, INITIAL_DEMAND};
use crate::config::{CouplingConfig, ProjectionKind};
use crate::context::SimulationContext;
use crate::data::ResourceKind;
use crate::goods::{Good, GoodCatalog, GoodKind};
use crate::settlement::SettlementView;

/// Everything a contributor may read. Nothing here is mutable.
pub struct ProjectionInput<'a> {
    /// Simulation context.
    pub ctx: &'a SimulationContext,
    /// Built goods catalog.
    pub catalog: &'a GoodCatalog,
    /// The settlement being valued.
    pub settlement: &'a dyn SettlementView,
    /// The settlement's caches before this recomputation.
    pub state: &'a ValuationState,
    /// The good being valued.
    pub good: &'a Good,
}

/// A source of projected demand.
pub trait DemandProjection: fmt::Debug + Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Projected demand for the input's good. Zero when not applicable.
    fn project(&self, input: &ProjectionInput<'_>) -> f64;
}

/// Instantiate a built-in contributor.
#[must_use]
pub fn builtin(kind: ProjectionKind) -> Box<dyn DemandProjection> {
    match kind {
        ProjectionKind::Ice => Box::new(IceDemand),
        ProjectionKind::Regolith => Box::new(RegolithDemand),
        ProjectionKind::LifeSupport => Box::new(LifeSupportDemand),
        ProjectionKind::ManufacturingInput => Box::new(ManufacturingInputDemand),
        ProjectionKind::FoodProductionInput => Box::new(FoodProductionInputDemand),
        ProjectionKind::Construction => Box::new(ConstructionDemand),
        ProjectionKind::Maintenance => Box::new(MaintenanceDemand),
        ProjectionKind::EvaSuitParts => Box::new(EvaSuitPartDemand),
    }
}

/// Sum contributors, clamped to `[0, max]`.
pub(super) fn sum_projections(
    projections: &[Box<dyn DemandProjection>],
    input: &ProjectionInput<'_>,
    max: f64,
) -> f64 {
    let total: f64 = projections
        .iter()
        .map(|p| {
            let value = p.project(input);
            if value.is_finite() {
                value
            } else {
                tracing::warn!(projection = p.name(), good = input.good.name(), "Non-finite projection dropped");
                0.0
            }
        })
        .sum();
    total.max(0.0).min(max)
}

/// Demand of a raw resource driven by the demand of what it is processed into.
fn coupled_demand(input: &ProjectionInput<'_>, coupling: &CouplingConfig) -> f64 {
    let driver = input
        .catalog
        .id_of(&coupling.driver)
        .and_then(|id| input.state.demand(id))
        .unwrap_or(INITIAL_DEMAND);
    let own = input
        .state
        .demand(input.good.id())
        .unwrap_or(INITIAL_DEMAND);
    let people = f64::from(input.settlement.population().min(coupling.population_cap));
    let blended = coupling.driver_share * driver + (1.0 - coupling.driver_share) * own;
    people * blended * coupling.modifier
}

/// Ice, coupled to water.
#[derive(Debug, Clone, Copy)]
pub struct IceDemand;

impl DemandProjection for IceDemand {
    fn name(&self) -> &'static str {
        "ice"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        if input.good.name() != "ice" {
            return 0.0;
        }
        coupled_demand(input, &input.ctx.config.ice)
    }
}

/// Regolith of any grade, coupled to sand.
#[derive(Debug, Clone, Copy)]
pub struct RegolithDemand;

impl DemandProjection for RegolithDemand {
    fn name(&self) -> &'static str {
        "regolith"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        match input.good.kind() {
            GoodKind::Resource {
                kind: ResourceKind::Regolith,
                ..
            } => coupled_demand(input, &input.ctx.config.regolith),
            _ => 0.0,
        }
    }
}

/// Population consumption of oxygen, water and food.
#[derive(Debug, Clone, Copy)]
pub struct LifeSupportDemand;

impl DemandProjection for LifeSupportDemand {
    fn name(&self) -> &'static str {
        "life support"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        let ls = &input.ctx.config.life_support;
        let (rate, modifier) = match input.good.name() {
            "oxygen" => (ls.oxygen_rate, ls.oxygen_value_modifier),
            "water" => (ls.water_rate, ls.water_value_modifier),
            "food" => (ls.food_rate, ls.food_value_modifier),
            _ => return 0.0,
        };
        f64::from(input.settlement.population()) * (rate * modifier) * ls.factor
    }
}

/// Quantities consumed by manufacturing processes.
#[derive(Debug, Clone, Copy)]
pub struct ManufacturingInputDemand;

impl DemandProjection for ManufacturingInputDemand {
    fn name(&self) -> &'static str {
        "manufacturing input"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        let name = input.good.name();
        let quantity: f64 = input
            .ctx
            .processes()
            .manufacturing_consumers(name)
            .map(|p| p.input_quantity(name))
            .sum();
        quantity * input.ctx.config.manufacturing_input_factor
    }
}

/// Quantities consumed by food production processes.
#[derive(Debug, Clone, Copy)]
pub struct FoodProductionInputDemand;

impl DemandProjection for FoodProductionInputDemand {
    fn name(&self) -> &'static str {
        "food production input"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        let name = input.good.name();
        let quantity: f64 = input
            .ctx
            .processes()
            .food_production_consumers(name)
            .map(|p| p.input_quantity(name))
            .sum();
        quantity * input.ctx.config.food_production_input_factor
    }
}

/// Quantities still needed by construction stages in progress.
#[derive(Debug, Clone, Copy)]
pub struct ConstructionDemand;

impl DemandProjection for ConstructionDemand {
    fn name(&self) -> &'static str {
        "construction"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        let processes = input.ctx.processes();
        let quantity: f64 = input
            .settlement
            .construction_stages()
            .iter()
            .filter_map(|stage| processes.construction_stage(stage))
            .map(|stage| stage.input_quantity(input.good.name()))
            .sum();
        quantity * input.ctx.config.construction_input_factor
    }
}

/// Parts consumed by maintenance and repair.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceDemand;

impl DemandProjection for MaintenanceDemand {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        input.settlement.maintenance_demand(input.good.id()).max(0.0)
    }
}

/// Parts EVA suits are assembled from, one set per resident.
#[derive(Debug, Clone, Copy)]
pub struct EvaSuitPartDemand;

impl DemandProjection for EvaSuitPartDemand {
    fn name(&self) -> &'static str {
        "eva suit parts"
    }

    fn project(&self, input: &ProjectionInput<'_>) -> f64 {
        let config = &input.ctx.config;
        if !config.is_eva_suit_part(input.good.name()) {
            return 0.0;
        }
        f64::from(input.settlement.population()) * config.eva_part_factor
    }
}
