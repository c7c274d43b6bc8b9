//! Part (discrete item) recomputation.

use super::projection::{sum_projections, ProjectionInput};
use super::resource::log_estimate;
use super::{MarketContext, ValuationEngine, DEFAULT_PART_DEMAND};
use crate::config::PartFlattening;
use crate::goods::{Good, GoodCatalog};
use crate::math::{finite_or, safe_div};

/// Kitchen equipment built in fixed batches.
const KITCHENWARE: [&str; 8] = [
    "autoclave",
    "blender",
    "microwave",
    "oven",
    "refrigerator",
    "stove",
    "toaster",
    "food processor",
];

/// Move `previous` toward `raw` by `ratio` of the difference.
///
/// With `ratio` in `[0, 1]` the result always lies between the two.
#[must_use]
pub fn damp(previous: f64, raw: f64, ratio: f64) -> f64 {
    let ratio = finite_or(ratio, 1.0).clamp(0.0, 1.0);
    previous + (raw - previous) * ratio
}

fn flattening(name: &str, factors: &PartFlattening) -> f64 {
    if name.contains("scrap") {
        factors.scrap
    } else if name.contains("ingot") {
        factors.ingot
    } else if name.contains("sheet") {
        factors.sheet
    } else if KITCHENWARE.contains(&name) {
        factors.kitchen
    } else {
        1.0
    }
}

impl ValuationEngine {
    pub(super) fn recompute_part(
        &mut self,
        market: &MarketContext<'_>,
        catalog: &GoodCatalog,
        good: &Good,
        supply: f64,
    ) -> f64 {
        let config = &market.ctx.config;
        let id = good.id();
        let sols = market.ctx.clock.rate_sols();

        let previous = self.state.demand(id).unwrap_or(DEFAULT_PART_DEMAND);
        let average = log_estimate(market.settlement.demand_log(id), supply, sols);
        let projected = sum_projections(
            &self.part_projections,
            &ProjectionInput {
                ctx: market.ctx,
                catalog,
                settlement: market.settlement,
                state: &self.state,
                good,
            },
            config.max_projected_demand,
        );
        let trade = self.determine_trade_demand(market, id);

        let raw = config.part_weights.blend(previous, average, projected, trade)
            * flattening(good.name(), &config.part_flattening);
        let demand = config
            .demand_bounds
            .clamp(damp(previous, raw, config.damping_ratio));

        let total_supply = config
            .supply_bounds
            .clamp(log_estimate(market.settlement.supply_log(id), supply, sols));
        let value = safe_div(demand, total_supply, demand);

        self.state.set_demand(id, demand);
        self.state.values.insert(id, value);

        tracing::debug!(good = good.name(), previous, raw, demand, value, "Part revalued");
        value
    }
}
