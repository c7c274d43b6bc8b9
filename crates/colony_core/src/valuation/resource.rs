//! Bulk resource recomputation.

use super::projection::{sum_projections, ProjectionInput};
use super::state::INITIAL_DEMAND;
use super::{MarketContext, ValuationEngine};
use crate::config::ResourceValueCaching;
use crate::goods::{Good, GoodCatalog};
use crate::math::{log_rate, safe_div};
use crate::settlement::RequestLog;

/// `ln(1 + amount * requests + stored) / sols` over a request log.
pub(super) fn log_estimate(log: RequestLog, stored: f64, sols: f64) -> f64 {
    log_rate(log.amount * f64::from(log.requests) + stored, sols)
}

impl ValuationEngine {
    pub(super) fn recompute_resource(
        &mut self,
        market: &MarketContext<'_>,
        catalog: &GoodCatalog,
        good: &Good,
        supply: f64,
    ) -> f64 {
        let config = &market.ctx.config;
        let id = good.id();
        let sols = market.ctx.clock.rate_sols();
        let floor = good
            .is_life_support()
            .then_some(config.life_support.floor);

        let previous = self.state.demand(id).unwrap_or(INITIAL_DEMAND);

        let mut average = log_estimate(market.settlement.demand_log(id), supply, sols);
        if let Some(floor) = floor {
            average = average.max(floor);
        }

        let projected = sum_projections(
            &self.resource_projections,
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

        let mut total = config
            .resource_weights
            .blend(previous, average, projected, trade);
        if let Some(floor) = floor {
            total = total.max(floor);
        }
        let total = config.demand_bounds.clamp(total);

        let total_supply = config
            .supply_bounds
            .clamp(log_estimate(market.settlement.supply_log(id), supply, sols));
        let value = safe_div(total, total_supply, total);

        self.state.set_demand(id, total);
        let cached = match config.resource_value_caching {
            ResourceValueCaching::Demand => total,
            ResourceValueCaching::Ratio => value,
        };
        self.state.values.insert(id, cached);

        tracing::debug!(
            good = good.name(),
            previous,
            average,
            projected,
            trade,
            demand = total,
            supply = total_supply,
            value,
            "Resource revalued"
        );
        value
    }
}
