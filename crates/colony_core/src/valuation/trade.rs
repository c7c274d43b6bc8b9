//! Trade demand: remote scarcity pulling up local valuation.

use super::state::ValuationState;
use super::{MarketContext, ValuationEngine};
use crate::goods::GoodId;
use crate::math::{finite_or, safe_div, Coordinates};
use crate::settlement::SettlementId;

/// Read-only view of another settlement's valuation caches.
///
/// This is the only way one engine sees another; nothing reachable from it
/// can mutate the remote state.
#[derive(Debug, Clone, Copy)]
pub struct RemoteMarket<'a> {
    settlement: SettlementId,
    location: Coordinates,
    state: &'a ValuationState,
}

impl<'a> RemoteMarket<'a> {
    pub(super) const fn new(
        settlement: SettlementId,
        location: Coordinates,
        state: &'a ValuationState,
    ) -> Self {
        Self {
            settlement,
            location,
            state,
        }
    }

    /// The remote settlement.
    #[must_use]
    pub const fn settlement_id(&self) -> SettlementId {
        self.settlement
    }

    /// Where the remote settlement is.
    #[must_use]
    pub const fn location(&self) -> Coordinates {
        self.location
    }

    /// The remote's cached demand for a good.
    #[must_use]
    pub fn demand(&self, good: GoodId) -> Option<f64> {
        self.state.demand(good)
    }
}

/// Remote demand discounted by distance: `demand / (1 + distance / scale)`.
///
/// Never negative. A zero scale disables the discount.
#[must_use]
pub fn discounted_demand(demand: f64, distance_km: f64, scale: f64) -> f64 {
    let distance = finite_or(distance_km, 0.0).max(0.0);
    let divisor = 1.0 + safe_div(distance, scale, 0.0);
    safe_div(demand, divisor, 0.0).max(0.0)
}

impl ValuationEngine {
    /// Best discounted demand for a good over every other settlement.
    ///
    /// The result is cached in the trade map.
    pub(super) fn determine_trade_demand(&mut self, market: &MarketContext<'_>, good: GoodId) -> f64 {
        let scale = market.ctx.config.trade_distance_scale;
        let here = market.settlement.location();
        let best = market
            .remotes
            .iter()
            .filter(|remote| remote.settlement_id() != self.settlement)
            .filter_map(|remote| {
                let demand = remote.demand(good)?;
                Some(discounted_demand(demand, here.distance_km(&remote.location()), scale))
            })
            .fold(0.0, f64::max);
        self.state.trade.insert(good, best);
        best
    }
}
