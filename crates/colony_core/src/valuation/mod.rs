//! Per-settlement goods valuation engine.
//!
//! Each settlement owns one [`ValuationEngine`]. A value point is either
//! served from the cache or recomputed synchronously by the algorithm of the
//! good's category:
//!
//! - bulk resources blend previous, average, projected and trade demand and
//!   divide by an estimated supply;
//! - parts do the same with damping and name-based flattening;
//! - equipment and containers sum demand drivers over a log-scaled supply;
//! - vehicles take the best mission archetype share of the fleet.
//!
//! Recomputation never fails. Missing data is logged and replaced by a
//! conservative default so a tick always completes, and every stored number
//! is finite and bounded.
//!
//! # Example
//!
//! ```no_run
//! use colony_core::prelude::*;
//!
//! # fn run(ctx: &SimulationContext, base: &SettlementSnapshot) {
//! let mut engine = ValuationEngine::new(ctx, base);
//! let market = MarketContext::new(ctx, base, &[]);
//! engine.update_goods_values(&market);
//! let water = ctx.catalog().id_of("water").unwrap();
//! let cached = engine.determine_good_value(&market, water, 0.0, true);
//! # }
//! ```

mod equipment;
mod part;
mod projection;
mod resource;
mod state;
mod trade;
mod vehicle;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::context::SimulationContext;
use crate::error::{EconomyError, Result};
use crate::goods::{Good, GoodCatalog, GoodCategory, GoodId, IdRange};
use crate::math::{finite_or, Coordinates};
use crate::settlement::{SettlementId, SettlementView};

pub use part::damp;
pub use projection::{builtin, DemandProjection, ProjectionInput};
pub use state::{ValuationState, VehicleValueCache, INITIAL_DEMAND, INITIAL_VALUE};
pub use trade::{discounted_demand, RemoteMarket};
pub use vehicle::MissionArchetype;

/// Bulk and part demand returned when the cache has no entry.
pub const DEFAULT_PART_DEMAND: f64 = 1.0;
/// Equipment demand returned when the cache has no entry.
pub const DEFAULT_EQUIPMENT_DEMAND: f64 = 5.0;
/// Vehicle demand returned when the cache has no entry.
pub const DEFAULT_VEHICLE_DEMAND: f64 = 10.0;

/// Everything one recomputation reads besides the engine's own caches.
#[derive(Clone, Copy)]
pub struct MarketContext<'a> {
    /// Simulation context.
    pub ctx: &'a SimulationContext,
    /// The settlement the engine belongs to.
    pub settlement: &'a dyn SettlementView,
    /// Other settlements' caches, for trade demand.
    pub remotes: &'a [RemoteMarket<'a>],
}

impl<'a> MarketContext<'a> {
    /// Bundle the inputs of a recomputation.
    #[must_use]
    pub fn new(
        ctx: &'a SimulationContext,
        settlement: &'a dyn SettlementView,
        remotes: &'a [RemoteMarket<'a>],
    ) -> Self {
        Self {
            ctx,
            settlement,
            remotes,
        }
    }
}

/// Stateful valuation engine of one settlement.
#[derive(Debug)]
pub struct ValuationEngine {
    settlement: SettlementId,
    location: Coordinates,
    state: ValuationState,
    vehicle_values: VehicleValueCache,
    resource_projections: Vec<Box<dyn DemandProjection>>,
    part_projections: Vec<Box<dyn DemandProjection>>,
}

impl ValuationEngine {
    /// Create an engine for a settlement and seed every good.
    #[must_use]
    pub fn new(ctx: &SimulationContext, settlement: &dyn SettlementView) -> Self {
        let config = &ctx.config;
        let mut engine = Self {
            settlement: settlement.id(),
            location: settlement.location(),
            state: ValuationState::default(),
            vehicle_values: VehicleValueCache::default(),
            resource_projections: config.resource_projections.iter().copied().map(builtin).collect(),
            part_projections: config.part_projections.iter().copied().map(builtin).collect(),
        };
        engine.populate_goods_values(&ctx.catalog());
        engine
    }

    /// Seed the caches with initial values for every good of the catalog.
    ///
    /// Existing entries are kept.
    pub fn populate_goods_values(&mut self, catalog: &GoodCatalog) {
        self.state.seed(catalog);
    }

    /// The settlement this engine values goods for.
    #[must_use]
    pub const fn settlement_id(&self) -> SettlementId {
        self.settlement
    }

    /// Read-only view for other settlements' trade demand.
    #[must_use]
    pub fn remote(&self) -> RemoteMarket<'_> {
        RemoteMarket::new(self.settlement, self.location, &self.state)
    }

    /// The valuation caches.
    #[must_use]
    pub const fn state(&self) -> &ValuationState {
        &self.state
    }

    /// Replace the valuation caches, e.g. after loading a saved game.
    pub fn restore_state(&mut self, state: ValuationState) {
        self.state = state;
        self.vehicle_values.clear();
    }

    /// The vehicle buy/sell cache.
    #[must_use]
    pub const fn vehicle_values(&self) -> &VehicleValueCache {
        &self.vehicle_values
    }

    /// Add a projected demand contributor for a category.
    ///
    /// # Errors
    ///
    /// Only bulk resources and parts use projected demand; any other
    /// category is a configuration error.
    pub fn register_projection(
        &mut self,
        category: GoodCategory,
        projection: Box<dyn DemandProjection>,
    ) -> Result<()> {
        match category {
            GoodCategory::BulkResource => self.resource_projections.push(projection),
            GoodCategory::DiscreteItem => self.part_projections.push(projection),
            other => {
                return Err(EconomyError::Configuration(format!(
                    "{} goods have no projected demand",
                    other.label()
                )))
            }
        }
        Ok(())
    }

    /// Value point of a good.
    ///
    /// With `use_cache` the last computed value is returned unchanged.
    /// Otherwise the category's algorithm runs, the caches are updated and
    /// the new value is returned. `supply` is the stored quantity, or the
    /// number of units owned for vehicles.
    pub fn determine_good_value(
        &mut self,
        market: &MarketContext<'_>,
        good: GoodId,
        supply: f64,
        use_cache: bool,
    ) -> f64 {
        let catalog = market.ctx.catalog();
        let Ok(entry) = catalog.get(good) else {
            tracing::warn!(%good, "Valuation requested for unknown good");
            return 0.0;
        };

        if use_cache {
            return self.cached_value(market, entry, supply);
        }

        let supply = finite_or(supply, 0.0).max(0.0);
        let value = match entry.category() {
            GoodCategory::BulkResource => self.recompute_resource(market, &catalog, entry, supply),
            GoodCategory::DiscreteItem => self.recompute_part(market, &catalog, entry, supply),
            GoodCategory::Equipment | GoodCategory::Container => {
                self.recompute_equipment(market, &catalog, entry, supply)
            }
            GoodCategory::Vehicle => self.recompute_vehicle(market, entry, supply),
        };
        finite_or(value, 0.0)
    }

    fn cached_value(&self, market: &MarketContext<'_>, good: &Good, supply: f64) -> f64 {
        let cached = if good.category() == GoodCategory::Vehicle {
            let buy = vehicle::is_buying(market.settlement, good.name(), supply);
            self.vehicle_values
                .get(good.name(), buy)
                .or_else(|| self.state.value(good.id()))
        } else {
            self.state.value(good.id())
        };
        cached.unwrap_or_else(|| {
            tracing::error!(good = good.name(), settlement = %self.settlement, "No cached value");
            0.0
        })
    }

    /// Recompute every good of the catalog in id order.
    pub fn update_goods_values(&mut self, market: &MarketContext<'_>) {
        let catalog = market.ctx.catalog();
        self.location = market.settlement.location();
        self.populate_goods_values(&catalog);
        for good in catalog.iter() {
            let supply = match good.category() {
                GoodCategory::Vehicle => f64::from(market.settlement.vehicle_count(good.name())),
                _ => market.settlement.stored(good.id()),
            };
            self.determine_good_value(market, good.id(), supply, false);
        }
        tracing::debug!(
            settlement = %self.settlement,
            goods = catalog.len(),
            "Goods values updated"
        );
    }

    /// Cached demand of a good, routed by id range.
    ///
    /// A miss is logged and answered with the category default.
    #[must_use]
    pub fn get_demand_value(&self, good: GoodId) -> f64 {
        let Some(range) = good.range() else {
            tracing::warn!(%good, "Demand requested for id outside every range");
            return 0.0;
        };
        self.state.demand(good).unwrap_or_else(|| {
            tracing::warn!(%good, settlement = %self.settlement, "No cached demand");
            match range {
                IdRange::Resource | IdRange::Item => DEFAULT_PART_DEMAND,
                IdRange::Equipment => DEFAULT_EQUIPMENT_DEMAND,
                IdRange::Vehicle => DEFAULT_VEHICLE_DEMAND,
            }
        })
    }

    /// Static production cost per unit, not the market value.
    #[must_use]
    pub fn get_price_per_item(ctx: &SimulationContext, good: GoodId) -> f64 {
        match ctx.catalog().get(good) {
            Ok(entry) => entry.output_cost(),
            Err(e) => {
                tracing::warn!("Price requested: {e}");
                0.0
            }
        }
    }

    /// Cached value point of one unit of a good.
    #[must_use]
    pub fn get_good_value_per_item(&self, good: GoodId) -> f64 {
        self.state.value(good).unwrap_or_else(|| {
            tracing::warn!(%good, settlement = %self.settlement, "No cached value");
            0.0
        })
    }

    /// Drop cached vehicle buy/sell values before a load planning pass.
    pub fn prepare_for_load_calculation(&mut self) {
        self.vehicle_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{context, settlement};
    use super::*;
    use crate::settlement::SettlementSnapshot;

    #[test]
    fn test_new_engine_seeds_every_good() {
        let ctx = context();
        let engine = ValuationEngine::new(&ctx, &settlement());
        let catalog = ctx.catalog();
        for good in catalog.iter() {
            assert_eq!(engine.state().value(good.id()), Some(INITIAL_VALUE));
            assert_eq!(engine.state().demand(good.id()), Some(INITIAL_DEMAND));
            assert_eq!(engine.state().trade(good.id()), Some(0.0));
        }
    }

    #[test]
    fn test_cached_read_is_idempotent() {
        let ctx = context();
        let base = settlement();
        let mut engine = ValuationEngine::new(&ctx, &base);
        let market = MarketContext::new(&ctx, &base, &[]);
        engine.update_goods_values(&market);
        for good in ctx.catalog().iter() {
            let first = engine.determine_good_value(&market, good.id(), 3.0, true);
            let second = engine.determine_good_value(&market, good.id(), 3.0, true);
            assert!((first - second).abs() < f64::EPSILON, "{}", good.name());
        }
    }

    #[test]
    fn test_cached_read_does_not_mutate() {
        let ctx = context();
        let base = settlement();
        let mut engine = ValuationEngine::new(&ctx, &base);
        let market = MarketContext::new(&ctx, &base, &[]);
        engine.update_goods_values(&market);
        let before = engine.state().clone();
        let water = ctx.catalog().id_of("water").unwrap();
        engine.determine_good_value(&market, water, 0.0, true);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_unknown_good_values_zero() {
        let ctx = context();
        let base = settlement();
        let mut engine = ValuationEngine::new(&ctx, &base);
        let market = MarketContext::new(&ctx, &base, &[]);
        assert!(engine.determine_good_value(&market, GoodId(777), 1.0, false).abs() < f64::EPSILON);
        assert!(engine.determine_good_value(&market, GoodId(777), 1.0, true).abs() < f64::EPSILON);
    }

    #[test]
    fn test_demand_value_defaults_on_miss() {
        let ctx = context();
        let mut engine = ValuationEngine::new(&ctx, &settlement());
        engine.restore_state(ValuationState::default());
        assert!((engine.get_demand_value(GoodId(5)) - DEFAULT_PART_DEMAND).abs() < f64::EPSILON);
        assert!((engine.get_demand_value(GoodId(1500)) - DEFAULT_PART_DEMAND).abs() < f64::EPSILON);
        assert!((engine.get_demand_value(GoodId(3500)) - DEFAULT_EQUIPMENT_DEMAND).abs() < f64::EPSILON);
        assert!((engine.get_demand_value(GoodId(2500)) - DEFAULT_VEHICLE_DEMAND).abs() < f64::EPSILON);
        assert!(engine.get_good_value_per_item(GoodId(5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_price_per_item_is_output_cost() {
        let ctx = context();
        let catalog = ctx.catalog();
        let valve = catalog.by_name("pipe valve").unwrap();
        let price = ValuationEngine::get_price_per_item(&ctx, valve.id());
        assert!((price - valve.output_cost()).abs() < f64::EPSILON);
        assert!(price > 0.0);
        assert!(ValuationEngine::get_price_per_item(&ctx, GoodId(999)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_register_projection_rejects_vehicles() {
        let ctx = context();
        let mut engine = ValuationEngine::new(&ctx, &settlement());
        let result = engine.register_projection(
            GoodCategory::Vehicle,
            builtin(crate::config::ProjectionKind::Construction),
        );
        assert!(matches!(result, Err(EconomyError::Configuration(_))));
        assert!(engine
            .register_projection(
                GoodCategory::BulkResource,
                builtin(crate::config::ProjectionKind::Construction),
            )
            .is_ok());
    }

    #[test]
    fn test_values_stay_finite_and_bounded_over_many_ticks() {
        let mut ctx = context();
        let base = settlement();
        let mut engine = ValuationEngine::new(&ctx, &base);
        for _ in 0..50 {
            ctx.clock.advance();
            let market = MarketContext::new(&ctx, &base, &[]);
            engine.update_goods_values(&market);
        }
        let bounds = ctx.config.demand_bounds;
        for good in ctx.catalog().iter() {
            let demand = engine.state().demand(good.id()).unwrap();
            assert!(demand >= bounds.min && demand <= bounds.max, "{}", good.name());
            assert!(engine.state().value(good.id()).unwrap().is_finite());
        }
    }

    #[test]
    fn test_empty_settlement_still_values() {
        let ctx = context();
        let empty = SettlementSnapshot::new(9, "Empty", Coordinates::default(), 0);
        let mut engine = ValuationEngine::new(&ctx, &empty);
        let market = MarketContext::new(&ctx, &empty, &[]);
        engine.update_goods_values(&market);
        assert!(engine.state().values.values().all(|v| v.is_finite()));
    }
}
