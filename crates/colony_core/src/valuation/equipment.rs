//! Equipment and container recomputation.

use super::{MarketContext, ValuationEngine};
use crate::config::EquipmentConfig;
use crate::data::EquipmentKind;
use crate::goods::{Good, GoodCatalog, GoodCategory, GoodId, GoodKind};
use crate::math::safe_div;
use crate::settlement::Job;

fn role_demand(kind: EquipmentKind, config: &EquipmentConfig) -> f64 {
    match kind {
        EquipmentKind::EvaSuit => 0.0,
        EquipmentKind::Bag => config.bag_demand,
        EquipmentKind::LargeBag => config.large_bag_demand,
        EquipmentKind::Barrel => config.barrel_demand,
        EquipmentKind::SpecimenBox => config.specimen_box_demand,
        EquipmentKind::GasCanister => config.gas_canister_demand,
    }
}

impl ValuationEngine {
    pub(super) fn recompute_equipment(
        &mut self,
        market: &MarketContext<'_>,
        catalog: &GoodCatalog,
        good: &Good,
        supply: f64,
    ) -> f64 {
        let config = &market.ctx.config;
        let id = good.id();
        let GoodKind::Equipment(kind) = *good.kind() else {
            tracing::warn!(good = good.name(), "Not an equipment good");
            return 0.0;
        };

        let mut drivers = 0.0;
        if kind.is_container() {
            drivers += self.container_overfill(market, id);
            drivers += role_demand(kind, &config.equipment)
                * f64::from(market.settlement.job_count(Job::Areologist));
        } else {
            drivers += self.eva_part_demand(market, catalog) * config.equipment.eva_suit_factor;
        }
        drivers += self.determine_trade_demand(market, id) * config.equipment.trade_weight;

        let demand = config.demand_bounds.clamp(1.0 + drivers);
        let value = safe_div(demand, supply.ln_1p(), demand);

        self.state.set_demand(id, demand);
        self.state.values.insert(id, value);

        tracing::debug!(good = good.name(), demand, value, "Equipment revalued");
        value
    }

    /// Summed cached demand of every EVA suit part.
    fn eva_part_demand(&self, market: &MarketContext<'_>, catalog: &GoodCatalog) -> f64 {
        catalog
            .of_category(GoodCategory::DiscreteItem)
            .filter(|part| market.ctx.config.is_eva_suit_part(part.name()))
            .filter_map(|part| self.state.demand(part.id()))
            .sum()
    }

    /// Containers needed to hold what exceeds storage capacity for
    /// resources of the container's phase.
    fn container_overfill(&self, market: &MarketContext<'_>, container: GoodId) -> f64 {
        let data = market.ctx.catalog_data();
        let Some(spec) = data.equipment.iter().find(|e| e.id == container.0) else {
            return 0.0;
        };
        let Some(phase) = spec.phase else {
            return 0.0;
        };
        let excess: f64 = data
            .resources
            .iter()
            .filter(|r| r.phase == phase)
            .map(|r| {
                let id = GoodId(r.id);
                (market.settlement.stored(id) - market.settlement.storage_capacity(id)).max(0.0)
            })
            .sum();
        safe_div(excess, spec.capacity, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{context, settlement};
    use super::*;
    use crate::settlement::SettlementSnapshot;

    const EVA_SUIT: GoodId = GoodId(3000);
    const BARREL: GoodId = GoodId(3001);
    const BAG: GoodId = GoodId(3002);

    fn value(base: &SettlementSnapshot, good: GoodId, supply: f64) -> (ValuationEngine, f64) {
        let ctx = context();
        let mut engine = ValuationEngine::new(&ctx, base);
        let value = engine.determine_good_value(&MarketContext::new(&ctx, base, &[]), good, supply, false);
        (engine, value)
    }

    #[test]
    fn test_eva_suit_demand_sums_part_demand() {
        let (engine, _) = value(&settlement(), EVA_SUIT, 2.0);
        // Two EVA parts in the fixture, each seeded at the initial demand.
        let demand = engine.state().demand(EVA_SUIT).unwrap();
        assert!((demand - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_is_demand_over_log_supply() {
        let (engine, value) = value(&settlement(), EVA_SUIT, 4.0);
        let demand = engine.state().demand(EVA_SUIT).unwrap();
        assert!((value - demand / 5.0_f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_supply_value_is_demand() {
        let (engine, value) = value(&settlement(), BAG, 0.0);
        assert!((value - engine.state().demand(BAG).unwrap()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overfill_raises_container_demand() {
        let base = settlement();
        let overfull = settlement().with_stored(GoodId(1), 1_000.0);
        let (calm, _) = value(&base, BARREL, 1.0);
        let (busy, _) = value(&overfull, BARREL, 1.0);
        // 1000 kg of water over zero capacity fills ten 100 kg barrels.
        let delta = busy.state().demand(BARREL).unwrap() - calm.state().demand(BARREL).unwrap();
        assert!((delta - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_overfill_ignores_other_phases() {
        let base = settlement();
        let overfull = settlement().with_stored(GoodId(2), 1_000.0);
        let (calm, _) = value(&base, BARREL, 1.0);
        let (busy, _) = value(&overfull, BARREL, 1.0);
        assert!((busy.state().demand(BARREL).unwrap() - calm.state().demand(BARREL).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_areologists_raise_bag_demand() {
        let few = settlement();
        let many = settlement().with_job(Job::Areologist, 11);
        let (a, _) = value(&few, BAG, 1.0);
        let (b, _) = value(&many, BAG, 1.0);
        let delta = b.state().demand(BAG).unwrap() - a.state().demand(BAG).unwrap();
        assert!((delta - 10.0 * EquipmentConfig::default().bag_demand).abs() < 1e-9);
    }
}
