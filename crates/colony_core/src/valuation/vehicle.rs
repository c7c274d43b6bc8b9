//! Vehicle recomputation.
//!
//! A vehicle type is worth the best share it would take of any mission
//! archetype's demand, given the capacity the fleet already has for that
//! mission. Valuing a unit the settlement already owns (selling) removes that
//! unit from the fleet first, so the buy and sell values differ and are cached
//! separately.

use serde::{Deserialize, Serialize};

use super::{MarketContext, ValuationEngine};
use crate::data::{ResourceKind, VehicleClass, VehicleData};
use crate::goods::{Good, GoodCatalog, GoodId, GoodKind};
use crate::settlement::{Job, SettlementView};

/// Range at which a rover counts fully for long-distance missions.
const FULL_RANGE_KM: f64 = 1_000.0;
/// Cargo mass counted as one unit of hauling capacity.
const CARGO_UNIT_KG: f64 = 1_000.0;
/// Cargo mass counted as one unit of drone delivery capacity.
const DRONE_CARGO_UNIT_KG: f64 = 100.0;

/// Kind of mission a vehicle can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionArchetype {
    /// Crew transfer to another settlement.
    TravelToSettlement,
    /// Site exploration.
    Exploration,
    /// Ice prospecting and hauling.
    CollectIce,
    /// Regolith hauling.
    CollectRegolith,
    /// Mineral mining.
    Mining,
    /// Trade runs.
    Trade,
    /// Rescue and salvage.
    RescueSalvage,
    /// On-site building construction.
    BuildingConstruction,
    /// Areology field study.
    AreologyFieldStudy,
    /// Biology field study.
    BiologyFieldStudy,
    /// Meteorology field study.
    MeteorologyFieldStudy,
    /// Emergency supply runs.
    EmergencySupply,
    /// Drone deliveries.
    Delivery,
}

impl MissionArchetype {
    /// Every archetype.
    pub const ALL: [Self; 13] = [
        Self::TravelToSettlement,
        Self::Exploration,
        Self::CollectIce,
        Self::CollectRegolith,
        Self::Mining,
        Self::Trade,
        Self::RescueSalvage,
        Self::BuildingConstruction,
        Self::AreologyFieldStudy,
        Self::BiologyFieldStudy,
        Self::MeteorologyFieldStudy,
        Self::EmergencySupply,
        Self::Delivery,
    ];

    /// Capacity one vehicle of this type brings to the mission.
    #[must_use]
    pub fn capacity(self, vehicle: &VehicleData) -> f64 {
        let rover = vehicle.class.is_rover();
        let crew = f64::from(vehicle.crew_capacity);
        let cargo = vehicle.cargo_capacity.max(0.0);
        let range = (vehicle.range_km() / FULL_RANGE_KM).clamp(0.0, 1.0);
        match self {
            Self::TravelToSettlement | Self::RescueSalvage | Self::EmergencySupply if rover => {
                crew * range
            }
            Self::Exploration if rover => crew + if vehicle.has_lab { 1.0 } else { 0.0 },
            Self::AreologyFieldStudy | Self::BiologyFieldStudy | Self::MeteorologyFieldStudy
                if rover && vehicle.has_lab =>
            {
                crew
            }
            Self::CollectIce | Self::CollectRegolith | Self::Mining if rover => cargo / CARGO_UNIT_KG,
            Self::Trade if rover => cargo / CARGO_UNIT_KG * range,
            Self::BuildingConstruction if vehicle.class == VehicleClass::LightUtility => 1.0,
            Self::Delivery if vehicle.class == VehicleClass::Drone => cargo / DRONE_CARGO_UNIT_KG,
            _ => 0.0,
        }
    }
}

/// Whether valuing `supply` units means acquiring one more unit rather than
/// giving one up.
pub(super) fn is_buying(settlement: &dyn SettlementView, vehicle_type: &str, supply: f64) -> bool {
    (supply - f64::from(settlement.vehicle_count(vehicle_type))).abs() < 0.5
}

fn jobs(settlement: &dyn SettlementView, of: &[Job]) -> f64 {
    of.iter().map(|&job| f64::from(settlement.job_count(job))).sum()
}

impl ValuationEngine {
    pub(super) fn recompute_vehicle(
        &mut self,
        market: &MarketContext<'_>,
        good: &Good,
        supply: f64,
    ) -> f64 {
        let config = &market.ctx.config;
        let id = good.id();
        let name = good.name();
        let GoodKind::Vehicle(class) = *good.kind() else {
            tracing::warn!(good = name, "Not a vehicle good");
            return 0.0;
        };
        let buy = is_buying(market.settlement, name, supply);

        let mut demand = match market.ctx.catalog_data().vehicle(name) {
            Some(spec) => self.mission_share(market, spec, buy),
            None => {
                tracing::warn!(good = name, "No vehicle specification");
                0.0
            }
        };

        let settlement = market.settlement;
        demand += match class {
            VehicleClass::LightUtility => {
                jobs(settlement, &[Job::Architect, Job::Engineer]) * config.vehicle.luv_factor
            }
            VehicleClass::Drone => {
                jobs(settlement, &[Job::Trader, Job::Pilot]) * config.vehicle.drone_factor
            }
            _ => 0.0,
        };

        demand *= match class {
            VehicleClass::TransportRover => config.vehicle.transport_factor,
            VehicleClass::CargoRover => config.vehicle.cargo_factor,
            VehicleClass::ExplorerRover => config.vehicle.explorer_factor,
            VehicleClass::LightUtility => config.vehicle.luv_transport_factor,
            VehicleClass::Drone => config.vehicle.drone_transport_factor,
        };
        demand += self.determine_trade_demand(market, id) * config.vehicle.trade_weight;

        let value = config.demand_bounds.clamp(demand);
        self.state.set_demand(id, value);
        self.state.values.insert(id, value);
        self.vehicle_values.insert(name, buy, value);

        tracing::debug!(good = name, buy, value, "Vehicle revalued");
        value
    }

    /// Best share of mission demand this vehicle type would take.
    fn mission_share(&self, market: &MarketContext<'_>, spec: &VehicleData, buy: bool) -> f64 {
        let catalog = market.ctx.catalog();
        MissionArchetype::ALL
            .iter()
            .map(|&mission| {
                let own = mission.capacity(spec);
                if own <= 0.0 {
                    return 0.0;
                }
                let fleet = fleet_capacity(market, mission, spec, buy);
                self.mission_demand(market, &catalog, mission) / (fleet + 1.0) * own
            })
            .fold(0.0, f64::max)
    }

    fn mission_demand(
        &self,
        market: &MarketContext<'_>,
        catalog: &GoodCatalog,
        mission: MissionArchetype,
    ) -> f64 {
        let settlement = market.settlement;
        let collection = market.ctx.config.vehicle.collection_factor;
        let remotes = market
            .remotes
            .iter()
            .filter(|r| r.settlement_id() != self.settlement)
            .count() as f64;
        let value_of = |id: GoodId| self.state.value(id).unwrap_or(0.0);

        match mission {
            MissionArchetype::TravelToSettlement => {
                remotes * f64::from(settlement.population()) / 10.0
            }
            MissionArchetype::Exploration | MissionArchetype::AreologyFieldStudy => {
                jobs(settlement, &[Job::Areologist])
            }
            MissionArchetype::CollectIce => {
                catalog.id_of("ice").map_or(0.0, value_of) * collection
            }
            MissionArchetype::CollectRegolith => {
                self.resource_values(market, |kind| kind == ResourceKind::Regolith)
                    .into_iter()
                    .fold(0.0, f64::max)
                    * collection
            }
            MissionArchetype::Mining => {
                let values = self.resource_values(market, |kind| {
                    matches!(kind, ResourceKind::Mineral | ResourceKind::Ore)
                });
                if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64 * collection
                }
            }
            MissionArchetype::Trade => jobs(settlement, &[Job::Trader]) * remotes,
            MissionArchetype::RescueSalvage | MissionArchetype::EmergencySupply => remotes,
            MissionArchetype::BuildingConstruction => settlement.construction_stages().len() as f64,
            MissionArchetype::BiologyFieldStudy => {
                jobs(settlement, &[Job::Biologist, Job::Botanist])
            }
            MissionArchetype::MeteorologyFieldStudy => jobs(settlement, &[Job::Meteorologist]),
            MissionArchetype::Delivery => jobs(settlement, &[Job::Trader]) + remotes,
        }
    }

    /// Cached values of every resource whose kind passes `keep`.
    fn resource_values(
        &self,
        market: &MarketContext<'_>,
        keep: impl Fn(ResourceKind) -> bool,
    ) -> Vec<f64> {
        market
            .ctx
            .catalog_data()
            .resources
            .iter()
            .filter(|r| keep(r.kind))
            .map(|r| self.state.value(GoodId(r.id)).unwrap_or(0.0))
            .collect()
    }
}

/// Capacity the settlement's fleet has for a mission. When selling, the unit
/// being valued is taken out first.
fn fleet_capacity(
    market: &MarketContext<'_>,
    mission: MissionArchetype,
    own: &VehicleData,
    buy: bool,
) -> f64 {
    let fleet: f64 = market
        .ctx
        .catalog_data()
        .vehicles
        .iter()
        .map(|v| f64::from(market.settlement.vehicle_count(&v.name)) * mission.capacity(v))
        .sum();
    if buy {
        fleet
    } else {
        (fleet - mission.capacity(own)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{catalog_data, context, settlement};
    use super::*;
    use crate::math::Coordinates;
    use crate::settlement::SettlementSnapshot;

    const CARGO_ROVER: GoodId = GoodId(2000);
    const LUV: GoodId = GoodId(2002);
    const DRONE: GoodId = GoodId(2003);

    fn spec(name: &str) -> VehicleData {
        catalog_data().vehicle(name).cloned().unwrap()
    }

    #[test]
    fn test_capacity_by_class() {
        let cargo = spec("cargo rover");
        let explorer = spec("explorer rover");
        let luv = spec("light utility vehicle");
        let drone = spec("delivery drone");

        assert!(MissionArchetype::CollectIce.capacity(&cargo) > MissionArchetype::CollectIce.capacity(&explorer));
        assert!(MissionArchetype::AreologyFieldStudy.capacity(&cargo).abs() < f64::EPSILON);
        assert!(MissionArchetype::AreologyFieldStudy.capacity(&explorer) > 0.0);
        assert!((MissionArchetype::BuildingConstruction.capacity(&luv) - 1.0).abs() < f64::EPSILON);
        assert!(MissionArchetype::Trade.capacity(&drone).abs() < f64::EPSILON);
        assert!(MissionArchetype::Delivery.capacity(&drone) > 0.0);
        assert!(MissionArchetype::Delivery.capacity(&cargo).abs() < f64::EPSILON);
    }

    #[test]
    fn test_buy_mode_when_supply_matches_fleet() {
        let base = settlement();
        assert!(is_buying(&base, "cargo rover", 1.0));
        assert!(!is_buying(&base, "cargo rover", 0.0));
        assert!(is_buying(&base, "delivery drone", 0.0));
    }

    #[test]
    fn test_sell_value_at_least_buy_value() {
        let ctx = context();
        let base = settlement();
        let market = MarketContext::new(&ctx, &base, &[]);
        let mut engine = ValuationEngine::new(&ctx, &base);
        // Give the rover something to haul.
        let mut state = engine.state().clone();
        state.values.insert(GoodId(3), 400.0);
        engine.restore_state(state);

        let buy = engine.determine_good_value(&market, CARGO_ROVER, 1.0, false);
        let sell = engine.determine_good_value(&market, CARGO_ROVER, 0.0, false);
        assert!(sell >= buy);
        assert_eq!(engine.vehicle_values().get("cargo rover", true), Some(buy));
        assert_eq!(engine.vehicle_values().get("cargo rover", false), Some(sell));
    }

    #[test]
    fn test_cached_vehicle_read_uses_buy_sell_cache() {
        let ctx = context();
        let base = settlement();
        let market = MarketContext::new(&ctx, &base, &[]);
        let mut engine = ValuationEngine::new(&ctx, &base);
        let buy = engine.determine_good_value(&market, CARGO_ROVER, 1.0, false);
        let sell = engine.determine_good_value(&market, CARGO_ROVER, 0.0, false);
        assert!((engine.determine_good_value(&market, CARGO_ROVER, 1.0, true) - buy).abs() < f64::EPSILON);
        assert!((engine.determine_good_value(&market, CARGO_ROVER, 0.0, true) - sell).abs() < f64::EPSILON);

        engine.prepare_for_load_calculation();
        assert!(engine.vehicle_values().is_empty());
    }

    #[test]
    fn test_specialists_drive_luv_and_drone_demand() {
        let ctx = context();
        let idle = SettlementSnapshot::new(3, "Idle", Coordinates::default(), 4);
        let busy = SettlementSnapshot::new(3, "Busy", Coordinates::default(), 4)
            .with_job(Job::Engineer, 5)
            .with_job(Job::Trader, 5);

        let mut a = ValuationEngine::new(&ctx, &idle);
        let mut b = ValuationEngine::new(&ctx, &busy);
        let idle_market = MarketContext::new(&ctx, &idle, &[]);
        let busy_market = MarketContext::new(&ctx, &busy, &[]);
        for good in [LUV, DRONE] {
            let low = a.determine_good_value(&idle_market, good, 0.0, false);
            let high = b.determine_good_value(&busy_market, good, 0.0, false);
            assert!(high > low, "{good}");
        }
    }

    #[test]
    fn test_vehicle_demand_is_bounded() {
        let ctx = context();
        let base = settlement().with_job(Job::Trader, 10_000);
        let market = MarketContext::new(&ctx, &base, &[]);
        let mut engine = ValuationEngine::new(&ctx, &base);
        let value = engine.determine_good_value(&market, DRONE, 0.0, false);
        assert!(value <= ctx.config.demand_bounds.max);
        assert!(value >= ctx.config.demand_bounds.min);
    }
}
