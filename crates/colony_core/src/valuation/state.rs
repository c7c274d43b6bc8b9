//! Per-settlement valuation caches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, Result};
use crate::goods::{GoodCatalog, GoodId, IdRange};

/// Value every good starts at.
pub const INITIAL_VALUE: f64 = 1.0;
/// Demand every good starts at.
pub const INITIAL_DEMAND: f64 = 10.0;

/// Cached value, demand and trade demand of every good at one settlement.
///
/// Demand is segmented by id range. Containers share the equipment map.
/// All maps are plain id to number maps so the surrounding persistence layer
/// can store them as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationState {
    /// Last computed value per good.
    pub values: BTreeMap<GoodId, f64>,
    /// Bulk resource demand.
    pub amount_demand: BTreeMap<GoodId, f64>,
    /// Part demand.
    pub part_demand: BTreeMap<GoodId, f64>,
    /// Equipment and container demand.
    pub equipment_demand: BTreeMap<GoodId, f64>,
    /// Vehicle demand.
    pub vehicle_demand: BTreeMap<GoodId, f64>,
    /// Discounted best remote demand per good.
    pub trade: BTreeMap<GoodId, f64>,
}

impl ValuationState {
    /// Seed every good of the catalog with initial values.
    ///
    /// Existing entries are kept so a restored snapshot survives.
    pub fn seed(&mut self, catalog: &GoodCatalog) {
        for good in catalog.iter() {
            let id = good.id();
            self.values.entry(id).or_insert(INITIAL_VALUE);
            self.trade.entry(id).or_insert(0.0);
            if let Some(map) = self.demand_map_mut(id) {
                map.entry(id).or_insert(INITIAL_DEMAND);
            }
        }
    }

    /// The demand map an id belongs to.
    #[must_use]
    pub fn demand_map(&self, id: GoodId) -> Option<&BTreeMap<GoodId, f64>> {
        match id.range()? {
            IdRange::Resource => Some(&self.amount_demand),
            IdRange::Item => Some(&self.part_demand),
            IdRange::Vehicle => Some(&self.vehicle_demand),
            IdRange::Equipment => Some(&self.equipment_demand),
        }
    }

    /// The demand map an id belongs to, mutably.
    pub fn demand_map_mut(&mut self, id: GoodId) -> Option<&mut BTreeMap<GoodId, f64>> {
        match id.range()? {
            IdRange::Resource => Some(&mut self.amount_demand),
            IdRange::Item => Some(&mut self.part_demand),
            IdRange::Vehicle => Some(&mut self.vehicle_demand),
            IdRange::Equipment => Some(&mut self.equipment_demand),
        }
    }

    /// Cached demand of a good.
    #[must_use]
    pub fn demand(&self, id: GoodId) -> Option<f64> {
        self.demand_map(id)?.get(&id).copied()
    }

    /// Store the demand of a good.
    pub fn set_demand(&mut self, id: GoodId, demand: f64) {
        if let Some(map) = self.demand_map_mut(id) {
            map.insert(id, demand);
        }
    }

    /// Cached value of a good.
    #[must_use]
    pub fn value(&self, id: GoodId) -> Option<f64> {
        self.values.get(&id).copied()
    }

    /// Cached trade demand of a good.
    #[must_use]
    pub fn trade(&self, id: GoodId) -> Option<f64> {
        self.trade.get(&id).copied()
    }

    /// Encode as a compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EconomyError::Serialization(e.to_string()))
    }

    /// Decode a binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| EconomyError::Serialization(e.to_string()))
    }
}

/// Vehicle values keyed by vehicle type name, split by whether the
/// settlement is acquiring or disposing of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleValueCache {
    /// Value of acquiring one more unit.
    pub buy: BTreeMap<String, f64>,
    /// Value of a unit the settlement would give up.
    pub sell: BTreeMap<String, f64>,
}

impl VehicleValueCache {
    /// Cached value for a vehicle type.
    #[must_use]
    pub fn get(&self, vehicle_type: &str, buy: bool) -> Option<f64> {
        let map = if buy { &self.buy } else { &self.sell };
        map.get(vehicle_type).copied()
    }

    /// Store a value for a vehicle type.
    pub fn insert(&mut self, vehicle_type: &str, buy: bool, value: f64) {
        let map = if buy { &mut self.buy } else { &mut self.sell };
        map.insert(vehicle_type.to_string(), value);
    }

    /// Forget every cached vehicle value.
    pub fn clear(&mut self) {
        self.buy.clear();
        self.sell.clear();
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}
