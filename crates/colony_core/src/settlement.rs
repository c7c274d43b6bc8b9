//! Read-only settlement data the valuation engine queries.
//!
//! The engine never owns settlement state. It asks a [`SettlementView`] for
//! inventory counters, roster counts and fleet composition, and
//! [`SettlementSnapshot`] is the plain-data implementation used by scenarios,
//! tools and tests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::goods::GoodId;
use crate::math::Coordinates;

/// Unique identifier for settlements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementId(pub u32);

impl fmt::Display for SettlementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "settlement {}", self.0)
    }
}

/// Colonist job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Job {
    /// Geology and mining.
    Areologist,
    /// Building design.
    Architect,
    /// Sky survey.
    Astronomer,
    /// Life science.
    Biologist,
    /// Greenhouse crops.
    Botanist,
    /// Kitchen.
    Chef,
    /// Chemistry.
    Chemist,
    /// Medicine.
    Doctor,
    /// Vehicles and machinery.
    Engineer,
    /// Mathematics.
    Mathematician,
    /// Weather.
    Meteorologist,
    /// Physics.
    Physicist,
    /// Vehicle operation.
    Pilot,
    /// Governance.
    Politician,
    /// News.
    Reporter,
    /// Maintenance.
    Technician,
    /// Trade.
    Trader,
}

/// Counters of requests for one good at one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLog {
    /// Total quantity requested or supplied (kg or units).
    pub amount: f64,
    /// Number of requests.
    pub requests: u32,
    /// Requests that were satisfied.
    pub met: u32,
    /// Requests that were not satisfied.
    pub unmet: u32,
}

impl RequestLog {
    /// Create a log with an amount and request count.
    #[must_use]
    pub const fn new(amount: f64, requests: u32) -> Self {
        Self {
            amount,
            requests,
            met: requests,
            unmet: 0,
        }
    }
}

/// Read-only queries the valuation engine makes against a settlement.
pub trait SettlementView {
    /// Settlement id.
    fn id(&self) -> SettlementId;

    /// Display name.
    fn name(&self) -> &str;

    /// Surface location.
    fn location(&self) -> Coordinates;

    /// Number of residents.
    fn population(&self) -> u32;

    /// Number of residents with the given job.
    fn job_count(&self, job: Job) -> u32;

    /// Quantity stored (kg for resources, units otherwise).
    fn stored(&self, good: GoodId) -> f64;

    /// Demand-side request counters.
    fn demand_log(&self, good: GoodId) -> RequestLog;

    /// Supply-side request counters.
    fn supply_log(&self, good: GoodId) -> RequestLog;

    /// Storage capacity for a bulk resource in kg.
    fn storage_capacity(&self, good: GoodId) -> f64;

    /// Number of vehicles of the named type owned.
    fn vehicle_count(&self, vehicle_type: &str) -> u32;

    /// Expected parts consumed per sol by maintenance and repair.
    fn maintenance_demand(&self, good: GoodId) -> f64;

    /// Names of construction stages in progress.
    fn construction_stages(&self) -> Vec<String>;
}

/// Plain-data settlement state.
///
/// # Example RON
///
/// ```ron
/// SettlementSnapshot(
///     id: 1,
///     name: "Schiaparelli Point",
///     location: (latitude: -2.0, longitude: 16.0),
///     population: 12,
///     jobs: { Areologist: 2, Trader: 1 },
///     stored: { 1: 500.0 },
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSnapshot {
    /// Settlement id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Surface location.
    pub location: Coordinates,
    /// Number of residents.
    pub population: u32,
    /// Residents per job.
    pub jobs: BTreeMap<Job, u32>,
    /// Stored quantity per good id.
    pub stored: BTreeMap<u32, f64>,
    /// Demand request counters per good id.
    pub demand: BTreeMap<u32, RequestLog>,
    /// Supply request counters per good id.
    pub supply: BTreeMap<u32, RequestLog>,
    /// Storage capacity per resource id.
    pub capacity: BTreeMap<u32, f64>,
    /// Vehicles owned per type name.
    pub fleet: BTreeMap<String, u32>,
    /// Maintenance part demand per good id.
    pub maintenance: BTreeMap<u32, f64>,
    /// Construction stages in progress.
    pub construction: Vec<String>,
}

impl SettlementSnapshot {
    /// Create an empty settlement.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, location: Coordinates, population: u32) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            population,
            ..Default::default()
        }
    }

    /// Set the number of residents with a job.
    #[must_use]
    pub fn with_job(mut self, job: Job, count: u32) -> Self {
        self.jobs.insert(job, count);
        self
    }

    /// Set a stored quantity.
    #[must_use]
    pub fn with_stored(mut self, good: GoodId, amount: f64) -> Self {
        self.stored.insert(good.0, amount);
        self
    }

    /// Set the number of vehicles of a type.
    #[must_use]
    pub fn with_vehicles(mut self, vehicle_type: &str, count: u32) -> Self {
        self.fleet.insert(vehicle_type.trim().to_lowercase(), count);
        self
    }

    /// Add to the demand counters of a good.
    pub fn record_demand(&mut self, good: GoodId, amount: f64, met: bool) {
        let log = self.demand.entry(good.0).or_default();
        log.amount += amount;
        log.requests += 1;
        if met {
            log.met += 1;
        } else {
            log.unmet += 1;
        }
    }

    /// Add to the supply counters of a good.
    pub fn record_supply(&mut self, good: GoodId, amount: f64) {
        let log = self.supply.entry(good.0).or_default();
        log.amount += amount;
        log.requests += 1;
        log.met += 1;
    }
}

impl SettlementView for SettlementSnapshot {
    fn id(&self) -> SettlementId {
        SettlementId(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Coordinates {
        self.location
    }

    fn population(&self) -> u32 {
        self.population
    }

    fn job_count(&self, job: Job) -> u32 {
        self.jobs.get(&job).copied().unwrap_or(0)
    }

    fn stored(&self, good: GoodId) -> f64 {
        self.stored.get(&good.0).copied().unwrap_or(0.0)
    }

    fn demand_log(&self, good: GoodId) -> RequestLog {
        self.demand.get(&good.0).copied().unwrap_or_default()
    }

    fn supply_log(&self, good: GoodId) -> RequestLog {
        self.supply.get(&good.0).copied().unwrap_or_default()
    }

    fn storage_capacity(&self, good: GoodId) -> f64 {
        self.capacity.get(&good.0).copied().unwrap_or(0.0)
    }

    fn vehicle_count(&self, vehicle_type: &str) -> u32 {
        self.fleet
            .get(&vehicle_type.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    fn maintenance_demand(&self, good: GoodId) -> f64 {
        self.maintenance.get(&good.0).copied().unwrap_or(0.0)
    }

    fn construction_stages(&self) -> Vec<String> {
        self.construction.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_to_zero() {
        let s = SettlementSnapshot::new(1, "Base", Coordinates::default(), 4);
        assert_eq!(s.job_count(Job::Trader), 0);
        assert!(s.stored(GoodId(1)).abs() < f64::EPSILON);
        assert_eq!(s.demand_log(GoodId(1)), RequestLog::default());
        assert_eq!(s.vehicle_count("cargo rover"), 0);
    }

    #[test]
    fn test_vehicle_names_are_normalized() {
        let s = SettlementSnapshot::new(1, "Base", Coordinates::default(), 4)
            .with_vehicles("Cargo Rover ", 2);
        assert_eq!(s.vehicle_count("cargo rover"), 2);
        assert_eq!(s.vehicle_count("CARGO ROVER"), 2);
    }

    #[test]
    fn test_record_demand_counts_met_and_unmet() {
        let mut s = SettlementSnapshot::new(1, "Base", Coordinates::default(), 4);
        s.record_demand(GoodId(1), 5.0, true);
        s.record_demand(GoodId(1), 3.0, false);
        let log = s.demand_log(GoodId(1));
        assert!((log.amount - 8.0).abs() < f64::EPSILON);
        assert_eq!(log.requests, 2);
        assert_eq!(log.met, 1);
        assert_eq!(log.unmet, 1);
    }

    #[test]
    fn test_snapshot_from_ron() {
        let source = r#"
            SettlementSnapshot(
                id: 7,
                name: "Schiaparelli Point",
                location: (latitude: -2.0, longitude: 16.0),
                population: 12,
                jobs: { Areologist: 2, Trader: 1 },
                stored: { 1: 500.0 },
                fleet: { "cargo rover": 1 },
            )
        "#;
        let s: SettlementSnapshot = ron::from_str(source).expect("valid snapshot");
        assert_eq!(s.id(), SettlementId(7));
        assert_eq!(s.job_count(Job::Areologist), 2);
        assert!((s.stored(GoodId(1)) - 500.0).abs() < f64::EPSILON);
        assert_eq!(s.vehicle_count("cargo rover"), 1);
    }
}
