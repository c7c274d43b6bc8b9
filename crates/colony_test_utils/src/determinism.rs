//! Determinism testing utilities.
//!
//! Provides a harness for verifying that valuation produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Settlements are revalued in a fixed order and every cache is a
//! `BTreeMap`, so two runs over the same data must agree bit for bit.
//! Sources of divergence include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Goods and settlements are always walked in id order.
//!
//! - **Tick order**: Engines read each other's caches for trade demand,
//!   so changing the update order changes the numbers.
//!
//! - **Snapshot loss**: A cache that does not survive a save/load round
//!   trip unchanged would make a resumed run drift from an uninterrupted
//!   one.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use colony_core::colony::{Colony, ColonyReport};
use colony_core::settlement::SettlementView;
use colony_core::valuation::ValuationState;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Fingerprints from each run.
    pub hashes: Vec<u64>,
    /// Number of sols simulated.
    pub sols: u32,
}

impl DeterminismResult {
    /// Get all unique fingerprints (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs agreed, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different fingerprints.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Valuation is non-deterministic!\n\
                 Runs: {}\n\
                 Sols: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.sols,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `sols` - Number of sols to simulate per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance by one sol
/// * `hash` - Function to fingerprint the state
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    sols: u32,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..sols {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        sols,
    }
}

/// Run a colony twice and compare report fingerprints.
///
/// # Example
///
/// ```ignore
/// use colony_test_utils::{determinism, fixtures};
///
/// assert!(determinism::verify_colony_determinism(fixtures::colony, 20));
/// ```
pub fn verify_colony_determinism<F>(setup_fn: F, sols: u32) -> bool
where
    F: Fn() -> Colony,
{
    verify_determinism(2, sols, &setup_fn, Colony::tick, |colony| {
        report_fingerprint(&colony.report())
    })
    .is_deterministic
}

/// Find the first sol at which two runs of the same colony diverge.
pub fn find_first_divergence<F>(setup_fn: F, sols: u32) -> Option<u32>
where
    F: Fn() -> Colony,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    for sol in 1..=sols {
        first.tick();
        second.tick();
        if report_fingerprint(&first.report()) != report_fingerprint(&second.report()) {
            return Some(sol);
        }
    }

    None
}

/// Verify that every engine's caches survive a bincode round trip exactly.
pub fn verify_snapshot_round_trip<F>(setup_fn: F, sols: u32) -> bool
where
    F: Fn() -> Colony,
{
    let mut colony = setup_fn();
    colony.run(sols);

    colony.settlements().iter().all(|settlement| {
        let Ok(engine) = colony.engine(settlement.id()) else {
            return false;
        };
        let Ok(bytes) = engine.state().to_bytes() else {
            return false;
        };
        ValuationState::from_bytes(&bytes).is_ok_and(|restored| &restored == engine.state())
    })
}

/// Fingerprint a report. Floats are hashed by bit pattern.
#[must_use]
pub fn report_fingerprint(report: &ColonyReport) -> u64 {
    let mut hasher = DefaultHasher::new();
    report.sol.hash(&mut hasher);
    for settlement in &report.settlements {
        settlement.id.hash(&mut hasher);
        for good in &settlement.goods {
            good.id.hash(&mut hasher);
            good.value.to_bits().hash(&mut hasher);
            good.demand.to_bits().hash(&mut hasher);
            good.trade.to_bits().hash(&mut hasher);
        }
    }
    for credit in &report.credits {
        credit.a.hash(&mut hasher);
        credit.b.hash(&mut hasher);
        credit.amount.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// Proptest strategies for valuation testing.
///
/// These strategies generate random but reproducible settlements and
/// inventories for property-based testing.
pub mod strategies {
    use colony_core::math::Coordinates;
    use colony_core::settlement::{Job, RequestLog, SettlementSnapshot};
    use proptest::prelude::*;

    /// Generate a surface location.
    pub fn arb_coordinates() -> impl Strategy<Value = Coordinates> {
        (-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lon)| Coordinates::new(lat, lon))
    }

    /// Generate a population, including an empty settlement.
    pub fn arb_population() -> impl Strategy<Value = u32> {
        0u32..200
    }

    /// Generate a stored quantity, including degenerate values the engine
    /// must guard against.
    pub fn arb_supply() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => 0.0f64..10_000.0,
            1 => Just(0.0),
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
            1 => Just(-5.0),
        ]
    }

    /// Generate a finite, non-negative demand.
    pub fn arb_demand() -> impl Strategy<Value = f64> {
        0.0f64..5_000.0
    }

    /// Generate a request history.
    pub fn arb_request_log() -> impl Strategy<Value = RequestLog> {
        (0.0f64..500.0, 0u32..50, 0u32..10).prop_map(|(amount, requests, unmet)| RequestLog {
            amount,
            requests,
            met: requests.saturating_sub(unmet),
            unmet: unmet.min(requests),
        })
    }

    /// Generate a job roster.
    pub fn arb_jobs() -> impl Strategy<Value = Vec<(Job, u32)>> {
        proptest::collection::vec(
            (
                prop_oneof![
                    Just(Job::Areologist),
                    Just(Job::Architect),
                    Just(Job::Biologist),
                    Just(Job::Botanist),
                    Just(Job::Engineer),
                    Just(Job::Meteorologist),
                    Just(Job::Pilot),
                    Just(Job::Trader),
                ],
                0u32..8,
            ),
            0..6,
        )
    }

    /// Generate a settlement stocking goods from `goods` with the given id.
    pub fn arb_settlement(id: u32, goods: Vec<u32>) -> impl Strategy<Value = SettlementSnapshot> {
        let count = goods.len();
        (
            arb_coordinates(),
            arb_population(),
            arb_jobs(),
            proptest::collection::vec(0.0f64..5_000.0, count),
            proptest::collection::vec(proptest::option::of(arb_request_log()), count),
            0u32..3,
        )
            .prop_map(move |(location, population, jobs, stored, logs, rovers)| {
                let mut settlement =
                    SettlementSnapshot::new(id, format!("Settlement {id}"), location, population);
                for (job, n) in jobs {
                    *settlement.jobs.entry(job).or_insert(0) += n;
                }
                for ((&good, amount), log) in goods.iter().zip(stored).zip(logs) {
                    settlement.stored.insert(good, amount);
                    if let Some(log) = log {
                        settlement.demand.insert(good, log);
                    }
                }
                if rovers > 0 {
                    settlement.fleet.insert("cargo rover".to_string(), rovers);
                }
                settlement
            })
    }

    /// Generate a number of sols to simulate.
    pub fn arb_sols() -> impl Strategy<Value = u32> {
        1u32..30
    }
}

#[cfg(test)]
mod tests {
    use super::strategies::*;
    use super::*;
    use crate::fixtures;
    use proptest::prelude::*;

    #[test]
    fn test_shipped_colony_is_deterministic() {
        let result = verify_determinism(3, 10, fixtures::colony, Colony::tick, |colony| {
            report_fingerprint(&colony.report())
        });
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_no_divergence() {
        assert_eq!(find_first_divergence(fixtures::colony, 10), None);
    }

    #[test]
    fn test_snapshot_round_trip() {
        assert!(verify_snapshot_round_trip(fixtures::colony, 5));
    }

    #[test]
    fn test_fingerprint_sees_value_changes() {
        let mut colony = fixtures::colony();
        let before = report_fingerprint(&colony.report());
        colony.tick();
        assert_ne!(before, report_fingerprint(&colony.report()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_request_log_is_consistent(log in arb_request_log()) {
            prop_assert_eq!(log.met + log.unmet, log.requests);
        }

        #[test]
        fn prop_random_settlement_is_deterministic(
            settlement in arb_settlement(1, vec![1, 2, 6, 9, 1000]),
            sols in arb_sols(),
        ) {
            let setup = || {
                let mut colony = Colony::new(fixtures::context());
                colony
                    .add_settlement(settlement.clone())
                    .expect("single settlement");
                colony
            };
            prop_assert!(verify_colony_determinism(setup, sols));
        }
    }
}
