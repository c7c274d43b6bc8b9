//! Net debt between settlement pairs.
//!
//! The ledger keeps at most one signed edge per unordered pair of
//! settlements. Setting a new amount replaces the edge; listeners are told
//! about every change synchronously.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, Result};
use crate::settlement::SettlementId;

/// A change of credit between two settlements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditEvent {
    /// First party.
    pub a: SettlementId,
    /// Second party.
    pub b: SettlementId,
    /// New amount from `a`'s perspective.
    pub amount: f64,
}

/// Observer of credit changes.
pub trait CreditListener: Send + Sync {
    /// Called after every change.
    fn credit_update(&self, event: &CreditEvent);
}

impl<F> CreditListener for F
where
    F: Fn(&CreditEvent) + Send + Sync,
{
    fn credit_update(&self, event: &CreditEvent) {
        self(event);
    }
}

/// Stored edge: amount as seen from the lower id of the pair.
type Edges = BTreeMap<(SettlementId, SettlementId), f64>;

fn key(a: SettlementId, b: SettlementId) -> ((SettlementId, SettlementId), bool) {
    if a <= b {
        ((a, b), false)
    } else {
        ((b, a), true)
    }
}

/// Signed credit graph over settlements.
#[derive(Default)]
pub struct CreditLedger {
    settlements: RwLock<BTreeSet<SettlementId>>,
    edges: RwLock<Edges>,
    listeners: RwLock<Vec<Arc<dyn CreditListener>>>,
}

impl std::fmt::Debug for CreditLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditLedger")
            .field("settlements", &self.settlements)
            .field("edges", &self.edges)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl CreditLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a settlement known to the ledger.
    pub fn register_settlement(&self, id: SettlementId) {
        self.settlements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
    }

    /// Whether a settlement is known.
    #[must_use]
    pub fn is_registered(&self, id: SettlementId) -> bool {
        self.settlements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Set the credit `a` holds against `b`, replacing any previous amount.
    ///
    /// A positive amount means `b` owes `a`.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UnknownSettlement`] if either party has not
    /// been registered.
    pub fn set_credit(&self, a: SettlementId, b: SettlementId, amount: f64) -> Result<()> {
        for id in [a, b] {
            if !self.is_registered(id) {
                return Err(EconomyError::UnknownSettlement(id));
            }
        }

        let (pair, flipped) = key(a, b);
        let stored = if flipped { -amount } else { amount };
        self.edges
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pair, stored);

        let event = CreditEvent { a, b, amount };
        tracing::debug!(a = %a, b = %b, amount, "Credit set");

        // Notify from a copy so listeners may add or remove listeners.
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.credit_update(&event);
        }
        Ok(())
    }

    /// Credit `a` holds against `b`. Zero if they have no edge.
    #[must_use]
    pub fn get_credit(&self, a: SettlementId, b: SettlementId) -> f64 {
        let (pair, flipped) = key(a, b);
        let edges = self.edges.read().unwrap_or_else(PoisonError::into_inner);
        match edges.get(&pair) {
            Some(&amount) if flipped => -amount,
            Some(&amount) => amount,
            None => 0.0,
        }
    }

    /// Every edge as `(a, b, amount)` with `a < b`.
    #[must_use]
    pub fn edges(&self) -> Vec<CreditEvent> {
        self.edges
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(&(a, b), &amount)| CreditEvent { a, b, amount })
            .collect()
    }

    /// Register a listener. Adding the same listener twice is a no-op.
    pub fn add_listener(&self, listener: Arc<dyn CreditListener>) {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Unregister a listener. Returns whether it was registered.
    pub fn remove_listener(&self, listener: &Arc<dyn CreditListener>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::thread;

    use super::*;

    const A: SettlementId = SettlementId(1);
    const B: SettlementId = SettlementId(2);

    fn ledger() -> CreditLedger {
        let ledger = CreditLedger::new();
        ledger.register_settlement(A);
        ledger.register_settlement(B);
        ledger
    }

    #[test]
    fn test_credit_sign_convention() {
        let ledger = ledger();
        ledger.set_credit(A, B, 10.0).unwrap();
        assert!((ledger.get_credit(A, B) - 10.0).abs() < f64::EPSILON);
        assert!((ledger.get_credit(B, A) + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_credit_replaces() {
        let ledger = ledger();
        ledger.set_credit(A, B, 10.0).unwrap();
        ledger.set_credit(A, B, -5.0).unwrap();
        assert!((ledger.get_credit(A, B) + 5.0).abs() < f64::EPSILON);
        ledger.set_credit(B, A, 3.0).unwrap();
        assert!((ledger.get_credit(A, B) + 3.0).abs() < f64::EPSILON);
        assert_eq!(ledger.edges().len(), 1);
    }

    #[test]
    fn test_no_edge_is_zero() {
        let ledger = ledger();
        assert!(ledger.get_credit(A, B).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_party_is_error() {
        let ledger = ledger();
        let result = ledger.set_credit(A, SettlementId(9), 1.0);
        assert!(matches!(
            result,
            Err(EconomyError::UnknownSettlement(SettlementId(9)))
        ));
        assert!(ledger.edges().is_empty());
    }

    #[test]
    fn test_listener_receives_event() {
        let ledger = ledger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        ledger.add_listener(Arc::new(move |event: &CreditEvent| {
            sink.lock().unwrap().push(*event);
        }));
        ledger.set_credit(A, B, 7.5).unwrap();
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], CreditEvent { a: A, b: B, amount: 7.5 });
    }

    #[test]
    fn test_add_listener_is_idempotent() {
        let ledger = ledger();
        let listener: Arc<dyn CreditListener> = Arc::new(|_: &CreditEvent| {});
        ledger.add_listener(Arc::clone(&listener));
        ledger.add_listener(Arc::clone(&listener));
        assert_eq!(ledger.listener_count(), 1);
        assert!(ledger.remove_listener(&listener));
        assert!(!ledger.remove_listener(&listener));
        assert_eq!(ledger.listener_count(), 0);
    }

    #[test]
    fn test_concurrent_updates_and_registration() {
        let ledger = Arc::new(ledger());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    ledger.add_listener(Arc::new(|_: &CreditEvent| {}));
                    ledger.set_credit(A, B, f64::from(i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(ledger.listener_count(), 4);
        assert_eq!(ledger.edges().len(), 1);
    }
}
