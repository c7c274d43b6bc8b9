//! # Colony Core
//!
//! Goods valuation engine for Mars settlements.
//!
//! This crate computes a bounded, incrementally updated "value point" for
//! every tradeable good at every settlement, from inventory, roster,
//! production processes and other settlements' demand. It contains no IO
//! besides parsing strings handed to it, and never aborts a tick: missing
//! data is logged and replaced by conservative defaults.
//!
//! ## Crate Structure
//!
//! - [`goods`] - Good ids, descriptors, cost model and the build-once catalog
//! - [`data`] - Upstream catalog and production process data
//! - [`valuation`] - Per-settlement valuation engine
//! - [`credit`] - Net debt ledger between settlements
//! - [`settlement`] - Read-only settlement data the engine queries
//! - [`context`] - Explicit simulation context
//! - [`colony`] - Orchestration of many settlements over time
//! - [`config`] - Tuning constants

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod colony;
pub mod config;
pub mod context;
pub mod credit;
pub mod data;
pub mod error;
pub mod goods;
pub mod math;
pub mod settlement;
pub mod valuation;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::colony::{Colony, ColonyReport, ScenarioData};
    pub use crate::config::ValuationConfig;
    pub use crate::context::{MarsClock, SimulationContext};
    pub use crate::credit::{CreditEvent, CreditLedger, CreditListener};
    pub use crate::data::{CatalogData, ProcessCatalog};
    pub use crate::error::{EconomyError, Result};
    pub use crate::goods::{Good, GoodCatalog, GoodCategory, GoodId, GoodsRegistry};
    pub use crate::math::Coordinates;
    pub use crate::settlement::{Job, SettlementId, SettlementSnapshot, SettlementView};
    pub use crate::valuation::{DemandProjection, MarketContext, ValuationEngine, ValuationState};
}
