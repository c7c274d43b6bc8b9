//! Explicitly constructed simulation context.
//!
//! Holds what every valuation call needs (configuration, goods catalog,
//! process catalogs, clock) and is passed by reference instead of being
//! reached through a global.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ValuationConfig;
use crate::data::{CatalogData, ProcessCatalog};
use crate::error::Result;
use crate::goods::{GoodCatalog, GoodsRegistry};

/// Simulated Martian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarsClock {
    sols: u32,
}

impl MarsClock {
    /// Create a clock at a given elapsed sol count.
    #[must_use]
    pub const fn at_sol(sols: u32) -> Self {
        Self { sols }
    }

    /// Sols elapsed since landing.
    #[must_use]
    pub const fn sols_elapsed(&self) -> u32 {
        self.sols
    }

    /// Sols used to normalize rates. Never zero.
    #[must_use]
    pub fn rate_sols(&self) -> f64 {
        f64::from(self.sols.max(1))
    }

    /// Advance by one sol.
    pub fn advance(&mut self) {
        self.sols = self.sols.saturating_add(1);
    }
}

/// Everything shared by the valuation engines of one simulation run.
#[derive(Debug)]
pub struct SimulationContext {
    /// Tuning constants.
    pub config: ValuationConfig,
    /// Simulation clock.
    pub clock: MarsClock,
    goods: GoodsRegistry,
}

impl SimulationContext {
    /// Create a context and build the goods catalog.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tuning is unusable or the catalog
    /// cannot be built. This is the only point where broken data halts the
    /// simulation.
    pub fn new(
        config: ValuationConfig,
        catalog: CatalogData,
        processes: ProcessCatalog,
    ) -> Result<Self> {
        config.validate()?;
        let goods = GoodsRegistry::new(Arc::new(catalog), Arc::new(processes));
        goods.populate()?;
        Ok(Self {
            config,
            clock: MarsClock::default(),
            goods,
        })
    }

    /// The goods registry.
    #[must_use]
    pub fn goods(&self) -> &GoodsRegistry {
        &self.goods
    }

    /// The built goods catalog.
    ///
    /// Rebuilds after [`GoodsRegistry::destroy`]. The data was validated when
    /// the context was created, so a failure here only logs and yields an
    /// empty catalog.
    #[must_use]
    pub fn catalog(&self) -> Arc<GoodCatalog> {
        match self.goods.populate() {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!("Goods catalog unavailable: {e}");
                Arc::new(GoodCatalog::default())
            }
        }
    }

    /// Production process catalogs.
    #[must_use]
    pub fn processes(&self) -> &ProcessCatalog {
        self.goods.processes()
    }

    /// Upstream catalog data.
    #[must_use]
    pub fn catalog_data(&self) -> &CatalogData {
        self.goods.data()
    }
}
