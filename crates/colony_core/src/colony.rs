//! Colony-wide orchestration.
//!
//! A [`Colony`] owns the simulation context, every settlement's data and
//! valuation engine, and the credit ledger. Each [`Colony::tick`] advances
//! the clock by one sol and revalues every good at every settlement, in
//! settlement order, letting each engine read the others' caches for trade
//! demand.
//!
//! # Example
//!
//! ```no_run
//! use colony_core::prelude::*;
//!
//! # fn run(ctx: SimulationContext, scenario: ScenarioData) -> colony_core::error::Result<()> {
//! let mut colony = Colony::from_scenario(ctx, scenario)?;
//! colony.run(10);
//! let report = colony.report();
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::context::SimulationContext;
use crate::credit::{CreditEvent, CreditLedger};
use crate::error::{EconomyError, Result};
use crate::goods::GoodId;
use crate::settlement::{SettlementId, SettlementSnapshot, SettlementView};
use crate::valuation::{MarketContext, RemoteMarket, ValuationEngine};

/// Settlements and opening credit balances of a run.
///
/// # Example RON
///
/// ```ron
/// ScenarioData(
///     settlements: [
///         (id: 1, name: "Schiaparelli Point", population: 12),
///         (id: 2, name: "Jezero Station", population: 6),
///     ],
///     credits: [(a: 1, b: 2, amount: 250.0)],
/// )
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioData {
    /// Settlements in update order.
    pub settlements: Vec<SettlementSnapshot>,
    /// Opening credit edges.
    pub credits: Vec<CreditEvent>,
}

impl ScenarioData {
    /// Parse a scenario from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| EconomyError::parse("scenario", &e))
    }
}

/// Valuation of one good at one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodReport {
    /// Good id.
    pub id: u32,
    /// Good name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Cached value point.
    pub value: f64,
    /// Cached demand.
    pub demand: f64,
    /// Cached trade demand.
    pub trade: f64,
    /// Static production cost.
    pub price: f64,
}

/// Valuation of every good at one settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Settlement id.
    pub id: SettlementId,
    /// Settlement name.
    pub name: String,
    /// Goods in id order.
    pub goods: Vec<GoodReport>,
}

/// Snapshot of the whole colony's valuations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyReport {
    /// Sols elapsed.
    pub sol: u32,
    /// Per-settlement valuations.
    pub settlements: Vec<SettlementReport>,
    /// Credit edges.
    pub credits: Vec<CreditEvent>,
}

/// All settlements of one simulation run.
#[derive(Debug)]
pub struct Colony {
    context: SimulationContext,
    settlements: Vec<SettlementSnapshot>,
    engines: Vec<ValuationEngine>,
    ledger: CreditLedger,
}

impl Colony {
    /// Create a colony with no settlements.
    #[must_use]
    pub fn new(context: SimulationContext) -> Self {
        Self {
            context,
            settlements: Vec::new(),
            engines: Vec::new(),
            ledger: CreditLedger::new(),
        }
    }

    /// Create a colony from a scenario.
    ///
    /// # Errors
    ///
    /// Fails on duplicate settlement ids or credit edges naming unknown
    /// settlements.
    pub fn from_scenario(context: SimulationContext, scenario: ScenarioData) -> Result<Self> {
        let mut colony = Self::new(context);
        for settlement in scenario.settlements {
            colony.add_settlement(settlement)?;
        }
        for credit in scenario.credits {
            colony.ledger.set_credit(credit.a, credit.b, credit.amount)?;
        }
        Ok(colony)
    }

    /// Add a settlement and create its valuation engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the id is already taken.
    pub fn add_settlement(&mut self, settlement: SettlementSnapshot) -> Result<()> {
        let id = settlement.id();
        if self.settlements.iter().any(|s| s.id() == id) {
            return Err(EconomyError::Configuration(format!("duplicate {id}")));
        }
        self.engines
            .push(ValuationEngine::new(&self.context, &settlement));
        self.ledger.register_settlement(id);
        tracing::info!(settlement = %id, name = settlement.name(), "Settlement added");
        self.settlements.push(settlement);
        Ok(())
    }

    /// Advance one sol and revalue every good everywhere.
    pub fn tick(&mut self) {
        self.context.clock.advance();
        for index in 0..self.engines.len() {
            let (before, rest) = self.engines.split_at_mut(index);
            let Some((engine, after)) = rest.split_first_mut() else {
                continue;
            };
            let remotes: Vec<RemoteMarket<'_>> = before
                .iter()
                .chain(after.iter())
                .map(ValuationEngine::remote)
                .collect();
            let market = MarketContext::new(&self.context, &self.settlements[index], &remotes);
            engine.update_goods_values(&market);
        }
        tracing::debug!(sol = self.context.clock.sols_elapsed(), "Colony tick");
    }

    /// Run several ticks.
    pub fn run(&mut self, sols: u32) {
        for _ in 0..sols {
            self.tick();
        }
    }

    /// The simulation context.
    #[must_use]
    pub const fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// The credit ledger.
    #[must_use]
    pub const fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }

    /// All settlements in update order.
    #[must_use]
    pub fn settlements(&self) -> &[SettlementSnapshot] {
        &self.settlements
    }

    fn index_of(&self, id: SettlementId) -> Result<usize> {
        self.settlements
            .iter()
            .position(|s| s.id() == id)
            .ok_or(EconomyError::UnknownSettlement(id))
    }

    /// A settlement's data.
    pub fn settlement(&self, id: SettlementId) -> Result<&SettlementSnapshot> {
        Ok(&self.settlements[self.index_of(id)?])
    }

    /// A settlement's data, for recording inventory and requests.
    pub fn settlement_mut(&mut self, id: SettlementId) -> Result<&mut SettlementSnapshot> {
        let index = self.index_of(id)?;
        Ok(&mut self.settlements[index])
    }

    /// A settlement's valuation engine.
    pub fn engine(&self, id: SettlementId) -> Result<&ValuationEngine> {
        Ok(&self.engines[self.index_of(id)?])
    }

    /// Value a good at one settlement outside the tick.
    pub fn value_good(
        &mut self,
        id: SettlementId,
        good: GoodId,
        supply: f64,
        use_cache: bool,
    ) -> Result<f64> {
        let index = self.index_of(id)?;
        let (before, rest) = self.engines.split_at_mut(index);
        let Some((engine, after)) = rest.split_first_mut() else {
            return Err(EconomyError::UnknownSettlement(id));
        };
        let remotes: Vec<RemoteMarket<'_>> = before
            .iter()
            .chain(after.iter())
            .map(ValuationEngine::remote)
            .collect();
        let market = MarketContext::new(&self.context, &self.settlements[index], &remotes);
        Ok(engine.determine_good_value(&market, good, supply, use_cache))
    }

    /// Current valuations of every settlement.
    #[must_use]
    pub fn report(&self) -> ColonyReport {
        let catalog = self.context.catalog();
        let settlements = self
            .settlements
            .iter()
            .zip(&self.engines)
            .map(|(settlement, engine)| SettlementReport {
                id: settlement.id(),
                name: settlement.name().to_string(),
                goods: catalog
                    .iter()
                    .map(|good| {
                        let state = engine.state();
                        GoodReport {
                            id: good.id().0,
                            name: good.name().to_string(),
                            category: good.category().label().to_string(),
                            value: state.value(good.id()).unwrap_or(0.0),
                            demand: state.demand(good.id()).unwrap_or(0.0),
                            trade: state.trade(good.id()).unwrap_or(0.0),
                            price: good.output_cost(),
                        }
                    })
                    .collect(),
            })
            .collect();
        ColonyReport {
            sol: self.context.clock.sols_elapsed(),
            settlements,
            credits: self.ledger.edges(),
        }
    }
}
