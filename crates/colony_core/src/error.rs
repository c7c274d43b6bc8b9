//! Error types for the economy simulation.

use thiserror::Error;

use crate::goods::GoodId;
use crate::settlement::SettlementId;

/// Result type alias using [`EconomyError`].
pub type Result<T> = std::result::Result<T, EconomyError>;

/// Top-level error type for catalog construction, lookups and the credit ledger.
///
/// Valuation itself never returns these: cache misses and degenerate ratios
/// are logged and replaced by defaults so a tick is never aborted.
#[derive(Debug, Error)]
pub enum EconomyError {
    /// Broken upstream catalog data. Fatal at startup.
    #[error("Invalid catalog configuration: {0}")]
    Configuration(String),

    /// Good identifier not present in the catalog.
    #[error("Good not found: {0}")]
    GoodNotFound(GoodId),

    /// Good name not present in the catalog.
    #[error("Good not found by name: '{0}'")]
    NameNotFound(String),

    /// Settlement not registered with the credit ledger.
    #[error("Unknown settlement: {0}")]
    UnknownSettlement(SettlementId),

    /// Data or configuration parsing error.
    #[error("Failed to parse {what}: {message}")]
    DataParse {
        /// What was being parsed.
        what: String,
        /// Error message.
        message: String,
    },

    /// Snapshot encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl EconomyError {
    /// Build a [`EconomyError::DataParse`] from a RON error.
    pub(crate) fn parse(what: &str, err: &ron::error::SpannedError) -> Self {
        Self::DataParse {
            what: what.to_string(),
            message: err.to_string(),
        }
    }
}
