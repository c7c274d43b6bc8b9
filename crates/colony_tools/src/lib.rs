//! # Colony Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - Headless valuation runs
//! - Value and cost reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod loader;
pub mod report;
pub mod validate;
