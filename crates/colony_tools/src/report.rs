//! Rendering of valuation reports.

use std::fmt::Write as _;

use clap::ValueEnum;
use colony_core::colony::ColonyReport;
use colony_core::context::SimulationContext;
use colony_core::valuation::ValuationEngine;

use crate::error::{Result, ToolError};

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Aligned text table.
    #[default]
    Table,
    /// Pretty JSON.
    Json,
    /// Pretty RON.
    Ron,
}

/// Render a colony report.
///
/// `filter` keeps goods whose name contains it, case-insensitively.
pub fn render(report: &ColonyReport, format: ReportFormat, filter: Option<&str>) -> Result<String> {
    let report = filtered(report, filter);
    match format {
        ReportFormat::Table => Ok(table(&report)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(&report).map_err(|e| ToolError::Encode(e.to_string()))
        }
        ReportFormat::Ron => ron::ser::to_string_pretty(&report, ron::ser::PrettyConfig::default())
            .map_err(|e| ToolError::Encode(e.to_string())),
    }
}

fn filtered(report: &ColonyReport, filter: Option<&str>) -> ColonyReport {
    let mut report = report.clone();
    if let Some(filter) = filter {
        let needle = filter.to_lowercase();
        for settlement in &mut report.settlements {
            settlement
                .goods
                .retain(|good| good.name.to_lowercase().contains(&needle));
        }
    }
    report
}

fn table(report: &ColonyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sol {}", report.sol);
    for settlement in &report.settlements {
        let _ = writeln!(out, "\n{} ({})", settlement.name, settlement.id);
        let _ = writeln!(
            out,
            "  {:<24} {:<10} {:>12} {:>12} {:>12} {:>10}",
            "good", "category", "value", "demand", "trade", "price"
        );
        for good in &settlement.goods {
            let _ = writeln!(
                out,
                "  {:<24} {:<10} {:>12.3} {:>12.3} {:>12.3} {:>10.2}",
                good.name, good.category, good.value, good.demand, good.trade, good.price
            );
        }
    }
    if !report.credits.is_empty() {
        let _ = writeln!(out, "\nCredit");
        for credit in &report.credits {
            let _ = writeln!(out, "  {} -> {}: {:.2}", credit.a, credit.b, credit.amount);
        }
    }
    out
}

/// Static price per item of every good, in id order.
#[must_use]
pub fn cost_table(ctx: &SimulationContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<24} {:<10} {:>10}", "id", "good", "category", "price");
    for good in ctx.catalog().iter() {
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:<10} {:>10.2}",
            good.id().0,
            good.name(),
            good.category().label(),
            ValuationEngine::get_price_per_item(ctx, good.id())
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use colony_test_utils::fixtures;

    fn report() -> ColonyReport {
        let mut colony = fixtures::colony();
        colony.run(2);
        colony.report()
    }

    #[test]
    fn test_table_lists_settlements_and_credit() {
        let text = render(&report(), ReportFormat::Table, None).unwrap();
        assert!(text.starts_with("Sol 2"));
        assert!(text.contains("Schiaparelli Point"));
        assert!(text.contains("Jezero Station"));
        assert!(text.contains("Credit"));
    }

    #[test]
    fn test_filter_keeps_matching_goods() {
        let json = render(&report(), ReportFormat::Json, Some("WATER")).unwrap();
        let parsed: ColonyReport = serde_json::from_str(&json).unwrap();
        for settlement in &parsed.settlements {
            assert!(!settlement.goods.is_empty());
            assert!(settlement.goods.iter().all(|g| g.name.contains("water")));
        }
    }

    #[test]
    fn test_ron_output_parses_back() {
        let original = report();
        let text = render(&original, ReportFormat::Ron, None).unwrap();
        let parsed: ColonyReport = ron::from_str(&text).unwrap();
        assert_eq!(parsed.settlements.len(), original.settlements.len());
        assert_eq!(parsed.sol, original.sol);
    }

    #[test]
    fn test_cost_table_has_every_good() {
        let ctx = fixtures::context();
        let table = cost_table(&ctx);
        assert_eq!(table.lines().count(), ctx.catalog().len() + 1);
    }
}
