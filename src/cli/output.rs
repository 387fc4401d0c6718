//! CLI output formatting.
//!
//! Formatting returns strings so tests can inspect them; the `print_*`
//! helpers write to stdout.

use std::fmt::Write as _;

use super::args::{ScaleKind, ScaleQuery};
use super::commands::RunReport;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("plastisim {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"plastisim - Ocean plastic accumulation under a cleanup budget

USAGE:
    plastisim <COMMAND> [OPTIONS]

COMMANDS:
    run                         Compute and print a projection
        -c, --config <FILE>     YAML configuration (defaults built in)
        --budget <N>            Annual cleanup budget
        --cost <N>              Cost of removing one kilogram
        --start <YEAR>          First projected year
        --end <YEAR>            Last projected year
        --eur-rate <R>          Exchange rate for the converted cost
        --rate-cache <FILE>     JSON file caching the exchange rate
        --json                  Emit JSON instead of a table

    scale <budget|cost> <POS>   Value at a slider position (0-100)
    scale <budget|cost> --value <N>
                                Nearest slider step for a value

    help                        Show this help message
    version                     Show version information

GLOBAL OPTIONS:
    --log-level <LEVEL>         trace, debug, info, warn (default), error

EXAMPLES:
    plastisim run
    plastisim run --budget 3e10 --cost 1.0 --start 2020 --end 2030
    plastisim run --config projection.yaml --json
    plastisim scale budget 50
"
    );
}

/// Format a run report as a year table followed by the summary.
#[must_use]
pub fn format_projection_table(report: &RunReport) -> String {
    let mut out = String::new();
    let params = &report.parameters;
    let summary = &report.summary;

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Projection {}-{}  budget {:.0}/yr  cost {:.2}/kg  policy {}",
        params.start_year, params.end_year, params.annual_budget, params.cost_per_kg, report.policy
    );
    let _ = writeln!(out, "{RULE}\n");

    if report.projection.is_empty() {
        let _ = writeln!(out, "(no data points)");
    } else {
        let _ = writeln!(
            out,
            "{:>6}  {:>14}  {:>14}  {:>14}  {:>14}",
            "Year", "Inflow t/day", "Net t/day", "Cleanup Mt", "No cleanup Mt"
        );
        for p in &report.projection.series {
            let _ = writeln!(
                out,
                "{:>6}  {:>14.0}  {:>14.0}  {:>14.1}  {:>14.1}",
                p.year,
                p.daily_inflow,
                p.net_inflow,
                p.cumulative_million_tons,
                p.cumulative_no_cleanup_million_tons
            );
        }
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(
        out,
        "  Initial accumulation:   {:.1} Mt",
        summary.initial_accumulation_mt
    );
    let _ = writeln!(
        out,
        "  Removal capacity:       {:.0} t/day",
        summary.daily_removal_capacity
    );
    let _ = writeln!(
        out,
        "  Cost per ton:           {:.2} ({:.2} converted at {:.4}{})",
        summary.cost_per_ton,
        report.cost_per_ton_converted,
        report.exchange.rate,
        if report.exchange.is_loading { ", loading" } else { "" }
    );
    let _ = writeln!(
        out,
        "  Residual inflow:        {:.0} t/day",
        summary.final_residual_inflow
    );
    let _ = writeln!(
        out,
        "  Reduction vs baseline:  {:.1}%",
        summary.reduction_percent
    );
    let _ = match summary.zero_year {
        Some(year) => writeln!(out, "  Ocean clean by:         {year}"),
        None => writeln!(out, "  Ocean clean by:         not within horizon"),
    };
    out
}

/// Format the answer to a scale query.
#[must_use]
pub fn format_scale_result(kind: ScaleKind, query: ScaleQuery, result: f64) -> String {
    let label = match kind {
        ScaleKind::Budget => "budget",
        ScaleKind::Cost => "cost",
    };
    match (kind, query) {
        (_, ScaleQuery::Value(value)) => format!("{label} {value} -> slider {result:.0}"),
        (ScaleKind::Budget, ScaleQuery::Position(pos)) => {
            format!("{label} slider {pos} -> {result:.0}")
        }
        (ScaleKind::Cost, ScaleQuery::Position(pos)) => {
            format!("{label} slider {pos} -> {result:.2}")
        }
    }
}
