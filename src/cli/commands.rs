//! CLI command handlers.

use std::process::ExitCode;

use serde::Serialize;
use tracing::info;

use super::args::{RunOptions, ScaleKind, ScaleQuery};
use super::output::{format_projection_table, format_scale_result, print_help, print_version};
use super::{Args, Command};
use crate::config::ProjectionConfig;
use crate::engine::{GuardConfig, SeriesGuard};
use crate::error::{ProjectionError, ProjectionResult};
use crate::exchange::{
    ExchangeConfig, ExchangeRateProvider, JsonFileStore, KvStore, MemoryStore, OfflineSource,
    RateQuote,
};
use crate::projection::{Projection, ProjectionSummary, Projector, SimulationParameters};
use crate::scales::{LogScale, SLIDER_STEPS};

/// Everything a `run` produces, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Parameters after overrides.
    pub parameters: SimulationParameters,
    /// Name of the intervention policy applied.
    pub policy: String,
    /// Computed series and zero year.
    pub projection: Projection,
    /// Headline figures.
    pub summary: ProjectionSummary,
    /// Exchange quote used for the converted cost.
    pub exchange: RateQuote,
    /// Cost per ton in the quoted currency.
    pub cost_per_ton_converted: f64,
}

/// Main CLI entry point.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::Run(options) => run_projection(&options),
        Command::Scale { kind, query } => {
            println!("{}", format_scale_result(kind, query, scale_lookup(kind, query)));
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Run a projection and print it.
#[must_use]
pub fn run_projection(options: &RunOptions) -> ExitCode {
    let report = match execute_run(options) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if options.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", format_projection_table(&report));
    }
    ExitCode::SUCCESS
}

/// Resolve configuration and overrides, project, guard, and quote.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the resulting
/// parameters are invalid, or the computed series fails the guard.
pub fn execute_run(options: &RunOptions) -> ProjectionResult<RunReport> {
    let config = match &options.config_path {
        Some(path) => ProjectionConfig::load(path)?,
        None => ProjectionConfig::default(),
    };
    let params = resolve_parameters(&config, options);
    config.validate_parameters(&params)?;

    info!(
        budget = params.annual_budget,
        cost = params.cost_per_kg,
        start = params.start_year,
        end = params.end_year,
        "running projection"
    );

    let projector = Projector::new(config);
    let projection = projector.compute(&params);
    SeriesGuard::new(GuardConfig::default()).check(&projection.series)?;
    let summary = projector.summarize(&params, &projection);

    let config = projector.config();
    let exchange = quote_rate(
        &config.exchange,
        config.calibration.default_exchange_rate,
        options,
    )?;

    Ok(RunReport {
        parameters: params,
        policy: config.intervention.name().to_string(),
        cost_per_ton_converted: summary.cost_per_ton_converted(&exchange),
        projection,
        summary,
        exchange,
    })
}

/// Configuration defaults with command-line overrides applied.
#[must_use]
pub fn resolve_parameters(config: &ProjectionConfig, options: &RunOptions) -> SimulationParameters {
    let defaults = config.defaults;
    SimulationParameters::new(
        options.budget.unwrap_or(defaults.annual_budget),
        options.cost.unwrap_or(defaults.cost_per_kg),
        options.start.unwrap_or(defaults.start_year),
        options.end.unwrap_or(defaults.end_year),
    )
}

fn quote_rate(
    exchange: &ExchangeConfig,
    default_rate: f64,
    options: &RunOptions,
) -> ProjectionResult<RateQuote> {
    if let Some(rate) = options.eur_rate {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(ProjectionError::config(format!(
                "exchange rate must be positive, got {rate}"
            )));
        }
    }
    match &options.rate_cache {
        Some(path) => quote_with(JsonFileStore::new(path), exchange, default_rate, options.eur_rate),
        None => quote_with(MemoryStore::new(), exchange, default_rate, options.eur_rate),
    }
}

/// An explicit rate always wins over the cache; otherwise refresh offline.
fn quote_with<S: KvStore>(
    store: S,
    exchange: &ExchangeConfig,
    default_rate: f64,
    explicit: Option<f64>,
) -> ProjectionResult<RateQuote> {
    let mut provider = ExchangeRateProvider::new(store, OfflineSource, exchange.clone(), default_rate);
    match explicit {
        Some(rate) => provider.pin_rate(rate),
        None => Ok(provider.refresh()),
    }
}

/// Evaluate a scale query.
///
/// Returns the value for a position, or the nearest slider step for a value.
/// Positions are clamped to the slider.
#[must_use]
pub fn scale_lookup(kind: ScaleKind, query: ScaleQuery) -> f64 {
    let scale = match kind {
        ScaleKind::Budget => LogScale::budget(),
        ScaleKind::Cost => LogScale::cost(),
    };
    match query {
        ScaleQuery::Position(position) => {
            scale.slider_to_value(position.clamp(0.0, SLIDER_STEPS))
        }
        ScaleQuery::Value(value) => f64::from(scale.slider_step(value)),
    }
}
