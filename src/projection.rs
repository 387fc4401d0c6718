//! Projection entry point.
//!
//! [`compute_projection`] is the one call a host makes whenever it observes
//! new parameter values:
//!
//! 1. The budget and unit cost become a daily removal capacity.
//! 2. Historical accumulation from the production start year seeds the totals.
//! 3. The integrator steps year by year under the configured policy.
//! 4. The last two points of the mitigated series give the zero-crossing year.
//!
//! Nothing is cached between calls; each projection is a fresh pure pass.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::config::ProjectionConfig;
use crate::engine::capacity::{cost_per_ton, daily_capacity};
use crate::engine::integrator::{historical_accumulation, AccumulationIntegrator, DataPoint};
use crate::engine::intervention::Intervention;
use crate::engine::waste::TONS_PER_MILLION;
use crate::engine::zero_year::ZeroYearExtrapolator;
use crate::error::{ProjectionError, ProjectionResult};
use crate::exchange::RateQuote;

/// Inputs of one projection run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimulationParameters {
    /// Annual cleanup budget (currency units).
    #[validate(range(min = 1e8, max = 1e12))]
    pub annual_budget: f64,
    /// Cost of removing one kilogram (currency units).
    #[validate(range(min = 0.1, max = 100.0))]
    pub cost_per_kg: f64,
    /// First projected year.
    #[validate(range(min = 1950, max = 2100))]
    pub start_year: i32,
    /// Last projected year, inclusive.
    #[validate(range(min = 1950, max = 2100))]
    pub end_year: i32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            annual_budget: 1e10,
            cost_per_kg: 5.22 / 0.93,
            start_year: 1991,
            end_year: 2035,
        }
    }
}

impl SimulationParameters {
    /// Create a parameter set.
    #[must_use]
    pub const fn new(annual_budget: f64, cost_per_kg: f64, start_year: i32, end_year: i32) -> Self {
        Self {
            annual_budget,
            cost_per_kg,
            start_year,
            end_year,
        }
    }

    /// Run range and semantic validation, as a host does before projecting.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-domain values, or a
    /// configuration error when `start_year >= end_year`.
    pub fn validate_all(&self) -> ProjectionResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    pub(crate) fn validate_semantic(&self) -> ProjectionResult<()> {
        if self.start_year >= self.end_year {
            return Err(ProjectionError::config(format!(
                "Start year ({}) must precede end year ({})",
                self.start_year, self.end_year
            )));
        }
        Ok(())
    }

    /// Daily removal capacity these parameters buy (tons/day).
    #[must_use]
    pub fn daily_capacity(&self) -> f64 {
        daily_capacity(self.annual_budget, self.cost_per_kg)
    }

    /// Number of points a projection of these parameters yields.
    #[must_use]
    pub fn year_count(&self) -> usize {
        if self.start_year >= self.end_year {
            0
        } else {
            usize::try_from(self.end_year - self.start_year + 1).unwrap_or_default()
        }
    }
}

/// Output of one projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// One point per year, chronological.
    pub series: Vec<DataPoint>,
    /// Projected year the mitigated total reaches zero.
    pub zero_year: Option<i32>,
}

impl Projection {
    /// True when the parameter range produced no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Point for a given year.
    #[must_use]
    pub fn point(&self, year: i32) -> Option<&DataPoint> {
        let first = self.series.first()?.year;
        let index = usize::try_from(year.checked_sub(first)?).ok()?;
        self.series.get(index)
    }
}

/// Headline figures derived from a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    /// Accumulation already in the ocean at the first projected year (Mt).
    pub initial_accumulation_mt: f64,
    /// Removal capacity bought by the budget (tons/day).
    pub daily_removal_capacity: f64,
    /// Cost of removing one ton.
    pub cost_per_ton: f64,
    /// Inflow still reaching the ocean in the final year (tons/day).
    pub final_residual_inflow: f64,
    /// Cleanup reduction of the final total relative to the baseline (%).
    pub reduction_percent: f64,
    /// Projected zero-crossing year.
    pub zero_year: Option<i32>,
}

impl ProjectionSummary {
    /// Cost per ton in the quote's currency.
    #[must_use]
    pub fn cost_per_ton_converted(&self, quote: &RateQuote) -> f64 {
        quote.convert(self.cost_per_ton)
    }
}

/// Percentage by which cleanup lowers the final total versus the baseline.
///
/// Zero when there is no baseline accumulation to reduce.
#[must_use]
pub fn reduction_percent(point: &DataPoint) -> f64 {
    let baseline = point.cumulative_no_cleanup_million_tons;
    if baseline <= 0.0 {
        return 0.0;
    }
    (baseline - point.cumulative_million_tons) / baseline * 100.0
}

/// Projection engine bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct Projector {
    config: ProjectionConfig,
}

impl Projector {
    /// Create a projector for the given configuration.
    #[must_use]
    pub const fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn intervention(&self, capacity: f64) -> Box<dyn Intervention> {
        self.config
            .intervention
            .build(capacity, self.config.calibration.cleanup_start_year)
    }

    /// Recompute the full projection for `params`.
    ///
    /// Parameters are assumed validated. An empty range yields an empty
    /// series and no zero year.
    ///
    /// # Panics
    ///
    /// Panics if `params.cost_per_kg` is not strictly positive.
    #[must_use]
    pub fn compute(&self, params: &SimulationParameters) -> Projection {
        let cal = &self.config.calibration;
        let capacity = params.daily_capacity();
        let intervention = self.intervention(capacity);

        if params.start_year >= params.end_year {
            debug!(
                start = params.start_year,
                end = params.end_year,
                "empty projection range"
            );
            return Projection {
                series: Vec::new(),
                zero_year: None,
            };
        }

        let seed = historical_accumulation(
            &self.config.waste,
            cal.production_start_year,
            params.start_year,
        );
        let series = AccumulationIntegrator::new(&self.config.waste, intervention.as_ref())
            .accumulate(params.start_year, params.end_year, seed);

        let zero_year = ZeroYearExtrapolator::new(cal.max_projection_year, cal.zero_year_horizon_factor)
            .zero_year(&series, capacity);

        debug!(
            start = params.start_year,
            end = params.end_year,
            capacity,
            policy = intervention.name(),
            seed_mt = seed / TONS_PER_MILLION,
            ?zero_year,
            "projection computed"
        );

        Projection { series, zero_year }
    }

    /// Headline figures for a projection computed from `params`.
    #[must_use]
    pub fn summarize(&self, params: &SimulationParameters, projection: &Projection) -> ProjectionSummary {
        let capacity = params.daily_capacity();
        let intervention = self.intervention(capacity);

        let initial_accumulation_mt = projection
            .series
            .first()
            .map_or(0.0, |p| p.cumulative_no_cleanup_million_tons);
        let last = projection.series.last();

        ProjectionSummary {
            initial_accumulation_mt,
            daily_removal_capacity: capacity,
            cost_per_ton: cost_per_ton(params.cost_per_kg),
            final_residual_inflow: last.map_or(0.0, |p| {
                self.config.waste.inflow_with(p.year, intervention.as_ref())
            }),
            reduction_percent: last.map_or(0.0, reduction_percent),
            zero_year: projection.zero_year,
        }
    }
}

/// Projection with the default configuration.
///
/// # Panics
///
/// Panics if `params.cost_per_kg` is not strictly positive.
#[must_use]
pub fn compute_projection(params: &SimulationParameters) -> Projection {
    Projector::default().compute(params)
}
