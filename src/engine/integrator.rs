//! Trapezoidal accumulation of ocean plastic.
//!
//! Each unit-year step adds `((w(y) + w(y+1)) / 2) × 365` tons to the running
//! total. Two totals run side by side: one integrating the net inflow under
//! the intervention, one integrating the unmitigated baseline. The mitigated
//! total is clamped at zero after every step.

use serde::{Deserialize, Serialize};

use super::intervention::Intervention;
use super::waste::{WasteModel, DAYS_PER_YEAR, TONS_PER_MILLION};

/// One simulated year of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Calendar year.
    pub year: i32,
    /// Gross inflow absent cleanup (tons/day).
    pub daily_inflow: f64,
    /// Inflow after the intervention (tons/day, negative when removal wins).
    pub net_inflow: f64,
    /// Running total with cleanup applied (million metric tons, never negative).
    pub cumulative_million_tons: f64,
    /// Running total without cleanup (million metric tons).
    pub cumulative_no_cleanup_million_tons: f64,
}

/// Trapezoid area of one unit-year step between two daily rates (tons).
#[must_use]
pub fn trapezoid_step(rate_from: f64, rate_to: f64) -> f64 {
    (rate_from + rate_to) / 2.0 * DAYS_PER_YEAR
}

/// Unmitigated accumulation from `from_year` up to (not past) `up_to_year`,
/// in tons.
#[must_use]
pub fn historical_accumulation(model: &WasteModel, from_year: i32, up_to_year: i32) -> f64 {
    (from_year..up_to_year)
        .map(|year| trapezoid_step(model.waste_per_day(year), model.waste_per_day(year + 1)))
        .sum()
}

/// Year-by-year integrator of a waste model under an intervention.
#[derive(Debug, Clone, Copy)]
pub struct AccumulationIntegrator<'a> {
    model: &'a WasteModel,
    intervention: &'a dyn Intervention,
}

impl<'a> AccumulationIntegrator<'a> {
    /// Create an integrator.
    #[must_use]
    pub const fn new(model: &'a WasteModel, intervention: &'a dyn Intervention) -> Self {
        Self {
            model,
            intervention,
        }
    }

    /// Integrate from `start_year` to `end_year` inclusive, seeded with
    /// `initial_total` tons already in the ocean.
    ///
    /// Returns one point per year in chronological order, or an empty series
    /// when `start_year >= end_year`.
    #[must_use]
    pub fn accumulate(&self, start_year: i32, end_year: i32, initial_total: f64) -> Vec<DataPoint> {
        if start_year >= end_year {
            return Vec::new();
        }

        let capacity = usize::try_from(end_year - start_year + 1).unwrap_or_default();
        let mut series = Vec::with_capacity(capacity);

        let mut cumulative = initial_total.max(0.0);
        let mut cumulative_no_cleanup = initial_total;
        let mut previous: Option<(f64, f64)> = None;

        for year in start_year..=end_year {
            let baseline = self.model.waste_per_day(year);
            let net = self.model.net_inflow(year, self.intervention);

            if let Some((prev_baseline, prev_net)) = previous {
                cumulative = (cumulative + trapezoid_step(prev_net, net)).max(0.0);
                cumulative_no_cleanup += trapezoid_step(prev_baseline, baseline);
            }
            previous = Some((baseline, net));

            series.push(DataPoint {
                year,
                daily_inflow: baseline,
                net_inflow: net,
                cumulative_million_tons: cumulative / TONS_PER_MILLION,
                cumulative_no_cleanup_million_tons: cumulative_no_cleanup / TONS_PER_MILLION,
            });
        }

        series
    }
}
