//! Ocean-bound plastic inflow model.
//!
//! Global plastic production grows exponentially from a 1950 baseline and a
//! linearly increasing fraction of it leaks into the ocean:
//!
//! - `production(y) = P₀ × exp(g × (y − y₀))` (million metric tons/year)
//! - `fraction(y) = f₀ + s × (y − y₀)`
//! - `waste_per_day(y) = production(y) × fraction(y) × 10⁶ / 365` (tons/day)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::intervention::{InflowState, Intervention};

/// Days in a modelled year.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Metric tons in one million metric tons.
pub const TONS_PER_MILLION: f64 = 1_000_000.0;

/// Calibrated exponential-growth waste model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WasteModel {
    /// Year at which production is `base_production_mt`.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// Production at the base year (million metric tons/year).
    #[validate(range(min = 0.0))]
    #[serde(default = "default_base_production")]
    pub base_production_mt: f64,
    /// Continuous annual growth rate of production.
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
    /// Fraction of production that becomes ocean-bound waste at the base year.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_waste_fraction")]
    pub base_waste_fraction: f64,
    /// Yearly increase of the waste fraction.
    #[serde(default = "default_waste_fraction_slope")]
    pub waste_fraction_slope: f64,
}

const fn default_base_year() -> i32 {
    1950
}

const fn default_base_production() -> f64 {
    2.0
}

const fn default_growth_rate() -> f64 {
    0.0743
}

const fn default_waste_fraction() -> f64 {
    0.02
}

const fn default_waste_fraction_slope() -> f64 {
    0.0001
}

impl Default for WasteModel {
    fn default() -> Self {
        Self {
            base_year: default_base_year(),
            base_production_mt: default_base_production(),
            growth_rate: default_growth_rate(),
            base_waste_fraction: default_waste_fraction(),
            waste_fraction_slope: default_waste_fraction_slope(),
        }
    }
}

impl WasteModel {
    /// Global plastic production in `year` (million metric tons/year).
    #[must_use]
    pub fn production_mt(&self, year: i32) -> f64 {
        let elapsed = f64::from(year - self.base_year);
        self.base_production_mt * (self.growth_rate * elapsed).exp()
    }

    /// Fraction of production that ends up in the ocean in `year`.
    #[must_use]
    pub fn waste_fraction(&self, year: i32) -> f64 {
        let elapsed = f64::from(year - self.base_year);
        self.base_waste_fraction + elapsed * self.waste_fraction_slope
    }

    /// Tons of plastic entering the ocean per day in `year`, absent cleanup.
    #[must_use]
    pub fn waste_per_day(&self, year: i32) -> f64 {
        self.production_mt(year) * self.waste_fraction(year) * TONS_PER_MILLION / DAYS_PER_YEAR
    }

    /// Inflow after the intervention's reduction, which may be negative when
    /// removal outpaces inflow and the accumulated stock is drawn down.
    #[must_use]
    pub fn net_inflow(&self, year: i32, intervention: &dyn Intervention) -> f64 {
        let baseline = self.waste_per_day(year);
        baseline - intervention.applied_reduction(year, &InflowState::new(baseline))
    }

    /// Inflow that still reaches the ocean under the intervention.
    ///
    /// A reduction never drives the result below zero.
    #[must_use]
    pub fn inflow_with(&self, year: i32, intervention: &dyn Intervention) -> f64 {
        self.net_inflow(year, intervention).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::intervention::FlatCapacity;

    #[test]
    fn test_waste_model_default() {
        let model = WasteModel::default();
        assert_eq!(model.base_year, 1950);
        assert!((model.base_production_mt - 2.0).abs() < f64::EPSILON);
        assert!((model.growth_rate - 0.0743).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seed_value_1950() {
        let model = WasteModel::default();
        let expected = 2.0 * 0.02 * 1_000_000.0 / 365.0;
        assert!((model.waste_per_day(1950) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_production_growth() {
        let model = WasteModel::default();
        // One year of growth at 7.43%
        let ratio = model.production_mt(1951) / model.production_mt(1950);
        assert!((ratio - 0.0743_f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_waste_fraction_increases_linearly() {
        let model = WasteModel::default();
        assert!((model.waste_fraction(1950) - 0.02).abs() < 1e-12);
        assert!((model.waste_fraction(2050) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_inflow_with_never_negative() {
        let model = WasteModel::default();
        let huge = FlatCapacity::new(1e12, 2024);
        assert!(model.net_inflow(2030, &huge) < 0.0);
        assert!(model.inflow_with(2030, &huge).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inflow_before_cleanup_start_is_baseline() {
        let model = WasteModel::default();
        let flat = FlatCapacity::new(5_000.0, 2024);
        assert!((model.inflow_with(2000, &flat) - model.waste_per_day(2000)).abs() < 1e-9);
    }

    #[test]
    fn test_waste_model_from_yaml_defaults() {
        let model: WasteModel = serde_yaml::from_str("growth_rate: 0.05").unwrap();
        assert!((model.growth_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(model.base_year, 1950);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::engine::intervention::FlatCapacity;
    use proptest::prelude::*;

    proptest! {
        /// Inflow is positive and strictly increasing without intervention.
        #[test]
        fn prop_waste_positive_and_increasing(year in 1950i32..2300) {
            let model = WasteModel::default();
            let here = model.waste_per_day(year);
            prop_assert!(here > 0.0);
            prop_assert!(model.waste_per_day(year + 1) > here);
        }

        /// Cleanup never increases inflow.
        #[test]
        fn prop_cleanup_never_increases_inflow(
            year in 1950i32..2100,
            capacity in 0.0f64..1e7,
        ) {
            let model = WasteModel::default();
            let flat = FlatCapacity::new(capacity, 2024);
            prop_assert!(model.inflow_with(year, &flat) <= model.waste_per_day(year));
        }
    }
}
