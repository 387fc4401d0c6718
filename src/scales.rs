//! Logarithmic slider scales.
//!
//! Maps a slider position in `[0, 100]` onto a real-valued domain spanning
//! several orders of magnitude, and back:
//!
//! - `value = exp(ln(min) + (ln(max) − ln(min)) / 100 × position)`
//! - `position = (ln(value) − ln(min)) / ((ln(max) − ln(min)) / 100)`
//!
//! Values are rounded to display precision, so a round trip is exact only to
//! within one slider step.

use serde::{Deserialize, Serialize};

/// Number of slider steps between the two ends of a scale.
pub const SLIDER_STEPS: f64 = 100.0;

/// Budget scale bounds (currency units per year).
pub const BUDGET_RANGE: (f64, f64) = (1e8, 1e12);

/// Unit-cost scale bounds (currency units per kilogram).
pub const COST_RANGE: (f64, f64) = (0.1, 100.0);

/// Logarithmic mapping between slider positions and values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    min: f64,
    max: f64,
    decimals: u32,
}

impl LogScale {
    /// Create a scale over `[min, max]` rounding values to `decimals` places.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < min < max`.
    #[must_use]
    pub fn new(min: f64, max: f64, decimals: u32) -> Self {
        assert!(min > 0.0 && min < max, "log scale needs 0 < min < max");
        Self { min, max, decimals }
    }

    /// Annual budget scale, whole currency units.
    #[must_use]
    pub fn budget() -> Self {
        Self::new(BUDGET_RANGE.0, BUDGET_RANGE.1, 0)
    }

    /// Per-kilogram cost scale, two decimal places.
    #[must_use]
    pub fn cost() -> Self {
        Self::new(COST_RANGE.0, COST_RANGE.1, 2)
    }

    /// Lower bound of the value domain.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the value domain.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    fn step_width(&self) -> f64 {
        (self.max.ln() - self.min.ln()) / SLIDER_STEPS
    }

    /// Value at a slider position, rounded to display precision.
    #[must_use]
    pub fn slider_to_value(&self, position: f64) -> f64 {
        let raw = (self.min.ln() + self.step_width() * position).exp();
        round_to(raw, self.decimals)
    }

    /// Fractional slider position of a value.
    #[must_use]
    pub fn value_to_slider(&self, value: f64) -> f64 {
        (value.ln() - self.min.ln()) / self.step_width()
    }

    /// Nearest whole slider step for a value, clamped to the slider.
    #[must_use]
    pub fn slider_step(&self, value: f64) -> u8 {
        let position = self.value_to_slider(value).round();
        if position.is_nan() {
            return 0;
        }
        position.clamp(0.0, SLIDER_STEPS) as u8
    }
}

/// Round `value` to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Round trip through display rounding stays within one step.
        #[test]
        fn prop_round_trip_within_one_step(position in 0.0f64..=100.0) {
            for scale in [LogScale::cost(), LogScale::budget()] {
                let back = scale.value_to_slider(scale.slider_to_value(position));
                prop_assert!((back - position).abs() <= 1.0, "{position} -> {back}");
            }
        }

        /// Higher positions never map to lower values.
        #[test]
        fn prop_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let scale = LogScale::cost();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scale.slider_to_value(lo) <= scale.slider_to_value(hi));
        }
    }
}
