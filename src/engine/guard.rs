//! Series guard: post-hoc inspection of a projected series.
//!
//! Stops a host from presenting a series that contains non-finite values or
//! breaks the accumulation invariants:
//!
//! 1. **Finite values**: every field of every point is finite.
//! 2. **Non-negative total**: the mitigated total is never below zero.
//! 3. **Baseline monotonic**: the no-cleanup total never decreases.
//! 4. **Cleanup bounded**: the mitigated total never exceeds the baseline.
//! 5. **Chronological**: years increase by one per point.

use serde::{Deserialize, Serialize};

use super::integrator::DataPoint;
use crate::error::{ProjectionError, ProjectionResult};

/// Guard configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Absolute slack (million tons) when comparing totals.
    pub tolerance: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

/// Series guard.
///
/// # Example
///
/// ```rust
/// use plastisim::engine::guard::{GuardConfig, SeriesGuard};
/// use plastisim::prelude::*;
///
/// let projection = compute_projection(&SimulationParameters::default());
/// let guard = SeriesGuard::new(GuardConfig::default());
/// assert!(guard.check(&projection.series).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesGuard {
    config: GuardConfig,
}

impl SeriesGuard {
    /// Create a guard with the given configuration.
    #[must_use]
    pub const fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Inspect a series.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - `NonFiniteValue` for NaN or Inf
    /// - `InvariantViolation` naming the broken invariant and year
    pub fn check(&self, series: &[DataPoint]) -> ProjectionResult<()> {
        for point in series {
            Self::check_finite(point)?;
            self.check_point(point)?;
        }

        for pair in series.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.year != prev.year + 1 {
                return Err(ProjectionError::invariant("chronological", next.year));
            }
            if next.cumulative_no_cleanup_million_tons + self.config.tolerance
                < prev.cumulative_no_cleanup_million_tons
            {
                return Err(ProjectionError::invariant("baseline_non_decreasing", next.year));
            }
        }

        Ok(())
    }

    fn check_finite(point: &DataPoint) -> ProjectionResult<()> {
        let fields = [
            ("daily_inflow", point.daily_inflow),
            ("net_inflow", point.net_inflow),
            ("cumulative_million_tons", point.cumulative_million_tons),
            (
                "cumulative_no_cleanup_million_tons",
                point.cumulative_no_cleanup_million_tons,
            ),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ProjectionError::NonFiniteValue {
                    location: format!("{name}@{}", point.year),
                });
            }
        }
        Ok(())
    }

    fn check_point(&self, point: &DataPoint) -> ProjectionResult<()> {
        if point.cumulative_million_tons < 0.0 {
            return Err(ProjectionError::invariant("cumulative_non_negative", point.year));
        }
        if point.cumulative_million_tons
            > point.cumulative_no_cleanup_million_tons + self.config.tolerance
        {
            return Err(ProjectionError::invariant("cleanup_bounded", point.year));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, cleanup: f64, baseline: f64) -> DataPoint {
        DataPoint {
            year,
            daily_inflow: 100.0,
            net_inflow: 50.0,
            cumulative_million_tons: cleanup,
            cumulative_no_cleanup_million_tons: baseline,
        }
    }

    #[test]
    fn test_valid_series_passes() {
        let guard = SeriesGuard::default();
        let series = [point(2024, 10.0, 10.0), point(2025, 9.0, 11.0)];
        assert!(guard.check(&series).is_ok());
        assert!(guard.check(&[]).is_ok());
    }

    #[test]
    fn test_non_finite_detected() {
        let guard = SeriesGuard::default();
        let mut bad = point(2030, 1.0, 2.0);
        bad.net_inflow = f64::NAN;
        let err = guard.check(&[bad]).unwrap_err();
        assert!(err.is_guard_violation());
        assert!(err.to_string().contains("net_inflow@2030"));
    }

    #[test]
    fn test_negative_total_detected() {
        let guard = SeriesGuard::default();
        let err = guard.check(&[point(2030, -1.0, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("cumulative_non_negative"));
    }

    #[test]
    fn test_cleanup_above_baseline_detected() {
        let guard = SeriesGuard::default();
        let err = guard.check(&[point(2030, 3.0, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("cleanup_bounded"));

        let relaxed = SeriesGuard::new(GuardConfig { tolerance: 2.0 });
        assert!(relaxed.check(&[point(2030, 3.0, 2.0)]).is_ok());
    }

    #[test]
    fn test_decreasing_baseline_detected() {
        let guard = SeriesGuard::default();
        let series = [point(2030, 1.0, 5.0), point(2031, 1.0, 4.0)];
        let err = guard.check(&series).unwrap_err();
        assert!(err.to_string().contains("baseline_non_decreasing"));
    }

    #[test]
    fn test_gap_in_years_detected() {
        let guard = SeriesGuard::default();
        let series = [point(2030, 1.0, 5.0), point(2032, 1.0, 6.0)];
        let err = guard.check(&series).unwrap_err();
        assert!(err.to_string().contains("chronological"));
    }
}
