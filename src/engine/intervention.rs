//! Cleanup intervention policies.
//!
//! An intervention turns cleanup spend into a reduction of the daily inflow.
//! The policies are mutually exclusive and selected by configuration through
//! [`InterventionPolicy`]:
//!
//! - **Flat capacity**: a constant removal rate from the cleanup start year.
//! - **Interception**: discrete dated installations (e.g. river barriers),
//!   each removing a fixed flow once installed.
//! - **Growth suppression**: prevention that lowers the production growth
//!   rate from the cleanup start year onward.
//! - **Learning curve**: flat spend whose unit cost declines every year, so
//!   the removal rate rises.

use serde::{Deserialize, Serialize};

use super::capacity::applied_capacity;
use crate::error::{ProjectionError, ProjectionResult};

/// Model state visible to a policy when it computes its reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflowState {
    /// Unmitigated inflow for the year (tons/day).
    pub baseline_inflow: f64,
}

impl InflowState {
    /// Create a state for the given baseline inflow.
    #[must_use]
    pub const fn new(baseline_inflow: f64) -> Self {
        Self { baseline_inflow }
    }
}

/// Strategy mapping a year to the inflow reduction it achieves.
pub trait Intervention: std::fmt::Debug {
    /// Reduction applied in `year` (tons/day, never negative).
    fn applied_reduction(&self, year: i32, state: &InflowState) -> f64;

    /// Short policy name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Constant removal capacity starting at the cleanup start year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCapacity {
    daily_capacity: f64,
    start_year: i32,
}

impl FlatCapacity {
    /// Create a flat-capacity policy.
    #[must_use]
    pub const fn new(daily_capacity: f64, start_year: i32) -> Self {
        Self {
            daily_capacity,
            start_year,
        }
    }
}

impl Intervention for FlatCapacity {
    fn applied_reduction(&self, year: i32, _state: &InflowState) -> f64 {
        applied_capacity(self.daily_capacity.max(0.0), year, self.start_year)
    }

    fn name(&self) -> &'static str {
        "flat-capacity"
    }
}

/// A dated installation that intercepts a fixed flow once in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptionEvent {
    /// First year the installation is in service.
    pub year_installed: i32,
    /// Flow intercepted from then on (tons/day).
    pub flow_reduction: f64,
    /// One-off installation cost (currency units).
    #[serde(default)]
    pub installation_cost: f64,
}

/// Sum of all installed interception events.
#[derive(Debug, Clone, PartialEq)]
pub struct Interception {
    events: Vec<InterceptionEvent>,
}

impl Interception {
    /// Create an interception policy from a set of events.
    #[must_use]
    pub fn new(mut events: Vec<InterceptionEvent>) -> Self {
        events.sort_by_key(|e| e.year_installed);
        Self { events }
    }

    /// Events ordered by installation year.
    #[must_use]
    pub fn events(&self) -> &[InterceptionEvent] {
        &self.events
    }

    /// Total spend across all installations.
    #[must_use]
    pub fn total_installation_cost(&self) -> f64 {
        self.events.iter().map(|e| e.installation_cost).sum()
    }
}

impl Intervention for Interception {
    fn applied_reduction(&self, year: i32, _state: &InflowState) -> f64 {
        self.events
            .iter()
            .take_while(|e| e.year_installed <= year)
            .map(|e| e.flow_reduction.max(0.0))
            .sum()
    }

    fn name(&self) -> &'static str {
        "interception"
    }
}

/// Prevention that lowers the production growth rate by `rate`.
///
/// After `n` years of suppression the inflow is `baseline × exp(−rate × n)`,
/// so the reduction is `baseline × (1 − exp(−rate × n))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthSuppression {
    rate: f64,
    start_year: i32,
}

impl GrowthSuppression {
    /// Create a growth-suppression policy.
    #[must_use]
    pub const fn new(rate: f64, start_year: i32) -> Self {
        Self { rate, start_year }
    }
}

impl Intervention for GrowthSuppression {
    fn applied_reduction(&self, year: i32, state: &InflowState) -> f64 {
        if year <= self.start_year {
            return 0.0;
        }
        let years = f64::from(year - self.start_year);
        state.baseline_inflow.max(0.0) * (1.0 - (-self.rate.max(0.0) * years).exp())
    }

    fn name(&self) -> &'static str {
        "growth-suppression"
    }
}

/// Floor on the learning-curve unit cost multiplier.
///
/// Unit cost never falls below a millionth of the start-year cost, which
/// keeps the removal rate finite for declines close to 1.
pub const MIN_COST_FACTOR: f64 = 1e-6;

/// Fixed spend with a unit cost falling by `annual_cost_decline` per year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningCurve {
    base_capacity: f64,
    annual_cost_decline: f64,
    start_year: i32,
}

impl LearningCurve {
    /// Create a learning-curve policy from the first-year capacity.
    #[must_use]
    pub const fn new(base_capacity: f64, annual_cost_decline: f64, start_year: i32) -> Self {
        Self {
            base_capacity,
            annual_cost_decline,
            start_year,
        }
    }

    /// Unit cost multiplier in `year` relative to the start year, floored
    /// at [`MIN_COST_FACTOR`].
    #[must_use]
    pub fn cost_factor(&self, year: i32) -> f64 {
        let years = (year - self.start_year).max(0);
        (1.0 - self.annual_cost_decline)
            .powi(years)
            .max(MIN_COST_FACTOR)
    }
}

impl Intervention for LearningCurve {
    fn applied_reduction(&self, year: i32, _state: &InflowState) -> f64 {
        if year < self.start_year {
            return 0.0;
        }
        self.base_capacity.max(0.0) / self.cost_factor(year)
    }

    fn name(&self) -> &'static str {
        "learning-curve"
    }
}

/// Configured choice of intervention policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum InterventionPolicy {
    /// Budget-derived constant removal.
    #[default]
    FlatCapacity,
    /// Discrete dated installations.
    Interception {
        /// Installations in any order.
        #[serde(default)]
        events: Vec<InterceptionEvent>,
    },
    /// Reduced production growth.
    GrowthSuppression {
        /// Reduction of the continuous growth rate.
        rate: f64,
    },
    /// Falling unit cost under constant spend.
    LearningCurve {
        /// Fraction by which the unit cost falls each year, in `[0, 1)`.
        annual_cost_decline: f64,
    },
}

impl InterventionPolicy {
    /// Instantiate the policy for a budget-derived capacity.
    #[must_use]
    pub fn build(&self, daily_capacity: f64, cleanup_start_year: i32) -> Box<dyn Intervention> {
        match self {
            Self::FlatCapacity => Box::new(FlatCapacity::new(daily_capacity, cleanup_start_year)),
            Self::Interception { events } => Box::new(Interception::new(events.clone())),
            Self::GrowthSuppression { rate } => {
                Box::new(GrowthSuppression::new(*rate, cleanup_start_year))
            }
            Self::LearningCurve {
                annual_cost_decline,
            } => Box::new(LearningCurve::new(
                daily_capacity,
                *annual_cost_decline,
                cleanup_start_year,
            )),
        }
    }

    /// Policy name as written in configuration.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FlatCapacity => "flat-capacity",
            Self::Interception { .. } => "interception",
            Self::GrowthSuppression { .. } => "growth-suppression",
            Self::LearningCurve { .. } => "learning-curve",
        }
    }

    /// Validate policy parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for negative or non-finite flows and
    /// rates, or a cost decline outside `[0, 1)`.
    pub fn validate_semantic(&self) -> ProjectionResult<()> {
        match self {
            Self::FlatCapacity => Ok(()),
            Self::Interception { events } => {
                for event in events {
                    if !event.flow_reduction.is_finite() || event.flow_reduction < 0.0 {
                        return Err(ProjectionError::config(format!(
                            "Interception in {} has invalid flow reduction {}",
                            event.year_installed, event.flow_reduction
                        )));
                    }
                    if !event.installation_cost.is_finite() || event.installation_cost < 0.0 {
                        return Err(ProjectionError::config(format!(
                            "Interception in {} has invalid installation cost {}",
                            event.year_installed, event.installation_cost
                        )));
                    }
                }
                Ok(())
            }
            Self::GrowthSuppression { rate } => {
                if rate.is_finite() && *rate >= 0.0 {
                    Ok(())
                } else {
                    Err(ProjectionError::config(format!(
                        "Growth suppression rate must be non-negative, got {rate}"
                    )))
                }
            }
            Self::LearningCurve {
                annual_cost_decline,
            } => {
                if (0.0..1.0).contains(annual_cost_decline) {
                    Ok(())
                } else {
                    Err(ProjectionError::config(format!(
                        "Annual cost decline must be in [0, 1), got {annual_cost_decline}"
                    )))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATE: InflowState = InflowState::new(10_000.0);

    #[test]
    fn test_flat_capacity_starts_at_cleanup_year() {
        let flat = FlatCapacity::new(500.0, 2024);
        assert!(flat.applied_reduction(2023, &STATE).abs() < f64::EPSILON);
        assert!((flat.applied_reduction(2024, &STATE) - 500.0).abs() < f64::EPSILON);
        assert!((flat.applied_reduction(2090, &STATE) - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_capacity_negative_is_zero() {
        let flat = FlatCapacity::new(-10.0, 2024);
        assert!(flat.applied_reduction(2030, &STATE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interception_sums_installed_events() {
        let policy = Interception::new(vec![
            InterceptionEvent {
                year_installed: 2030,
                flow_reduction: 200.0,
                installation_cost: 5e6,
            },
            InterceptionEvent {
                year_installed: 2025,
                flow_reduction: 100.0,
                installation_cost: 2e6,
            },
        ]);

        assert_eq!(policy.events()[0].year_installed, 2025);
        assert!(policy.applied_reduction(2024, &STATE).abs() < f64::EPSILON);
        assert!((policy.applied_reduction(2027, &STATE) - 100.0).abs() < f64::EPSILON);
        assert!((policy.applied_reduction(2030, &STATE) - 300.0).abs() < f64::EPSILON);
        assert!((policy.total_installation_cost() - 7e6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_growth_suppression_bounded_by_baseline() {
        let policy = GrowthSuppression::new(0.05, 2024);
        assert!(policy.applied_reduction(2024, &STATE).abs() < f64::EPSILON);

        let r10 = policy.applied_reduction(2034, &STATE);
        let expected = 10_000.0 * (1.0 - (-0.5_f64).exp());
        assert!((r10 - expected).abs() < 1e-9);

        let r_far = policy.applied_reduction(2500, &STATE);
        assert!(r_far <= STATE.baseline_inflow);
        assert!(r_far > r10);
    }

    #[test]
    fn test_learning_curve_capacity_grows() {
        let policy = LearningCurve::new(1_000.0, 0.1, 2024);
        assert!(policy.applied_reduction(2023, &STATE).abs() < f64::EPSILON);
        assert!((policy.applied_reduction(2024, &STATE) - 1_000.0).abs() < 1e-9);
        assert!((policy.applied_reduction(2025, &STATE) - 1_000.0 / 0.9).abs() < 1e-9);
        assert!((policy.cost_factor(2026) - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_learning_curve_steep_decline_stays_finite() {
        let policy = LearningCurve::new(5_000.0, 0.999_999, 2024);
        for year in 2024..=2100 {
            let reduction = policy.applied_reduction(year, &STATE);
            assert!(reduction.is_finite(), "year {year}");
        }
        assert!((policy.cost_factor(2100) - MIN_COST_FACTOR).abs() < f64::EPSILON);
        assert!((policy.applied_reduction(2100, &STATE) - 5_000.0 / MIN_COST_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn test_policy_build_names() {
        let cases = [
            InterventionPolicy::FlatCapacity,
            InterventionPolicy::Interception { events: vec![] },
            InterventionPolicy::GrowthSuppression { rate: 0.01 },
            InterventionPolicy::LearningCurve {
                annual_cost_decline: 0.02,
            },
        ];
        for policy in cases {
            assert_eq!(policy.build(100.0, 2024).name(), policy.name());
        }
    }

    #[test]
    fn test_policy_yaml_tagged() {
        let yaml = r"
kind: interception
events:
  - year_installed: 2026
    flow_reduction: 150.0
    installation_cost: 1000000.0
";
        let policy: InterventionPolicy = serde_yaml::from_str(yaml).unwrap();
        match policy {
            InterventionPolicy::Interception { ref events } => {
                assert_eq!(events.len(), 1);
                assert_eq!(events[0].year_installed, 2026);
            }
            _ => panic!("Expected interception policy"),
        }

        let learning: InterventionPolicy =
            serde_yaml::from_str("kind: learning-curve\nannual_cost_decline: 0.05").unwrap();
        assert_eq!(learning.name(), "learning-curve");
    }

    #[test]
    fn test_policy_validation() {
        assert!(InterventionPolicy::FlatCapacity.validate_semantic().is_ok());
        assert!(InterventionPolicy::GrowthSuppression { rate: -0.1 }
            .validate_semantic()
            .is_err());
        assert!(InterventionPolicy::LearningCurve {
            annual_cost_decline: 1.0
        }
        .validate_semantic()
        .is_err());

        let bad_event = InterventionPolicy::Interception {
            events: vec![InterceptionEvent {
                year_installed: 2030,
                flow_reduction: -5.0,
                installation_cost: 0.0,
            }],
        };
        let err = bad_event.validate_semantic().unwrap_err();
        assert!(err.to_string().contains("flow reduction"));
    }
}
