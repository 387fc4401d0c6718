//! Budget to removal-capacity conversion.

use super::waste::DAYS_PER_YEAR;

/// Kilograms in one metric ton.
pub const KG_PER_TON: f64 = 1000.0;

/// Cost of removing one metric ton at the given per-kilogram cost.
#[must_use]
pub fn cost_per_ton(cost_per_kg: f64) -> f64 {
    cost_per_kg * KG_PER_TON
}

/// Daily removal capacity (tons/day) bought by an annual budget.
///
/// `daily = (annual_budget / cost_per_ton) / 365`
///
/// # Panics
///
/// Panics if `cost_per_kg` is not strictly positive. Callers validate the
/// cost against its domain before reaching the engine.
#[must_use]
pub fn daily_capacity(annual_budget: f64, cost_per_kg: f64) -> f64 {
    assert!(
        cost_per_kg > 0.0,
        "cost per kg must be positive, got {cost_per_kg}"
    );
    annual_budget / cost_per_ton(cost_per_kg) / DAYS_PER_YEAR
}

/// Capacity actually applied in `year`: zero before cleanup starts.
#[must_use]
pub fn applied_capacity(daily_capacity: f64, year: i32, cleanup_start_year: i32) -> f64 {
    if year >= cleanup_start_year {
        daily_capacity
    } else {
        0.0
    }
}
