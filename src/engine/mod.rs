//! Core projection engine.
//!
//! Leaf to root:
//! - [`waste`]: daily ocean inflow from calibrated production growth
//! - [`intervention`]: pluggable cleanup policies reducing that inflow
//! - [`capacity`]: annual budget and unit cost to tons/day
//! - [`integrator`]: trapezoidal accumulation with and without cleanup
//! - [`zero_year`]: two-point extrapolation of the zero crossing
//! - [`guard`]: invariant inspection of a finished series
//!
//! Every function here is pure and synchronous; a projection is recomputed
//! in full whenever its parameters change.

pub mod capacity;
pub mod guard;
pub mod integrator;
pub mod intervention;
pub mod waste;
pub mod zero_year;

pub use guard::{GuardConfig, SeriesGuard};
pub use integrator::{historical_accumulation, AccumulationIntegrator, DataPoint};
pub use intervention::{
    FlatCapacity, GrowthSuppression, InflowState, Interception, InterceptionEvent, Intervention,
    InterventionPolicy, LearningCurve,
};
pub use waste::WasteModel;
pub use zero_year::ZeroYearExtrapolator;
