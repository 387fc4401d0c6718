//! # plastisim
//!
//! Ocean plastic accumulation projections under a cleanup budget.
//!
//! The model integrates daily plastic inflow to the ocean year by year:
//! - Exponential production growth with a linearly rising waste fraction
//! - Pluggable interventions that remove or intercept part of the inflow
//! - A linear extrapolation of when the mitigated stock reaches zero
//!
//! ## Example
//!
//! ```rust
//! use plastisim::prelude::*;
//!
//! let params = SimulationParameters::new(1e10, 5.61, 1991, 2035);
//! let projection = compute_projection(&params);
//! assert_eq!(projection.series.len(), 45);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::suboptimal_flops,  // Formulas mirror the published model
    clippy::imprecise_flops,
    clippy::missing_const_for_fn,
    clippy::float_cmp,
    clippy::manual_midpoint,   // Trapezoid rule reads clearer spelled out
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod projection;
pub mod scales;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{ProjectionConfig, ProjectionConfigBuilder};
    pub use crate::engine::{
        DataPoint, GuardConfig, Intervention, InterventionPolicy, SeriesGuard, WasteModel,
    };
    pub use crate::error::{ProjectionError, ProjectionResult};
    pub use crate::exchange::{ExchangeRateProvider, RateQuote};
    pub use crate::projection::{
        compute_projection, Projection, ProjectionSummary, Projector, SimulationParameters,
    };
    pub use crate::scales::LogScale;
}

/// Re-export for public API
pub use error::{ProjectionError, ProjectionResult};
