//! Error types for plastisim.
//!
//! The projection engine itself never fails: an empty series or a missing
//! zero-crossing year are ordinary outputs. Errors come from the ambient
//! layers around it (configuration loading, parameter validation, the
//! exchange-rate cache) and from [`SeriesGuard`](crate::engine::guard::SeriesGuard)
//! when a computed series breaks one of its invariants.

use thiserror::Error;

/// Result type alias for plastisim operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Unified error type for all plastisim operations.
#[derive(Debug, Error)]
pub enum ProjectionError {
    // ===== Series Guard Violations =====
    /// Numerical instability detected (NaN or Inf) in a projected point.
    #[error("Guard: non-finite value detected at {location}")]
    NonFiniteValue {
        /// Field and year where the non-finite value was detected.
        location: String,
    },

    /// A series invariant does not hold at the given year.
    #[error("Guard: invariant '{name}' violated at year {year}")]
    InvariantViolation {
        /// Name of the violated invariant.
        name: String,
        /// Year of the offending point.
        year: i32,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration or parameter set.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== Exchange Rate Errors =====
    /// The exchange-rate source could not produce a rate.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectionError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an exchange-rate error with a message.
    #[must_use]
    pub fn rate_unavailable(message: impl Into<String>) -> Self {
        Self::RateUnavailable(message.into())
    }

    /// Create an invariant violation for the given year.
    #[must_use]
    pub fn invariant(name: impl Into<String>, year: i32) -> Self {
        Self::InvariantViolation {
            name: name.into(),
            year,
        }
    }

    /// Check if this error was raised by the series guard.
    #[must_use]
    pub const fn is_guard_violation(&self) -> bool {
        matches!(
            self,
            Self::NonFiniteValue { .. } | Self::InvariantViolation { .. }
        )
    }
}
