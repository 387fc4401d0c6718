//! Configuration system with YAML schema and validation.
//!
//! Every calibration constant the engine relies on is a named, overridable
//! field here rather than a literal in the code:
//! - Type-safe configuration structs with serde defaults
//! - Range validation via `validator`
//! - Semantic validation of cross-field constraints

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::engine::intervention::InterventionPolicy;
use crate::engine::waste::WasteModel;
use crate::engine::zero_year::DEFAULT_HORIZON_FACTOR;
use crate::error::{ProjectionError, ProjectionResult};
use crate::exchange::ExchangeConfig;
use crate::projection::SimulationParameters;

/// Top-level projection configuration.
///
/// Loaded from YAML files with full schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Calendar anchors and display defaults.
    #[validate(nested)]
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Waste growth model.
    #[validate(nested)]
    #[serde(default)]
    pub waste: WasteModel,

    /// Cleanup policy.
    #[serde(default)]
    pub intervention: InterventionPolicy,

    /// Exchange-rate cache settings.
    #[validate(nested)]
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Parameter snapshot a host starts from.
    #[validate(nested)]
    #[serde(default)]
    pub defaults: SimulationParameters,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            calibration: CalibrationConfig::default(),
            waste: WasteModel::default(),
            intervention: InterventionPolicy::default(),
            exchange: ExchangeConfig::default(),
            defaults: SimulationParameters::default(),
        }
    }
}

impl ProjectionConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ProjectionResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ProjectionResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ProjectionResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> ProjectionConfigBuilder {
        ProjectionConfigBuilder::default()
    }

    /// Run range and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate_all(&self) -> ProjectionResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> ProjectionResult<()> {
        let cal = &self.calibration;

        if cal.production_start_year > cal.cleanup_start_year {
            return Err(ProjectionError::config(format!(
                "Cleanup cannot start ({}) before production ({})",
                cal.cleanup_start_year, cal.production_start_year
            )));
        }
        if cal.cleanup_start_year > cal.max_projection_year {
            return Err(ProjectionError::config(format!(
                "Cleanup start ({}) is past the projection horizon ({})",
                cal.cleanup_start_year, cal.max_projection_year
            )));
        }

        if !self.waste.growth_rate.is_finite() || !self.waste.waste_fraction_slope.is_finite() {
            return Err(ProjectionError::config("Waste model rates must be finite"));
        }

        self.intervention.validate_semantic()?;
        self.validate_parameters(&self.defaults)
    }

    /// Validate a parameter set against this configuration's calendar.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-domain values, or a
    /// configuration error when the years are out of order, start before
    /// production, or end past `max_projection_year`.
    pub fn validate_parameters(&self, params: &SimulationParameters) -> ProjectionResult<()> {
        params.validate_all()?;

        let cal = &self.calibration;
        if params.start_year < cal.production_start_year {
            return Err(ProjectionError::config(format!(
                "Start year ({}) is before production start ({})",
                params.start_year, cal.production_start_year
            )));
        }
        if params.end_year > cal.max_projection_year {
            return Err(ProjectionError::config(format!(
                "End year ({}) is past the projection horizon ({})",
                params.end_year, cal.max_projection_year
            )));
        }
        Ok(())
    }
}

/// Calendar anchors, extrapolation guard and display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CalibrationConfig {
    /// First year of plastic production; historical accumulation starts here.
    #[validate(range(min = 1800, max = 2500))]
    #[serde(default = "default_production_start_year")]
    pub production_start_year: i32,
    /// First year cleanup capacity is applied.
    #[validate(range(min = 1800, max = 2500))]
    #[serde(default = "default_cleanup_start_year")]
    pub cleanup_start_year: i32,
    /// Latest year a projection may end on; also anchors the zero-year
    /// horizon.
    #[validate(range(min = 1800, max = 2500))]
    #[serde(default = "default_max_projection_year")]
    pub max_projection_year: i32,
    /// Zero-crossings later than this multiple of `max_projection_year` are
    /// discarded.
    #[validate(range(min = 1.0, max = 100.0))]
    #[serde(default = "default_horizon_factor")]
    pub zero_year_horizon_factor: f64,
    /// Reference unit cost in the display currency.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_cost_per_kg_eur")]
    pub default_cost_per_kg_eur: f64,
    /// Exchange rate used until a live rate is known.
    #[validate(range(min = 0.000_001))]
    #[serde(default = "default_exchange_rate")]
    pub default_exchange_rate: f64,
}

const fn default_production_start_year() -> i32 {
    1950
}

const fn default_cleanup_start_year() -> i32 {
    2024
}

const fn default_max_projection_year() -> i32 {
    2100
}

const fn default_horizon_factor() -> f64 {
    DEFAULT_HORIZON_FACTOR
}

const fn default_cost_per_kg_eur() -> f64 {
    5.22
}

const fn default_exchange_rate() -> f64 {
    0.93
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            production_start_year: default_production_start_year(),
            cleanup_start_year: default_cleanup_start_year(),
            max_projection_year: default_max_projection_year(),
            zero_year_horizon_factor: default_horizon_factor(),
            default_cost_per_kg_eur: default_cost_per_kg_eur(),
            default_exchange_rate: default_exchange_rate(),
        }
    }
}

impl CalibrationConfig {
    /// Reference unit cost converted out of the display currency.
    #[must_use]
    pub fn default_cost_per_kg(&self) -> f64 {
        self.default_cost_per_kg_eur / self.default_exchange_rate
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ProjectionConfigBuilder {
    cleanup_start_year: Option<i32>,
    max_projection_year: Option<i32>,
    horizon_factor: Option<f64>,
    waste: Option<WasteModel>,
    intervention: Option<InterventionPolicy>,
    defaults: Option<SimulationParameters>,
}

impl ProjectionConfigBuilder {
    /// Set the cleanup start year.
    #[must_use]
    pub const fn cleanup_start_year(mut self, year: i32) -> Self {
        self.cleanup_start_year = Some(year);
        self
    }

    /// Set the maximum projection year.
    #[must_use]
    pub const fn max_projection_year(mut self, year: i32) -> Self {
        self.max_projection_year = Some(year);
        self
    }

    /// Set the zero-year horizon factor.
    #[must_use]
    pub const fn zero_year_horizon_factor(mut self, factor: f64) -> Self {
        self.horizon_factor = Some(factor);
        self
    }

    /// Set the waste model.
    #[must_use]
    pub const fn waste(mut self, model: WasteModel) -> Self {
        self.waste = Some(model);
        self
    }

    /// Set the intervention policy.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // InterventionPolicy owns a Vec
    pub fn intervention(mut self, policy: InterventionPolicy) -> Self {
        self.intervention = Some(policy);
        self
    }

    /// Set the default parameter snapshot.
    #[must_use]
    pub const fn defaults(mut self, params: SimulationParameters) -> Self {
        self.defaults = Some(params);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ProjectionConfig {
        let mut config = ProjectionConfig::default();

        if let Some(year) = self.cleanup_start_year {
            config.calibration.cleanup_start_year = year;
        }

        if let Some(year) = self.max_projection_year {
            config.calibration.max_projection_year = year;
        }

        if let Some(factor) = self.horizon_factor {
            config.calibration.zero_year_horizon_factor = factor;
        }

        if let Some(model) = self.waste {
            config.waste = model;
        }

        if let Some(policy) = self.intervention {
            config.intervention = policy;
        }

        if let Some(params) = self.defaults {
            config.defaults = params;
        }

        config
    }
}
