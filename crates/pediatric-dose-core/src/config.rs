//! Engine configuration.
//!
//! Resolved once at startup and passed into the engine and controller.
//! Nothing here reads environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Volume scaling constant `K` in `total = weight * dosage * K / concentration`.
///
/// The source formula multiplies by 5; earlier revisions of the same formula
/// used 1. There is no documented clinical derivation for either value.
/// Pending domain-expert review; override through [`EngineConfig`].
pub const DEFAULT_VOLUME_SCALING_FACTOR: f64 = 5.0;

/// Decimal places used when formatting volumes for display.
pub const DEFAULT_DISPLAY_DECIMALS: usize = 1;

/// Upper bound for `display_decimals`.
pub const MAX_DISPLAY_DECIMALS: usize = 6;

/// Rendering of an unspecified indication or usage time.
pub const DEFAULT_UNSPECIFIED_LABEL: &str = "unspecified";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("volume scaling factor must be a positive finite number, got {0}")]
    InvalidScalingFactor(f64),

    #[error("display decimals must be at most {max}, got {0}", max = MAX_DISPLAY_DECIMALS)]
    InvalidDisplayDecimals(usize),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Dose engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    volume_scaling_factor: f64,
    display_decimals: usize,
    unspecified_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume_scaling_factor: DEFAULT_VOLUME_SCALING_FACTOR,
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
            unspecified_label: DEFAULT_UNSPECIFIED_LABEL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a validated configuration.
    pub fn new(
        volume_scaling_factor: f64,
        display_decimals: usize,
        unspecified_label: impl Into<String>,
    ) -> ConfigResult<Self> {
        let config = Self {
            volume_scaling_factor,
            display_decimals,
            unspecified_label: unspecified_label.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration. Missing keys take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.volume_scaling_factor.is_finite() && self.volume_scaling_factor > 0.0) {
            return Err(ConfigError::InvalidScalingFactor(self.volume_scaling_factor));
        }
        if self.display_decimals > MAX_DISPLAY_DECIMALS {
            return Err(ConfigError::InvalidDisplayDecimals(self.display_decimals));
        }
        Ok(())
    }

    pub fn volume_scaling_factor(&self) -> f64 {
        self.volume_scaling_factor
    }

    pub fn display_decimals(&self) -> usize {
        self.display_decimals
    }

    pub fn unspecified_label(&self) -> &str {
        &self.unspecified_label
    }
}
