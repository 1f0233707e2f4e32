//! Presentation formatting.
//!
//! Rounding happens here and only here; engine values stay unrounded.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::models::CalculationResult;

/// Format a volume with a fixed number of decimal places.
pub fn format_volume(volume_ml: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, volume_ml)
}

/// Format dosage options as a comma-separated list with one decimal.
pub fn format_dosages(dosages: &[f64]) -> String {
    dosages
        .iter()
        .map(|d| format!("{:.1}", d))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display-ready strings for one result row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultView {
    pub drug_name: String,
    pub total_volume: String,
    pub dose_volume: String,
    pub usage_time: String,
    pub doses_per_day: u32,
}

impl CalculationResult {
    /// Render this result for display.
    pub fn display(&self, drug_name: &str, config: &EngineConfig) -> ResultView {
        let decimals = config.display_decimals();
        ResultView {
            drug_name: drug_name.to_string(),
            total_volume: format_volume(self.total_volume_ml, decimals),
            dose_volume: format_volume(self.dose_volume_ml, decimals),
            usage_time: self.usage_time.render(config.unspecified_label()).to_string(),
            doses_per_day: self.doses_per_day,
        }
    }
}
