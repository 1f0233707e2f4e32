//! Dose Engine.
//!
//! For each selected drug:
//!
//! ```text
//! total_volume_ml = (weight_kg * dosage_per_kg * K) / concentration
//! dose_volume_ml  = total_volume_ml / doses_per_day
//! ```
//!
//! `K` is the configurable volume scaling factor. No rounding is applied.

use crate::catalog::Catalog;
use crate::config::{EngineConfig, DEFAULT_VOLUME_SCALING_FACTOR};
use crate::models::{CalculationResult, CalculationResults, Drug};
use crate::selection::Selection;

use super::is_valid_weight;

/// Pure dose calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseEngine {
    scaling_factor: f64,
}

impl Default for DoseEngine {
    fn default() -> Self {
        Self {
            scaling_factor: DEFAULT_VOLUME_SCALING_FACTOR,
        }
    }
}

impl DoseEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scaling_factor: config.volume_scaling_factor(),
        }
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// Calculate volumes for every selected drug.
    ///
    /// Returns an empty map when the weight is not a finite number `> 0`.
    /// Selected ids missing from the catalog are skipped.
    pub fn calculate(
        &self,
        weight_kg: f64,
        selection: &Selection,
        catalog: &Catalog,
    ) -> CalculationResults {
        let mut results = CalculationResults::new();
        if !is_valid_weight(weight_kg) {
            return results;
        }

        for (drug_id, &dosage_per_kg) in selection.iter() {
            let Some(drug) = catalog.get(drug_id) else {
                tracing::debug!(drug_id = %drug_id, "Skipping selected drug missing from catalog");
                continue;
            };
            if !(dosage_per_kg.is_finite() && dosage_per_kg > 0.0) {
                tracing::debug!(drug_id = %drug_id, dosage_per_kg, "Skipping non-positive dosage");
                continue;
            }
            results.insert(
                drug.name().to_string(),
                self.calculate_drug(weight_kg, dosage_per_kg, drug),
            );
        }

        results
    }

    fn calculate_drug(&self, weight_kg: f64, dosage_per_kg: f64, drug: &Drug) -> CalculationResult {
        let total_volume_ml =
            (weight_kg * dosage_per_kg * self.scaling_factor) / drug.concentration();
        let dose_volume_ml = total_volume_ml / f64::from(drug.doses_per_day());

        CalculationResult {
            drug_id: drug.id().clone(),
            dosage_per_kg,
            total_volume_ml,
            dose_volume_ml,
            usage_time: drug.usage_time().clone(),
            doses_per_day: drug.doses_per_day(),
        }
    }
}
