//! Pediatric Dose Core Library
//!
//! Computes liquid medication volumes for a child from body weight, a chosen
//! drug and a chosen mg/kg dosage.
//!
//! # Architecture
//!
//! ```text
//! Catalog API records ──▶ Catalog Normalizer ──▶ Catalog (Drug[])
//!                                                     │
//!                                          multi-select options
//!                                                     │
//!                               Selection Tracker (drug → dosage)
//!                                                     │
//!              weight ──▶ Recomputation Controller ──▶ Dose Engine
//!                                                     │
//!                                  CalculationResults (by drug name)
//! ```
//!
//! # Core Principle
//!
//! **Results are replaced whole or not at all.** A caregiver never sees a
//! mix of stale and current volumes.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Drug, raw records, CalculationResult)
//! - [`catalog`]: Record normalization and the catalog-source seam
//! - [`selection`]: Per-session drug and dosage selection
//! - [`engine`]: Dose Engine and Recomputation Controller
//! - [`format`]: Display rounding
//! - [`config`]: Engine configuration

pub mod catalog;
pub mod config;
pub mod engine;
pub mod format;
pub mod models;
pub mod selection;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogLoad, CatalogSource, CatalogWarning, Credential};
pub use config::{EngineConfig, DEFAULT_VOLUME_SCALING_FACTOR};
pub use engine::{CalcState, DoseEngine, RecomputationController};
pub use models::{CalculationResult, CalculationResults, ClinicalNote, Drug, DrugId, RawDrugRecord};
pub use selection::{Selection, SelectionTracker};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DoseCalcError {
    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Invalid dosage option: {0}")]
    InvalidDosageOption(String),

    #[error("Unknown drug: {0}")]
    UnknownDrug(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<catalog::CatalogError> for DoseCalcError {
    fn from(e: catalog::CatalogError) -> Self {
        DoseCalcError::CatalogError(e.to_string())
    }
}

impl From<selection::SelectionError> for DoseCalcError {
    fn from(e: selection::SelectionError) -> Self {
        let message = e.to_string();
        match e {
            selection::SelectionError::InvalidDosageOption { .. } => {
                DoseCalcError::InvalidDosageOption(message)
            }
            selection::SelectionError::UnknownDrug(id) => DoseCalcError::UnknownDrug(id.to_string()),
        }
    }
}

impl From<config::ConfigError> for DoseCalcError {
    fn from(e: config::ConfigError) -> Self {
        DoseCalcError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DoseCalcError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DoseCalcError::InternalError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a calculator session. `config_json` of `None` uses defaults.
#[uniffi::export]
pub fn new_calculator(config_json: Option<String>) -> Result<Arc<DoseCalculatorCore>, DoseCalcError> {
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json)?,
        None => EngineConfig::default(),
    };
    Ok(Arc::new(DoseCalculatorCore {
        controller: Arc::new(Mutex::new(RecomputationController::new(config))),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DoseCalculatorCore {
    controller: Arc<Mutex<RecomputationController>>,
}

#[uniffi::export]
impl DoseCalculatorCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Load the catalog from an API response body. Returns excluded records.
    pub fn load_catalog_json(&self, payload: String) -> Result<Vec<FfiCatalogWarning>, DoseCalcError> {
        let load = Catalog::from_json(&payload)?;
        let mut controller = self.controller.lock()?;
        controller.reload_catalog(load.catalog);
        Ok(load.warnings.into_iter().map(|w| w.into()).collect())
    }

    /// Drugs available for selection.
    pub fn drug_options(&self) -> Result<Vec<FfiDrug>, DoseCalcError> {
        let controller = self.controller.lock()?;
        Ok(controller.catalog().drugs().iter().map(|d| d.into()).collect())
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    pub fn select(&self, drug_id: String) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.select(&DrugId::new(drug_id))?.into())
    }

    pub fn deselect(&self, drug_id: String) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.deselect(&DrugId::new(drug_id)).into())
    }

    pub fn set_dosage(&self, drug_id: String, dosage_per_kg: f64) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.set_dosage(&DrugId::new(drug_id), dosage_per_kg)?.into())
    }

    pub fn replace_selection(&self, drug_ids: Vec<String>) -> Result<FfiCalcState, DoseCalcError> {
        let ids: Vec<DrugId> = drug_ids.into_iter().map(DrugId::new).collect();
        let mut controller = self.controller.lock()?;
        Ok(controller.replace_selection(&ids).into())
    }

    /// Selected drugs with their active dosage.
    pub fn selection(&self) -> Result<Vec<FfiSelectedDrug>, DoseCalcError> {
        let controller = self.controller.lock()?;
        Ok(controller
            .selection()
            .iter()
            .map(|(id, dosage)| FfiSelectedDrug {
                drug_id: id.to_string(),
                dosage_per_kg: *dosage,
            })
            .collect())
    }

    // =========================================================================
    // Weight & Session Operations
    // =========================================================================

    pub fn set_weight(&self, weight_kg: Option<f64>) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.set_weight(weight_kg).into())
    }

    pub fn set_weight_text(&self, text: String) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.set_weight_text(&text).into())
    }

    /// Forget weight and selection (logout).
    pub fn clear_session(&self) -> Result<FfiCalcState, DoseCalcError> {
        let mut controller = self.controller.lock()?;
        Ok(controller.clear_session().into())
    }

    // =========================================================================
    // Results
    // =========================================================================

    pub fn state(&self) -> Result<FfiCalcState, DoseCalcError> {
        let controller = self.controller.lock()?;
        Ok(controller.state().into())
    }

    /// Current results with display strings.
    pub fn results(&self) -> Result<Vec<FfiCalculationResult>, DoseCalcError> {
        let controller = self.controller.lock()?;
        let config = controller.config();
        Ok(controller
            .results()
            .iter()
            .map(|(name, result)| FfiCalculationResult::new(name, result, config))
            .collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe calculation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiCalcState {
    Idle,
    Computed,
}

impl From<CalcState> for FfiCalcState {
    fn from(state: CalcState) -> Self {
        match state {
            CalcState::Idle => FfiCalcState::Idle,
            CalcState::Computed => FfiCalcState::Computed,
        }
    }
}

/// FFI-safe catalog drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub id: String,
    pub name: String,
    pub dosage_options: Vec<f64>,
    pub dosage_options_label: String,
    pub concentration: f64,
    pub indication: Option<String>,
    pub usage_time: Option<String>,
    pub doses_per_day: u32,
}

impl From<&Drug> for FfiDrug {
    fn from(drug: &Drug) -> Self {
        Self {
            id: drug.id().to_string(),
            name: drug.name().to_string(),
            dosage_options: drug.dosage_options().to_vec(),
            dosage_options_label: format::format_dosages(drug.dosage_options()),
            concentration: drug.concentration(),
            indication: drug.indication().as_text().map(str::to_string),
            usage_time: drug.usage_time().as_text().map(str::to_string),
            doses_per_day: drug.doses_per_day(),
        }
    }
}

/// FFI-safe selection entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSelectedDrug {
    pub drug_id: String,
    pub dosage_per_kg: f64,
}

/// FFI-safe catalog warning.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCatalogWarning {
    pub record_index: u32,
    pub drug_id: Option<String>,
    pub reason: String,
}

impl From<CatalogWarning> for FfiCatalogWarning {
    fn from(warning: CatalogWarning) -> Self {
        Self {
            record_index: warning.record_index as u32,
            drug_id: warning.drug_id,
            reason: warning.reason,
        }
    }
}

/// FFI-safe calculation result, with raw values and display strings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCalculationResult {
    pub drug_id: String,
    pub drug_name: String,
    pub dosage_per_kg: f64,
    pub total_volume_ml: f64,
    pub dose_volume_ml: f64,
    pub total_volume_display: String,
    pub dose_volume_display: String,
    pub usage_time: String,
    pub doses_per_day: u32,
}

impl FfiCalculationResult {
    fn new(drug_name: &str, result: &CalculationResult, config: &EngineConfig) -> Self {
        let view = result.display(drug_name, config);
        Self {
            drug_id: result.drug_id.to_string(),
            drug_name: view.drug_name,
            dosage_per_kg: result.dosage_per_kg,
            total_volume_ml: result.total_volume_ml,
            dose_volume_ml: result.dose_volume_ml,
            total_volume_display: view.total_volume,
            dose_volume_display: view.dose_volume,
            usage_time: view.usage_time,
            doses_per_day: view.doses_per_day,
        }
    }
}
