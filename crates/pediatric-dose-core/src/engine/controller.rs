//! Recomputation Controller.
//!
//! Owns one session's inputs (weight, catalog, selection) and republishes the
//! whole result map synchronously after every change:
//!
//! ```text
//!            valid weight && selection non-empty
//!   ┌──────┐ ─────────────────────────────────▶ ┌──────────┐
//!   │ Idle │                                     │ Computed │ ──┐ input changed
//!   └──────┘ ◀───────────────────────────────── └──────────┘ ◀─┘ (recompute)
//!            weight invalid || selection empty
//! ```

use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::format::ResultView;
use crate::models::{CalculationResults, DrugId};
use crate::selection::{Selection, SelectionResult, SelectionTracker};

use super::{is_valid_weight, parse_weight, DoseEngine};

/// Whether there is anything to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalcState {
    /// No valid weight or nothing selected; results are empty
    Idle,
    /// Results are populated for the current inputs
    Computed,
}

/// Inputs of the last published computation.
#[derive(Debug, Clone, PartialEq)]
struct InputSnapshot {
    weight_bits: u64,
    catalog_revision: u64,
    selection: Selection,
}

/// Session-scoped controller that keeps results in step with inputs.
#[derive(Debug, Clone)]
pub struct RecomputationController {
    config: EngineConfig,
    engine: DoseEngine,
    catalog: Catalog,
    catalog_revision: u64,
    tracker: SelectionTracker,
    weight_kg: Option<f64>,
    results: CalculationResults,
    state: CalcState,
    last_inputs: Option<InputSnapshot>,
    evaluations: u64,
}

impl RecomputationController {
    /// Create a controller with an empty catalog.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_catalog(config, Catalog::new())
    }

    /// Create a controller over an already-loaded catalog.
    pub fn with_catalog(config: EngineConfig, catalog: Catalog) -> Self {
        Self {
            engine: DoseEngine::new(&config),
            config,
            catalog,
            catalog_revision: 0,
            tracker: SelectionTracker::new(),
            weight_kg: None,
            results: CalculationResults::new(),
            state: CalcState::Idle,
            last_inputs: None,
            evaluations: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        self.tracker.selection()
    }

    pub fn weight_kg(&self) -> Option<f64> {
        self.weight_kg
    }

    pub fn state(&self) -> CalcState {
        self.state
    }

    /// The current result map (empty while Idle).
    pub fn results(&self) -> &CalculationResults {
        &self.results
    }

    /// Number of times the engine has actually run.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Display rows for the current results.
    pub fn views(&self) -> Vec<ResultView> {
        self.results
            .iter()
            .map(|(name, result)| result.display(name, &self.config))
            .collect()
    }

    /// Set the weight in kg. `None` clears it.
    pub fn set_weight(&mut self, weight_kg: Option<f64>) -> CalcState {
        self.weight_kg = weight_kg;
        self.recompute()
    }

    /// Set the weight from form text; unparseable text clears it.
    pub fn set_weight_text(&mut self, text: &str) -> CalcState {
        self.set_weight(parse_weight(text))
    }

    pub fn select(&mut self, drug_id: &DrugId) -> SelectionResult<CalcState> {
        self.tracker.select(&self.catalog, drug_id)?;
        Ok(self.recompute())
    }

    pub fn deselect(&mut self, drug_id: &DrugId) -> CalcState {
        self.tracker.deselect(drug_id);
        self.recompute()
    }

    pub fn set_dosage(&mut self, drug_id: &DrugId, value: f64) -> SelectionResult<CalcState> {
        self.tracker.set_dosage(&self.catalog, drug_id, value)?;
        Ok(self.recompute())
    }

    pub fn replace_selection(&mut self, drug_ids: &[DrugId]) -> CalcState {
        self.tracker.replace_selection(&self.catalog, drug_ids);
        self.recompute()
    }

    /// Swap in a freshly loaded catalog, pruning stale selections.
    ///
    /// Returns the ids dropped from the selection.
    pub fn reload_catalog(&mut self, catalog: Catalog) -> Vec<DrugId> {
        self.catalog = catalog;
        self.catalog_revision += 1;
        let pruned = self.tracker.prune(&self.catalog);
        self.recompute();
        pruned
    }

    /// Forget the weight and selection (logout).
    pub fn clear_session(&mut self) -> CalcState {
        self.tracker.clear();
        self.weight_kg = None;
        self.recompute()
    }

    fn recompute(&mut self) -> CalcState {
        let weight = self.weight_kg.filter(|w| is_valid_weight(*w));
        let selection = self.tracker.selection();

        let Some(weight) = weight.filter(|_| !selection.is_empty()) else {
            if self.state == CalcState::Computed {
                tracing::debug!("Preconditions no longer met, clearing results");
            }
            self.results = CalculationResults::new();
            self.state = CalcState::Idle;
            self.last_inputs = None;
            return self.state;
        };

        let snapshot = InputSnapshot {
            weight_bits: weight.to_bits(),
            catalog_revision: self.catalog_revision,
            selection: selection.clone(),
        };
        if self.last_inputs.as_ref() == Some(&snapshot) {
            return self.state;
        }

        self.results = self.engine.calculate(weight, selection, &self.catalog);
        self.state = CalcState::Computed;
        self.last_inputs = Some(snapshot);
        self.evaluations += 1;

        tracing::debug!(
            results = self.results.len(),
            evaluations = self.evaluations,
            "Recomputed dose results"
        );
        self.state
    }
}
