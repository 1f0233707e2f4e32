//! Derived dose calculation results.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;

use super::{ClinicalNote, DrugId};

/// Volumes for one selected drug.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalculationResult {
    pub drug_id: DrugId,
    /// mg/kg dosage the volumes were computed from
    pub dosage_per_kg: f64,
    /// Total liquid volume over 24 hours, in mL (unrounded)
    pub total_volume_ml: f64,
    /// Liquid volume per administration, in mL (unrounded)
    pub dose_volume_ml: f64,
    pub usage_time: ClinicalNote,
    pub doses_per_day: u32,
}

/// Results for a whole selection, keyed by drug display name.
///
/// Always rebuilt as a whole; never patched in place.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct CalculationResults(BTreeMap<String, CalculationResult>);

impl CalculationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, drug_name: &str) -> Option<&CalculationResult> {
        self.0.get(drug_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CalculationResult> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, drug_name: String, result: CalculationResult) {
        self.0.insert(drug_name, result);
    }
}

impl<'a> IntoIterator for &'a CalculationResults {
    type Item = (&'a String, &'a CalculationResult);
    type IntoIter = btree_map::Iter<'a, String, CalculationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
