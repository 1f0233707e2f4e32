//! Per-session drug selection.
//!
//! A [`Selection`] maps each chosen drug to its single active dosage option.
//! The selected set is exactly the key set of that map.

use std::collections::btree_map::{self, BTreeMap};

use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::models::DrugId;

/// Selection errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("dosage {value} is not an offered option for selected drug {drug_id}")]
    InvalidDosageOption { drug_id: DrugId, value: f64 },

    #[error("drug {0} is not in the catalog")]
    UnknownDrug(DrugId),
}

pub type SelectionResult<T> = Result<T, SelectionError>;

/// Chosen drugs and their dosage (mg/kg).
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Selection(BTreeMap<DrugId, f64>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dosage(&self, drug_id: &DrugId) -> Option<f64> {
        self.0.get(drug_id).copied()
    }

    pub fn contains(&self, drug_id: &DrugId) -> bool {
        self.0.contains_key(drug_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &DrugId> {
        self.0.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DrugId, f64> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(DrugId, f64)> for Selection {
    fn from_iter<I: IntoIterator<Item = (DrugId, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Maintains a [`Selection`] consistent with the current catalog.
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selection: Selection,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Add a drug with its first dosage option. Returns `false` if it was
    /// already selected (the existing dosage is kept).
    pub fn select(&mut self, catalog: &Catalog, drug_id: &DrugId) -> SelectionResult<bool> {
        if self.selection.contains(drug_id) {
            return Ok(false);
        }
        let drug = catalog
            .get(drug_id)
            .ok_or_else(|| SelectionError::UnknownDrug(drug_id.clone()))?;
        self.selection.0.insert(drug_id.clone(), drug.default_dosage());
        Ok(true)
    }

    /// Remove a drug. Returns `false` if it was not selected.
    pub fn deselect(&mut self, drug_id: &DrugId) -> bool {
        self.selection.0.remove(drug_id).is_some()
    }

    /// Choose a dosage for a selected drug. The selection is unchanged on error.
    pub fn set_dosage(
        &mut self,
        catalog: &Catalog,
        drug_id: &DrugId,
        value: f64,
    ) -> SelectionResult<()> {
        let offered = self.selection.contains(drug_id)
            && catalog.get(drug_id).is_some_and(|drug| drug.offers(value));
        if !offered {
            return Err(SelectionError::InvalidDosageOption {
                drug_id: drug_id.clone(),
                value,
            });
        }
        self.selection.0.insert(drug_id.clone(), value);
        Ok(())
    }

    /// Replace the whole selected set.
    ///
    /// Newly added ids get their default dosage, dropped ids lose theirs, and
    /// ids that stay selected keep their current dosage. Ids missing from the
    /// catalog are skipped.
    pub fn replace_selection(&mut self, catalog: &Catalog, drug_ids: &[DrugId]) {
        let mut next = BTreeMap::new();
        for drug_id in drug_ids {
            if let Some(dosage) = self.selection.dosage(drug_id) {
                next.insert(drug_id.clone(), dosage);
            } else if let Some(drug) = catalog.get(drug_id) {
                next.insert(drug_id.clone(), drug.default_dosage());
            } else {
                tracing::debug!(drug_id = %drug_id, "Skipping unknown drug in selection replace");
            }
        }
        self.selection = Selection(next);
        // Kept ids may themselves be stale.
        self.prune(catalog);
    }

    /// Drop ids no longer in the catalog, and reset dosages the catalog no
    /// longer offers to the drug's first option. Returns the dropped ids.
    pub fn prune(&mut self, catalog: &Catalog) -> Vec<DrugId> {
        let mut removed = Vec::new();
        self.selection.0.retain(|drug_id, dosage| match catalog.get(drug_id) {
            Some(drug) => {
                if !drug.offers(*dosage) {
                    tracing::debug!(drug_id = %drug_id, dosage = *dosage, "Resetting withdrawn dosage option");
                    *dosage = drug.default_dosage();
                }
                true
            }
            None => {
                removed.push(drug_id.clone());
                false
            }
        });
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "Pruned stale selection entries");
        }
        removed
    }

    /// Empty the selection (logout).
    pub fn clear(&mut self) {
        self.selection.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDrugRecord;

    fn catalog() -> Catalog {
        Catalog::load(vec![
            RawDrugRecord::new("1", "Paracetamol", vec![10.0, 15.0, 20.0], 250.0, 3),
            RawDrugRecord::new("2", "Ibuprofen", vec![5.0, 10.0], 100.0, 4),
            RawDrugRecord::new("3", "Amoxicillin", vec![25.0, 50.0], 250.0, 3),
        ])
        .catalog
    }

    #[test]
    fn test_select_defaults_to_first_option() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();

        assert!(tracker.select(&catalog, &"1".into()).unwrap());
        assert_eq!(tracker.selection().dosage(&"1".into()), Some(10.0));
    }

    #[test]
    fn test_select_twice_is_noop() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();

        tracker.select(&catalog, &"1".into()).unwrap();
        tracker.set_dosage(&catalog, &"1".into(), 20.0).unwrap();

        assert!(!tracker.select(&catalog, &"1".into()).unwrap());
        assert_eq!(tracker.selection().dosage(&"1".into()), Some(20.0));
    }

    #[test]
    fn test_select_unknown_drug() {
        let mut tracker = SelectionTracker::new();
        assert_eq!(
            tracker.select(&catalog(), &"99".into()),
            Err(SelectionError::UnknownDrug("99".into()))
        );
        assert!(tracker.selection().is_empty());
    }

    #[test]
    fn test_deselect() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();
        tracker.select(&catalog, &"1".into()).unwrap();

        assert!(tracker.deselect(&"1".into()));
        assert!(!tracker.deselect(&"1".into()));
        assert!(tracker.selection().is_empty());
    }

    #[test]
    fn test_set_dosage_rejects_unoffered_value() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();
        tracker.select(&catalog, &"1".into()).unwrap();

        let err = tracker.set_dosage(&catalog, &"1".into(), 12.0).unwrap_err();
        assert_eq!(
            err,
            SelectionError::InvalidDosageOption {
                drug_id: "1".into(),
                value: 12.0
            }
        );
        assert_eq!(tracker.selection().dosage(&"1".into()), Some(10.0));
    }

    #[test]
    fn test_set_dosage_requires_selection() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();

        assert!(matches!(
            tracker.set_dosage(&catalog, &"2".into(), 5.0),
            Err(SelectionError::InvalidDosageOption { .. })
        ));
        assert!(tracker.selection().is_empty());
    }

    #[test]
    fn test_replace_selection_preserves_kept_dosages() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();
        tracker.replace_selection(&catalog, &["1".into(), "2".into()]);
        tracker.set_dosage(&catalog, &"1".into(), 15.0).unwrap();

        tracker.replace_selection(&catalog, &["1".into(), "3".into(), "missing".into()]);

        let selection = tracker.selection();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.dosage(&"1".into()), Some(15.0));
        assert_eq!(selection.dosage(&"3".into()), Some(25.0));
        assert!(!selection.contains(&"2".into()));
    }

    #[test]
    fn test_prune_removes_stale_and_resets_withdrawn_options() {
        let mut tracker = SelectionTracker::new();
        let old = catalog();
        tracker.replace_selection(&old, &["1".into(), "2".into()]);
        tracker.set_dosage(&old, &"1".into(), 20.0).unwrap();

        let updated = Catalog::load(vec![RawDrugRecord::new(
            "1",
            "Paracetamol",
            vec![10.0, 15.0],
            250.0,
            3,
        )])
        .catalog;

        let removed = tracker.prune(&updated);

        assert_eq!(removed, vec![DrugId::new("2")]);
        assert_eq!(tracker.selection().len(), 1);
        assert_eq!(tracker.selection().dosage(&"1".into()), Some(10.0));
    }

    #[test]
    fn test_clear() {
        let catalog = catalog();
        let mut tracker = SelectionTracker::new();
        tracker.replace_selection(&catalog, &["1".into(), "2".into()]);
        tracker.clear();
        assert!(tracker.selection().is_empty());
    }
}
