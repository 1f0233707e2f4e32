//! Canonical drug catalog.
//!
//! Pipeline: raw API records → normalization → validated `Catalog`.
//! One bad record never aborts a load: it is excluded and reported as a
//! [`CatalogWarning`].

mod normalizer;
mod source;

pub use normalizer::*;
pub use source::*;

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Drug, DrugId, DrugOption, RawDrugRecord};

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog payload is not a JSON array: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Catalog source error: {0}")]
    Source(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// A record excluded from the catalog during loading.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogWarning {
    /// Position of the record in the source sequence
    pub record_index: usize,
    /// Raw id of the record, if it had one
    pub drug_id: Option<String>,
    /// Why it was excluded
    pub reason: String,
}

/// Outcome of loading a catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub warnings: Vec<CatalogWarning>,
}

/// The validated, normalized set of drugs available for selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    drugs: Vec<Drug>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize raw records into a catalog, collecting warnings for rejects.
    pub fn load<I>(records: I) -> CatalogLoad
    where
        I: IntoIterator<Item = RawDrugRecord>,
    {
        Self::load_entries(records.into_iter().map(Ok))
    }

    /// Decode a JSON array payload (an API response body) into a catalog.
    ///
    /// Fails only when the payload as a whole is not an array; individual
    /// records that don't decode become warnings.
    pub fn from_json(payload: &str) -> CatalogResult<CatalogLoad> {
        let values: Vec<serde_json::Value> = serde_json::from_str(payload)?;
        Ok(Self::load_values(values))
    }

    /// Load from already-parsed JSON values.
    pub fn load_values<I>(values: I) -> CatalogLoad
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        Self::load_entries(values.into_iter().map(|value| {
            let raw_id = raw_id_of(&value);
            serde_json::from_value::<RawDrugRecord>(value)
                .map_err(|e| (raw_id, NormalizationError::Malformed(e.to_string())))
        }))
    }

    fn load_entries<I>(entries: I) -> CatalogLoad
    where
        I: IntoIterator<Item = Result<RawDrugRecord, (Option<String>, NormalizationError)>>,
    {
        let mut drugs: Vec<Drug> = Vec::new();
        let mut warnings = Vec::new();
        let mut seen_ids: HashSet<DrugId> = HashSet::new();
        let mut seen_names: HashSet<String> = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let outcome = entry.and_then(|raw| {
                let raw_id = raw.id.as_ref().and_then(|id| id.to_drug_id()).map(|id| id.to_string());
                normalize(&raw).map_err(|e| (raw_id, e))
            });

            let rejection = match outcome {
                Ok(drug) if seen_ids.contains(drug.id()) => Some((
                    Some(drug.id().to_string()),
                    NormalizationError::DuplicateId(drug.id().to_string()),
                )),
                Ok(drug) if seen_names.contains(drug.name()) => Some((
                    Some(drug.id().to_string()),
                    NormalizationError::DuplicateName(drug.name().to_string()),
                )),
                Ok(drug) => {
                    seen_ids.insert(drug.id().clone());
                    seen_names.insert(drug.name().to_string());
                    drugs.push(drug);
                    None
                }
                Err(rejected) => Some(rejected),
            };

            if let Some((drug_id, reason)) = rejection {
                tracing::warn!(
                    record_index = index,
                    drug_id = drug_id.as_deref().unwrap_or("<none>"),
                    reason = %reason,
                    "Excluding invalid catalog record"
                );
                warnings.push(CatalogWarning {
                    record_index: index,
                    drug_id,
                    reason: reason.to_string(),
                });
            }
        }

        tracing::info!(
            accepted = drugs.len(),
            rejected = warnings.len(),
            "Catalog loaded"
        );

        CatalogLoad {
            catalog: Catalog { drugs },
            warnings,
        }
    }

    /// Get a drug by id.
    pub fn get(&self, id: &DrugId) -> Option<&Drug> {
        self.drugs.iter().find(|d| d.id() == id)
    }

    pub fn contains(&self, id: &DrugId) -> bool {
        self.get(id).is_some()
    }

    /// All drugs in source order.
    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Options for the drug multi-select control.
    pub fn options(&self) -> Vec<DrugOption> {
        self.drugs.iter().map(DrugOption::from).collect()
    }
}

/// Best-effort id of an undecodable record, for the warning.
fn raw_id_of(value: &serde_json::Value) -> Option<String> {
    let id = value.get("id").or_else(|| value.get("ID"))?;
    match id {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
