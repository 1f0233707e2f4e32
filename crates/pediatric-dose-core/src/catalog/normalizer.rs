//! Raw record normalizer.
//!
//! Handles:
//! - Decoding text-encoded arrays (`"[10,15,20]"`) and scalars
//! - Collapsing a concentration sequence to its first element
//! - Enforcing the `Drug` invariants

use thiserror::Error;

use crate::models::{ClinicalNote, Drug, NumericField, RawDrugRecord};

/// Reasons a raw record is excluded from the canonical catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    #[error("record has no usable id")]
    MissingId,

    #[error("record has an empty name")]
    EmptyName,

    #[error("record has no dosage options")]
    NoDosageOptions,

    #[error("dosage option must be a positive finite number, got {0}")]
    InvalidDosageOption(f64),

    #[error("record has no concentration")]
    MissingConcentration,

    #[error("concentration must be a positive finite number, got {0}")]
    InvalidConcentration(f64),

    #[error("record has no doses-per-day value")]
    MissingDosesPerDay,

    #[error("doses per day must be at least 1, got {0}")]
    InvalidDosesPerDay(i64),

    #[error("record does not match the drug record shape: {0}")]
    Malformed(String),

    #[error("duplicate drug id: {0}")]
    DuplicateId(String),

    #[error("duplicate drug name: {0}")]
    DuplicateName(String),
}

pub type NormalizationResult<T> = Result<T, NormalizationError>;

/// Normalize a raw record into a canonical [`Drug`].
pub fn normalize(raw: &RawDrugRecord) -> NormalizationResult<Drug> {
    let id = raw
        .id
        .as_ref()
        .and_then(|id| id.to_drug_id())
        .ok_or(NormalizationError::MissingId)?;

    let name = raw.name.as_deref().unwrap_or_default();

    let dosage_options = raw
        .dosages
        .as_ref()
        .map(decode_numeric_field)
        .unwrap_or_default();

    let concentration = raw
        .concentration
        .as_ref()
        .map(decode_numeric_field)
        .and_then(|values| values.first().copied())
        .ok_or(NormalizationError::MissingConcentration)?;

    let doses_per_day = raw
        .doses_per_day
        .ok_or(NormalizationError::MissingDosesPerDay)?;

    let drug = Drug::new(id, name, dosage_options, concentration, doses_per_day)?
        .with_indication(ClinicalNote::from_raw(raw.indication.as_deref()))
        .with_usage_time(ClinicalNote::from_raw(raw.usage_time.as_deref()));

    Ok(drug)
}

/// Decode a numeric field to a sequence.
///
/// Text is parsed as JSON once; anything that does not decode to a number or
/// an array of numbers yields an empty sequence instead of an error.
pub fn decode_numeric_field(field: &NumericField) -> Vec<f64> {
    match field {
        NumericField::Sequence(values) => values.clone(),
        NumericField::Scalar(value) => vec![*value],
        NumericField::Text(text) => match serde_json::from_str::<NumericField>(text.trim()) {
            Ok(NumericField::Sequence(values)) => values,
            Ok(NumericField::Scalar(value)) => vec![value],
            Ok(NumericField::Text(_)) => {
                tracing::debug!(field = %text, "nested text encoding, treating as empty");
                Vec::new()
            }
            Err(e) => {
                tracing::debug!(field = %text, error = %e, "undecodable numeric field, treating as empty");
                Vec::new()
            }
        },
    }
}
