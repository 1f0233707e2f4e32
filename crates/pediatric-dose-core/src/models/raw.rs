//! Raw catalog records as delivered by the catalog-management API.
//!
//! The API is inconsistent about array-valued fields: depending on the
//! backend revision `dosages` and `concentration` arrive as numeric arrays,
//! as plain numbers, or as text holding a JSON array literal. These types
//! accept every shape; decoding to canonical values happens in
//! [`crate::catalog::normalize`].

use serde::{Deserialize, Serialize};

use super::DrugId;

/// Record identifier, numeric or textual on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    /// Canonical id, or `None` when the text form is blank.
    pub fn to_drug_id(&self) -> Option<DrugId> {
        match self {
            RawId::Number(n) => Some(DrugId::new(n.to_string())),
            RawId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| DrugId::new(trimmed))
            }
        }
    }
}

/// A numeric field in one of its wire encodings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumericField {
    /// Already-parsed array, e.g. `[10, 15, 20]`
    Sequence(Vec<f64>),
    /// Single number, e.g. `250`
    Scalar(f64),
    /// JSON literal inside a string, e.g. `"[10,15,20]"`
    Text(String),
}

impl From<Vec<f64>> for NumericField {
    fn from(values: Vec<f64>) -> Self {
        NumericField::Sequence(values)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Scalar(value)
    }
}

impl From<&str> for NumericField {
    fn from(text: &str) -> Self {
        NumericField::Text(text.to_string())
    }
}

/// A drug record before normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawDrugRecord {
    #[serde(default, alias = "ID")]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "dosageOptions", alias = "dosagePerKg")]
    pub dosages: Option<NumericField>,
    #[serde(default)]
    pub concentration: Option<NumericField>,
    #[serde(default)]
    pub indication: Option<String>,
    #[serde(default)]
    pub usage_time: Option<String>,
    #[serde(default)]
    pub doses_per_day: Option<i64>,
}

impl RawDrugRecord {
    /// Create a record with the fields the normalizer requires.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dosages: impl Into<NumericField>,
        concentration: impl Into<NumericField>,
        doses_per_day: i64,
    ) -> Self {
        Self {
            id: Some(RawId::Text(id.into())),
            name: Some(name.into()),
            dosages: Some(dosages.into()),
            concentration: Some(concentration.into()),
            indication: None,
            usage_time: None,
            doses_per_day: Some(doses_per_day),
        }
    }
}
