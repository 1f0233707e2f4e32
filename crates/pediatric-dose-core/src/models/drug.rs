//! Canonical drug catalog models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{NormalizationError, NormalizationResult};

/// Opaque catalog identifier, unique across a catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DrugId(String);

impl DrugId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrugId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DrugId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Free-text clinical note with an explicit "unspecified" marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ClinicalNote {
    Specified(String),
    #[default]
    Unspecified,
}

impl ClinicalNote {
    /// Build a note from optional source text. Blank text counts as unspecified.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(text) if !text.is_empty() => Self::Specified(text.to_string()),
            _ => Self::Unspecified,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Specified(text) => Some(text),
            Self::Unspecified => None,
        }
    }

    /// Text for display, substituting `unspecified_label` for the marker.
    pub fn render<'a>(&'a self, unspecified_label: &'a str) -> &'a str {
        self.as_text().unwrap_or(unspecified_label)
    }
}

/// A validated catalog drug.
///
/// Only constructible through [`Drug::new`], so every instance satisfies:
/// non-empty name, at least one dosage option, every option and the
/// concentration finite and `> 0`, and `doses_per_day >= 1`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Drug {
    id: DrugId,
    name: String,
    /// mg/kg strengths offered for this drug, in catalog order
    dosage_options: Vec<f64>,
    /// mg of active ingredient per mL of liquid
    concentration: f64,
    indication: ClinicalNote,
    usage_time: ClinicalNote,
    doses_per_day: u32,
}

impl Drug {
    /// Create a drug, enforcing the catalog invariants.
    pub fn new(
        id: DrugId,
        name: impl Into<String>,
        dosage_options: Vec<f64>,
        concentration: f64,
        doses_per_day: i64,
    ) -> NormalizationResult<Self> {
        if id.as_str().trim().is_empty() {
            return Err(NormalizationError::MissingId);
        }

        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(NormalizationError::EmptyName);
        }

        if dosage_options.is_empty() {
            return Err(NormalizationError::NoDosageOptions);
        }
        if let Some(bad) = dosage_options.iter().find(|d| !is_positive_finite(**d)) {
            return Err(NormalizationError::InvalidDosageOption(*bad));
        }

        if !is_positive_finite(concentration) {
            return Err(NormalizationError::InvalidConcentration(concentration));
        }

        let doses_per_day = u32::try_from(doses_per_day)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(NormalizationError::InvalidDosesPerDay(doses_per_day))?;

        Ok(Self {
            id,
            name,
            dosage_options,
            concentration,
            indication: ClinicalNote::Unspecified,
            usage_time: ClinicalNote::Unspecified,
            doses_per_day,
        })
    }

    pub fn with_indication(mut self, indication: ClinicalNote) -> Self {
        self.indication = indication;
        self
    }

    pub fn with_usage_time(mut self, usage_time: ClinicalNote) -> Self {
        self.usage_time = usage_time;
        self
    }

    pub fn id(&self) -> &DrugId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dosage_options(&self) -> &[f64] {
        &self.dosage_options
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn indication(&self) -> &ClinicalNote {
        &self.indication
    }

    pub fn usage_time(&self) -> &ClinicalNote {
        &self.usage_time
    }

    pub fn doses_per_day(&self) -> u32 {
        self.doses_per_day
    }

    /// The dosage a fresh selection starts with (the first option).
    pub fn default_dosage(&self) -> f64 {
        // Non-empty is guaranteed by `Drug::new`.
        self.dosage_options[0]
    }

    /// Check whether `dosage` is one of the offered options.
    pub fn offers(&self, dosage: f64) -> bool {
        self.dosage_options.iter().any(|option| *option == dosage)
    }
}

fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Entry for the drug multi-select control.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DrugOption {
    pub id: DrugId,
    pub label: String,
    pub indication: ClinicalNote,
    pub usage_time: ClinicalNote,
}

impl From<&Drug> for DrugOption {
    fn from(drug: &Drug) -> Self {
        Self {
            id: drug.id.clone(),
            label: drug.name.clone(),
            indication: drug.indication.clone(),
            usage_time: drug.usage_time.clone(),
        }
    }
}
