//! Catalog source seam.
//!
//! The catalog-management API is an external collaborator. Implementations
//! receive the caller's credential explicitly on every fetch.

use std::fmt;

use crate::models::RawDrugRecord;

use super::{Catalog, CatalogLoad, CatalogResult};

/// Opaque API credential (e.g. a bearer token).
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building a request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Produces raw drug records at catalog-load time.
pub trait CatalogSource {
    /// Fetch every raw record as an untyped JSON value.
    fn fetch(&self, credential: &Credential) -> CatalogResult<Vec<serde_json::Value>>;
}

/// Fetch from `source` and normalize into a catalog.
pub fn load_catalog<S>(source: &S, credential: &Credential) -> CatalogResult<CatalogLoad>
where
    S: CatalogSource + ?Sized,
{
    let values = source.fetch(credential)?;
    Ok(Catalog::load_values(values))
}

/// In-memory source holding fixed records.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    values: Vec<serde_json::Value>,
}

impl StaticCatalogSource {
    pub fn new(values: Vec<serde_json::Value>) -> Self {
        Self { values }
    }

    /// Build from typed records.
    pub fn from_records(records: &[RawDrugRecord]) -> CatalogResult<Self> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }
}

impl CatalogSource for StaticCatalogSource {
    fn fetch(&self, _credential: &Credential) -> CatalogResult<Vec<serde_json::Value>> {
        Ok(self.values.clone())
    }
}

/// Source backed by a JSON response body captured from the API.
#[derive(Debug, Clone)]
pub struct JsonCatalogSource {
    payload: String,
}

impl JsonCatalogSource {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl CatalogSource for JsonCatalogSource {
    fn fetch(&self, _credential: &Credential) -> CatalogResult<Vec<serde_json::Value>> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;

    /// Source that behaves like the authenticated API.
    struct TokenCheckingSource {
        expected: Credential,
        inner: StaticCatalogSource,
    }

    impl CatalogSource for TokenCheckingSource {
        fn fetch(&self, credential: &Credential) -> CatalogResult<Vec<serde_json::Value>> {
            if credential != &self.expected {
                return Err(CatalogError::Source("401 Unauthorized".into()));
            }
            self.inner.fetch(credential)
        }
    }

    fn records() -> Vec<RawDrugRecord> {
        vec![
            RawDrugRecord::new("1", "Paracetamol", "[10,15,20]", "[250]", 3),
            RawDrugRecord::new("2", "Ibuprofen", vec![5.0, 10.0], 100.0, 4),
        ]
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("secret-token");
        assert_eq!(format!("{:?}", credential), "Credential(<redacted>)");
        assert_eq!(credential.expose(), "secret-token");
    }

    #[test]
    fn test_load_from_static_source() {
        let source = StaticCatalogSource::from_records(&records()).unwrap();
        let load = load_catalog(&source, &Credential::new("t")).unwrap();

        assert_eq!(load.catalog.len(), 2);
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn test_load_from_json_source() {
        let source = JsonCatalogSource::new(
            r#"[{"id": 1, "name": "Paracetamol", "dosages": [10], "concentration": [250], "dosesPerDay": 3}]"#,
        );
        let load = load_catalog(&source, &Credential::new("t")).unwrap();
        assert_eq!(load.catalog.len(), 1);
    }

    #[test]
    fn test_credential_passed_explicitly() {
        let source = TokenCheckingSource {
            expected: Credential::new("good"),
            inner: StaticCatalogSource::from_records(&records()).unwrap(),
        };

        assert!(load_catalog(&source, &Credential::new("good")).is_ok());
        assert!(matches!(
            load_catalog(&source, &Credential::new("bad")),
            Err(CatalogError::Source(_))
        ));
    }
}
