use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Allergen synonym dictionary: canonical allergen token -> derivative terms.
///
/// Loaded once at startup and shared read-only for the life of the process.
/// Keys and derivatives are normalized to trimmed lowercase at the load
/// boundary so per-request expansion never has to re-normalize them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SynonymMap(BTreeMap<String, Vec<String>>);

impl SynonymMap {
    /// Load the dictionary from a JSON file of `{"allergen": ["term", ...]}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read synonym file {}: {e}",
                path.display()
            ))
        })?;

        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!(
                "Failed to parse synonym file {}: {e}",
                path.display()
            ))
        })?;

        Ok(parsed.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl FromIterator<(String, Vec<String>)> for SynonymMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|(key, terms)| {
                let terms = terms
                    .into_iter()
                    .map(|t| t.trim().to_lowercase())
                    .collect();
                (key.trim().to_lowercase(), terms)
            })
            .collect();
        SynonymMap(map)
    }
}
