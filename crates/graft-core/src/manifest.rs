//! Extractor manifest loading and registration
//!
//! The declarative registration surface: a JSON document mapping host
//! languages to ordered extractor configurations. Invalid entries are
//! skipped with a structured warning; every other registration proceeds
//! unaffected.

use crate::extractor::ExtractorOptions;
use crate::regexp::RegexpExtractor;
use crate::registry::ExtractorRegistry;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Declared extractors per host language.
///
/// ```json
/// {
///   "languages": {
///     "python": [
///       {
///         "language": "sql",
///         "pattern": "^%%sql\\n([\\s\\S]*)",
///         "capture_groups": [1],
///         "standalone": true,
///         "file_extension": "sql"
///       }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorManifest {
    /// Host language tag to ordered extractor configurations.
    pub languages: HashMap<String, Vec<ExtractorOptions>>,
}

/// A configuration entry that failed validation and was skipped.
#[derive(Debug, Clone)]
pub struct ManifestWarning {
    pub host_language: String,
    pub language: String,
    pub error: String,
}

impl ExtractorManifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("Failed to parse extractor manifest JSON")
    }

    /// Load a manifest from a local file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).wrap_err_with(|| {
            format!("Failed to read extractor manifest from {}", path.display())
        })?;
        Self::from_json(&content)
            .wrap_err_with(|| format!("Failed to parse extractor manifest from {}", path.display()))
    }

    /// Compile and register every entry into an existing registry.
    ///
    /// Entries whose pattern does not compile, or whose capture groups are
    /// invalid, are reported and skipped; siblings still register. Host
    /// languages are processed in sorted order so warnings are
    /// deterministic; within one host language, manifest order is
    /// registration order.
    pub fn register_into(self, registry: &mut ExtractorRegistry) -> Vec<ManifestWarning> {
        let mut warnings = Vec::new();

        let mut languages: Vec<(String, Vec<ExtractorOptions>)> =
            self.languages.into_iter().collect();
        languages.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (host_language, entries) in languages {
            for options in entries {
                let language = options.language.clone();
                match RegexpExtractor::new(options) {
                    Ok(extractor) => registry.register(&host_language, Arc::new(extractor)),
                    Err(error) => warnings.push(ManifestWarning {
                        host_language: host_language.clone(),
                        language,
                        error: format!("{error:#}"),
                    }),
                }
            }
        }

        warnings
    }

    /// Build a fresh registry from this manifest alone.
    pub fn into_registry(self) -> (ExtractorRegistry, Vec<ManifestWarning>) {
        let mut registry = ExtractorRegistry::new();
        let warnings = self.register_into(&mut registry);
        (registry, warnings)
    }

    /// Total number of declared extractor entries.
    pub fn len(&self) -> usize {
        self.languages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.values().all(Vec::is_empty)
    }
}
