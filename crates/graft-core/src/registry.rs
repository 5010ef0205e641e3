//! Extractor registry
//!
//! Maps host-language tags to ordered extractor lists. An explicit object
//! constructed at startup and passed by reference to the extraction engine;
//! there is no process-wide singleton.

use crate::extractor::ForeignExtractor;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered extractors per host language.
///
/// Order is significant: extractors are tried in registration order, and the
/// first rule matching a span wins that span. Duplicate registration is
/// permitted; both entries stay active in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, Vec<Arc<dyn ForeignExtractor>>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extractor to a host language's trial order.
    pub fn register(
        &mut self,
        host_language: impl Into<String>,
        extractor: Arc<dyn ForeignExtractor>,
    ) {
        self.extractors
            .entry(host_language.into())
            .or_default()
            .push(extractor);
    }

    /// The ordered extractors for a host language.
    ///
    /// Unknown languages get an empty slice, never an error. Tags are
    /// case-sensitive, exact match.
    pub fn extractors_for(&self, host_language: &str) -> &[Arc<dyn ForeignExtractor>] {
        self.extractors
            .get(host_language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Host languages with at least one registered extractor.
    pub fn host_languages(&self) -> impl Iterator<Item = &str> {
        self.extractors.keys().map(String::as_str)
    }

    /// Total number of registered extractors across all host languages.
    pub fn len(&self) -> usize {
        self.extractors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}
