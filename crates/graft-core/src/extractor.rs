//! The extractor capability contract
//!
//! An extractor is a single matching rule: it scans a block of host text and
//! produces zero or more foreign snippets, each with the span of the captured
//! text in block-relative coordinates.

use crate::position::Range;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One extracted fragment of foreign code.
///
/// The range covers the captured foreign text only, not the surrounding
/// pattern match, so magic/command prefixes stay attributed to the host
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignSnippet {
    /// Concatenated capture-group text.
    pub text: String,
    /// Span of the captured text, relative to the scanned block.
    pub range: Range,
}

/// A rule that turns spans of host text into foreign fragments.
///
/// Implementations must be pure: scanning the same text twice yields the
/// same snippets. `Send + Sync` so one registry can back many documents.
pub trait ForeignExtractor: Debug + Send + Sync {
    /// Identifier of the foreign language a match produces.
    fn language(&self) -> &str;

    /// Whether each match becomes its own independent virtual buffer.
    ///
    /// Non-standalone matches of the same (host-language, foreign-language)
    /// key accumulate into one persistent buffer across the document's
    /// lifetime.
    fn standalone(&self) -> bool;

    /// Logical file extension of the foreign buffer, used to derive tooling
    /// behavior (e.g. which language server to route to).
    fn file_extension(&self) -> &str;

    /// Whether the rule is anchored on a cell magic (`%%name` on the first
    /// line of a cell).
    fn has_cell_magic(&self) -> bool {
        false
    }

    /// Scan a block of host text. Zero matches is a normal result.
    fn extract(&self, host_text: &str) -> Vec<ForeignSnippet>;
}

/// Declarative extractor configuration - the registration surface.
///
/// This is what hosts declare at startup, per host language, in order; it is
/// also the record the JSON manifest parses into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorOptions {
    /// Foreign language produced by this extractor.
    pub language: String,
    /// Pattern with capture groups, compiled in multi-line mode. Use an
    /// explicit class such as `[\s\S]` to cross line boundaries; `.` does
    /// not match a newline.
    pub pattern: String,
    /// Ordered capture-group indices (>= 1) extracted into the foreign
    /// buffer. Non-captured surrounding text stays with the host document.
    pub capture_groups: Vec<usize>,
    /// Ephemeral per-match buffers when true; one accumulated buffer when
    /// false.
    #[serde(default)]
    pub standalone: bool,
    /// Logical extension of the foreign buffer.
    pub file_extension: String,
}
