//! graft-core - foreign code extraction and position mapping
//!
//! This crate provides the building blocks for:
//! - Extracting foreign-language fragments (SQL behind `%%bigquery`, R
//!   behind `%R`, ...) out of host documents with pattern extractors
//! - Translating every match into exact host-document coordinates, so
//!   language tooling run against a fragment can report results back at the
//!   right place
//! - Maintaining the extracted fragments as virtual buffers - ephemeral
//!   standalone fragments or persistent buffers accumulated across edits
//!
//! # Extracting foreign code
//!
//! Extractors are registered per host language, in order, in an explicit
//! [`ExtractorRegistry`]; the engine runs them over a block of host text and
//! produces a map from host ranges to virtual-document blocks:
//!
//! ```
//! use graft_core::{
//!     EditorId, ExtractionEngine, HostBlock, Position, VirtualWorkspace, magics,
//! };
//!
//! let registry = magics::default_registry();
//! let engine = ExtractionEngine::new(&registry);
//!
//! let editor = EditorId::new("notebook.ipynb#cell-0");
//! let block = HostBlock::new("%%bigquery\nSELECT 1\n", Position::ZERO, &editor);
//! let map = engine.extract(&block, "python");
//! assert_eq!(map.len(), 1);
//!
//! let mut workspace = VirtualWorkspace::new();
//! let events = workspace.apply(&map);
//! assert_eq!(events.len(), 1);
//! assert_eq!(
//!     workspace.get("python-sql-0.sql").map(|b| b.text.as_str()),
//!     Some("SELECT 1\n"),
//! );
//! ```
//!
//! # Declarative registration
//!
//! Hosts can declare extractors in a JSON manifest instead of code; invalid
//! entries are skipped with warnings while the rest register (see
//! [`ExtractorManifest`]).
//!
//! # A note on pattern-based extraction
//!
//! Extraction is regex-based, not parser-based. Foreign code containing
//! lookalike delimiters can confuse a pattern; that is an accepted boundary
//! of this approach, traded for predictable behavior on partial or invalid
//! host documents.

mod buffer_id;
mod document;
mod engine;
mod extractor;
pub mod magics;
mod manifest;
mod position;
mod regexp;
mod registry;
mod shadow;

pub use buffer_id::{BufferId, parse_buffer_id};
pub use document::{BufferEvent, ForeignBuffer, VirtualWorkspace};
pub use engine::{BlockMap, EditorId, ExtractionEngine, ForeignBlock, HostBlock};
pub use extractor::{ExtractorOptions, ForeignExtractor, ForeignSnippet};
pub use manifest::{ExtractorManifest, ManifestWarning};
pub use position::{LineIndex, Position, Range};
pub use regexp::RegexpExtractor;
pub use registry::ExtractorRegistry;
pub use shadow::{ShadowFile, ShadowFilesystem};
