//! graft library - extract embedded foreign code from host documents
//!
//! This library exposes the CLI's config resolution and output rendering
//! for testing and embedding purposes; the extraction engine itself lives
//! in `graft-core`.

pub mod config;
pub mod output;
