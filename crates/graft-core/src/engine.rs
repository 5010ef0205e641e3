//! Extraction engine
//!
//! One extraction pass: run every extractor registered under the host's
//! language over a block of host text, translate match ranges into absolute
//! host-document coordinates, resolve overlaps, assign buffer identities,
//! and assemble the host-range to virtual-block map. The engine mutates
//! nothing; buffer updates are the virtual workspace's job.

use crate::buffer_id::BufferId;
use crate::extractor::ForeignExtractor;
use crate::position::{Position, Range};
use crate::registry::ExtractorRegistry;
use facet::Facet;
use std::collections::{BTreeMap, HashMap, btree_map};
use tracing::{debug, trace};

/// Opaque editor/cell token supplied by the host text provider.
///
/// Passed through to blocks untouched so downstream tooling can route
/// results back to the editor that produced the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Facet)]
pub struct EditorId(pub String);

impl EditorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One block of host text handed in for extraction.
///
/// `origin` is the absolute position of the start of `text` within the
/// larger host document; extraction may run on a sub-block (one notebook
/// cell), not the whole document.
#[derive(Debug, Clone, Copy)]
pub struct HostBlock<'a> {
    pub text: &'a str,
    pub origin: Position,
    pub editor: &'a EditorId,
}

impl<'a> HostBlock<'a> {
    pub fn new(text: &'a str, origin: Position, editor: &'a EditorId) -> Self {
        Self {
            text,
            origin,
            editor,
        }
    }
}

/// One entry of the block map: the virtual buffer a host range feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignBlock {
    /// Identity of the virtual buffer this fragment belongs to.
    pub identity: BufferId,
    /// Foreign language of the fragment.
    pub language: String,
    /// Whether the fragment is ephemeral (own buffer, no continuity).
    pub standalone: bool,
    /// The extracted foreign text: the captured-group concatenation.
    pub text: String,
    /// The editor token of the block the fragment came from.
    pub editor: EditorId,
}

/// Immutable result of one extraction pass: host range to foreign block,
/// iterated in document order.
///
/// No two keys overlap. Rebuilt fully on every pass; the previous pass's
/// map is simply discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockMap {
    blocks: BTreeMap<Range, ForeignBlock>,
}

impl BlockMap {
    /// Whether a range is already claimed, by overlap or by an identical key.
    fn claims(&self, range: &Range) -> bool {
        self.blocks.contains_key(range) || self.blocks.keys().any(|r| r.intersects(range))
    }

    fn insert(&mut self, range: Range, block: ForeignBlock) {
        self.blocks.insert(range, block);
    }

    pub fn get(&self, range: &Range) -> Option<&ForeignBlock> {
        self.blocks.get(range)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Range, ForeignBlock> {
        self.blocks.iter()
    }

    pub fn ranges(&self) -> impl Iterator<Item = &Range> {
        self.blocks.keys()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> IntoIterator for &'a BlockMap {
    type Item = (&'a Range, &'a ForeignBlock);
    type IntoIter = btree_map::Iter<'a, Range, ForeignBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Orchestrates extraction passes against a registry.
///
/// Holds the registry by reference: construct one registry at startup and
/// share it across engines/documents.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionEngine<'r> {
    registry: &'r ExtractorRegistry,
}

impl<'r> ExtractionEngine<'r> {
    pub fn new(registry: &'r ExtractorRegistry) -> Self {
        Self { registry }
    }

    /// Run one synchronous extraction pass over a host block.
    ///
    /// Extractors run in registration order; a match whose absolute range
    /// overlaps an already-claimed range is dropped entirely, so the
    /// first-registered extractor wins conflicts. Standalone matches get
    /// per-pass serials counted in scan order, which keeps the result
    /// byte-identical across repeated passes over identical input.
    pub fn extract(&self, block: &HostBlock<'_>, host_language: &str) -> BlockMap {
        let mut map = BlockMap::default();
        let mut serials: HashMap<(String, String), u32> = HashMap::new();

        for extractor in self.registry.extractors_for(host_language) {
            let language = extractor.language();
            let extension = extractor.file_extension();

            for snippet in extractor.extract(block.text) {
                let range = snippet.range.shifted_by(block.origin);
                if map.claims(&range) {
                    trace!(%range, language, "dropping overlapping match");
                    continue;
                }

                let identity = if extractor.standalone() {
                    let serial = serials
                        .entry((language.to_string(), extension.to_string()))
                        .or_insert(0);
                    let id = BufferId::standalone(host_language, language, extension, *serial);
                    *serial += 1;
                    id
                } else {
                    BufferId::persistent(host_language, language, extension)
                };

                trace!(%range, identity = %identity, "extracted foreign block");
                map.insert(
                    range,
                    ForeignBlock {
                        identity,
                        language: language.to_string(),
                        standalone: extractor.standalone(),
                        text: snippet.text,
                        editor: block.editor.clone(),
                    },
                );
            }
        }

        debug!(
            host_language,
            blocks = map.len(),
            "extraction pass complete"
        );
        map
    }
}
