//! Virtual workspace: the consumer of block maps
//!
//! Owns the foreign buffers for one host document and applies each
//! extraction pass's map as instructions: standalone buffers are replaced
//! wholesale, persistent buffers get full-content replacement (never an
//! incremental diff, so host and virtual state cannot drift), and buffers
//! whose identity stopped matching are removed. Lifecycle events let the
//! caller release tooling resources tied to removed buffers.

use crate::buffer_id::BufferId;
use crate::engine::BlockMap;
use facet::Facet;
use std::collections::BTreeMap;
use tracing::debug;

/// One virtual buffer holding extracted foreign text.
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct ForeignBuffer {
    pub id: BufferId,
    pub text: String,
    /// Bumped on every content change; lets downstream tooling detect
    /// staleness cheaply.
    pub version: u64,
}

/// Lifecycle notification emitted by [`VirtualWorkspace::apply`].
///
/// `Removed` is the caller's cue to release any editor/language-server
/// session tied to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEvent {
    Created(BufferId),
    Updated(BufferId),
    Removed(BufferId),
}

/// The foreign buffers of one host document.
///
/// Per-buffer state machine: absent -> created (first match) -> updated
/// (subsequent passes while matches persist) -> removed (no pass yields a
/// match for the identity any longer). Must not be driven concurrently for
/// the same host document.
#[derive(Debug, Clone, Default)]
pub struct VirtualWorkspace {
    persistent: BTreeMap<String, ForeignBuffer>,
    standalone: Vec<ForeignBuffer>,
}

impl VirtualWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one pass's block map, returning lifecycle events.
    ///
    /// Standalone blocks each get a fresh buffer; the previous pass's
    /// standalone buffers are discarded first. Persistent blocks of one
    /// identity are concatenated in range order, each fragment normalized
    /// to end with a newline, and replace the buffer's whole content. A
    /// stale identity is recreated, never an error.
    pub fn apply(&mut self, map: &BlockMap) -> Vec<BufferEvent> {
        let mut events = Vec::new();

        for buffer in self.standalone.drain(..) {
            debug!(id = %buffer.id, "discarding standalone buffer");
            events.push(BufferEvent::Removed(buffer.id));
        }

        // Assemble persistent content per identity, in range order.
        let mut assembled: BTreeMap<String, (BufferId, String)> = BTreeMap::new();
        for (_, block) in map {
            if block.standalone {
                self.standalone.push(ForeignBuffer {
                    id: block.identity.clone(),
                    text: block.text.clone(),
                    version: 1,
                });
                events.push(BufferEvent::Created(block.identity.clone()));
            } else {
                let (_, text) = assembled
                    .entry(block.identity.canonical())
                    .or_insert_with(|| (block.identity.clone(), String::new()));
                text.push_str(&block.text);
                if !block.text.ends_with('\n') {
                    text.push('\n');
                }
            }
        }

        let stale: Vec<String> = self
            .persistent
            .keys()
            .filter(|key| !assembled.contains_key(*key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(buffer) = self.persistent.remove(&key) {
                debug!(id = %buffer.id, "removing persistent buffer");
                events.push(BufferEvent::Removed(buffer.id));
            }
        }

        for (key, (id, text)) in assembled {
            match self.persistent.get_mut(&key) {
                None => {
                    debug!(id = %id, "creating persistent buffer");
                    self.persistent.insert(
                        key,
                        ForeignBuffer {
                            id: id.clone(),
                            text,
                            version: 1,
                        },
                    );
                    events.push(BufferEvent::Created(id));
                }
                Some(buffer) if buffer.text != text => {
                    buffer.text = text;
                    buffer.version += 1;
                    events.push(BufferEvent::Updated(id));
                }
                Some(_) => {}
            }
        }

        events
    }

    /// Look up a buffer by its canonical identity string.
    pub fn get(&self, identity: &str) -> Option<&ForeignBuffer> {
        self.persistent
            .get(identity)
            .or_else(|| self.standalone.iter().find(|b| b.id.canonical() == identity))
    }

    /// The current pass's standalone buffers, in range order.
    pub fn standalone_buffers(&self) -> &[ForeignBuffer] {
        &self.standalone
    }

    /// Persistent buffers, ordered by identity.
    pub fn persistent_buffers(&self) -> impl Iterator<Item = &ForeignBuffer> {
        self.persistent.values()
    }

    /// All live buffers: persistent first, then the pass's standalone ones.
    pub fn buffers(&self) -> impl Iterator<Item = &ForeignBuffer> {
        self.persistent.values().chain(self.standalone.iter())
    }

    pub fn len(&self) -> usize {
        self.persistent.len() + self.standalone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persistent.is_empty() && self.standalone.is_empty()
    }
}
