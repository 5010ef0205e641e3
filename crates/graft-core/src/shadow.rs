//! Shadow filesystem for virtual buffers
//!
//! Some language servers only operate on real files. The shadow filesystem
//! materializes foreign buffers under a root directory, one file per buffer
//! identity, and keeps them in step with workspace lifecycle events.
//! [`ShadowFile`] carries the line-splice algorithm for applying ranged
//! edits to shadowed content.

use crate::buffer_id::BufferId;
use crate::document::{BufferEvent, ForeignBuffer, VirtualWorkspace};
use crate::position::{Position, Range};
use eyre::{Result, WrapErr};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line-based in-memory file supporting ranged edits.
///
/// Invariant: there is always at least one (possibly empty) line; the glue
/// logic in [`apply_change`](Self::apply_change) relies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowFile {
    lines: Vec<String>,
}

impl ShadowFile {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(String::from).collect(),
        }
    }

    /// Current content with `\n` separators.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The range covering the whole file.
    ///
    /// The end line is the line count (one past the last index), the
    /// convention whole-document replacements use.
    pub fn full_range(&self) -> Range {
        let last_len = self.lines.last().map(String::len).unwrap_or(0);
        Range::new(Position::ZERO, Position::new(self.lines.len(), last_len))
    }

    /// Splice `text` over `range`.
    ///
    /// The start line keeps its prefix up to the start column and glues it
    /// onto the replacement's first line; the end line keeps its suffix from
    /// the end column and glues it onto the replacement's last line. An end
    /// line at or past the line count means "through the end of the file".
    pub fn apply_change(&mut self, text: &str, range: Range) {
        let line_count = self.lines.len();
        let start_line = range.start.line.min(line_count);
        let end_line = range.end.line;

        let prefix = if start_line < line_count {
            let line = &self.lines[start_line];
            line[..clamp_to_boundary(line, range.start.column)].to_string()
        } else {
            String::new()
        };
        let suffix = if end_line < line_count {
            let line = &self.lines[end_line];
            line[clamp_to_boundary(line, range.end.column)..].to_string()
        } else {
            String::new()
        };

        let mut inner: Vec<String> = text.split('\n').map(String::from).collect();
        inner[0] = format!("{prefix}{}", inner[0]);
        let last = inner.len() - 1;
        inner[last].push_str(&suffix);

        let mut lines = self.lines[..start_line].to_vec();
        lines.append(&mut inner);
        if end_line + 1 < line_count {
            lines.extend_from_slice(&self.lines[end_line + 1..]);
        }
        self.lines = lines;
    }
}

fn clamp_to_boundary(line: &str, column: usize) -> usize {
    let mut column = column.min(line.len());
    while !line.is_char_boundary(column) {
        column -= 1;
    }
    column
}

/// Materializes foreign buffers as files under a root directory.
#[derive(Debug, Clone)]
pub struct ShadowFilesystem {
    root: PathBuf,
}

impl ShadowFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).wrap_err_with(|| {
            format!("Failed to create shadow directory {}", root.display())
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a buffer's shadow file lives.
    pub fn path_for(&self, id: &BufferId) -> PathBuf {
        self.root.join(id.canonical())
    }

    /// Write a buffer's content to its shadow file.
    pub fn write(&self, buffer: &ForeignBuffer) -> Result<PathBuf> {
        let path = self.path_for(&buffer.id);
        std::fs::write(&path, &buffer.text)
            .wrap_err_with(|| format!("Failed to write shadow file {}", path.display()))?;
        debug!(path = %path.display(), "wrote shadow file");
        Ok(path)
    }

    /// Delete a buffer's shadow file. A missing file is not an error.
    pub fn remove(&self, id: &BufferId) -> Result<()> {
        let path = self.path_for(id);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed shadow file");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error).wrap_err_with(|| {
                format!("Failed to remove shadow file {}", path.display())
            }),
        }
    }

    /// Apply one pass's lifecycle events to the shadow directory.
    pub fn sync(&self, workspace: &VirtualWorkspace, events: &[BufferEvent]) -> Result<()> {
        for event in events {
            match event {
                BufferEvent::Created(id) | BufferEvent::Updated(id) => {
                    if let Some(buffer) = workspace.get(&id.canonical()) {
                        self.write(buffer)?;
                    }
                }
                BufferEvent::Removed(id) => self.remove(id)?,
            }
        }
        Ok(())
    }
}
