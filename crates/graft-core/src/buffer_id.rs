//! Structured virtual-buffer identity
//!
//! Every foreign buffer has a stable identity string usable as a routing key
//! by a language-server layer. Persistent buffers are keyed by
//! (host-language, foreign-language); standalone buffers additionally carry
//! a per-pass serial so each fragment stays independently addressable.

use facet::Facet;
use std::fmt::{Display, Formatter};

/// Identity of one virtual buffer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
pub struct BufferId {
    /// Host language the fragment was extracted from.
    pub host_language: String,
    /// Foreign language of the buffer content.
    pub language: String,
    /// Logical file extension for tooling routing.
    pub extension: String,
    /// `None` for the persistent buffer of this key; `Some(n)` for the n-th
    /// standalone fragment of an extraction pass, in scan order.
    pub serial: Option<u32>,
}

impl BufferId {
    /// Identity of the single persistent buffer for a key.
    pub fn persistent(
        host_language: impl Into<String>,
        language: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            host_language: host_language.into(),
            language: language.into(),
            extension: extension.into(),
            serial: None,
        }
    }

    /// Identity of one standalone fragment.
    pub fn standalone(
        host_language: impl Into<String>,
        language: impl Into<String>,
        extension: impl Into<String>,
        serial: u32,
    ) -> Self {
        Self {
            host_language: host_language.into(),
            language: language.into(),
            extension: extension.into(),
            serial: Some(serial),
        }
    }

    pub fn is_standalone(&self) -> bool {
        self.serial.is_some()
    }

    /// Canonical string form (`python-sql.sql`, `python-sql-2.sql`).
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl Display for BufferId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.serial {
            None => write!(
                f,
                "{}-{}.{}",
                self.host_language, self.language, self.extension
            ),
            Some(serial) => write!(
                f,
                "{}-{}-{}.{}",
                self.host_language, self.language, serial, self.extension
            ),
        }
    }
}

impl PartialEq<&str> for BufferId {
    fn eq(&self, other: &&str) -> bool {
        parse_buffer_id(other).is_some_and(|parsed| parsed == *self)
    }
}

impl PartialEq<BufferId> for &str {
    fn eq(&self, other: &BufferId) -> bool {
        parse_buffer_id(self).is_some_and(|parsed| parsed == *other)
    }
}

/// Parse a canonical identity string back into its parts.
///
/// Best-effort: the host language is everything up to the first `-`, so the
/// round-trip holds for host tags without a dash (which covers real language
/// identifiers; foreign tags may themselves contain dashes). A trailing
/// `-<digits>` before the extension parses as a standalone serial.
pub fn parse_buffer_id(id: &str) -> Option<BufferId> {
    let (stem, extension) = id.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }

    let (host_language, rest) = stem.split_once('-')?;
    if host_language.is_empty() || rest.is_empty() {
        return None;
    }

    let (language, serial) = match rest.rsplit_once('-') {
        Some((language, digits)) if !language.is_empty() => {
            match digits.parse::<u32>() {
                Ok(serial) => (language, Some(serial)),
                Err(_) => (rest, None),
            }
        }
        _ => (rest, None),
    };

    Some(BufferId {
        host_language: host_language.to_string(),
        language: language.to_string(),
        extension: extension.to_string(),
        serial,
    })
}
