use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Opaque unique token identifying one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell entries apart in logs.
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..9])
    }
}

/// Display category of a log entry. Rendering depends only on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    System,
    Hacker,
    Binary,
    Warning,
    Ai,
}

impl EntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryKind::System => "system",
            EntryKind::Hacker => "hacker",
            EntryKind::Binary => "binary",
            EntryKind::Warning => "warning",
            EntryKind::Ai => "ai",
        }
    }

    /// Only binary entries are revealed progressively.
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, EntryKind::Binary)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timestamped, typed unit of terminal output.
///
/// Entries are immutable once created; the only way to get one into a log is
/// to append it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    id: EntryId,
    timestamp: String,
    content: String,
    kind: EntryKind,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        id: EntryId,
        timestamp: impl Into<String>,
        kind: EntryKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
            content: content.into(),
            kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Number of user-perceived characters in the content.
    #[must_use]
    pub fn grapheme_len(&self) -> usize {
        self.content.graphemes(true).count()
    }

    /// The first `count` graphemes of the content.
    #[must_use]
    pub fn content_prefix(&self, count: usize) -> &str {
        match self.content.grapheme_indices(true).nth(count) {
            Some((byte_idx, _)) => &self.content[..byte_idx],
            None => &self.content,
        }
    }
}
