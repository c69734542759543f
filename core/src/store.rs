//! Append-only log of terminal entries.

use ghostline_types::{EntryId, EntryKind, LogEntry};

/// Append-only log with a monotonic revision counter.
///
/// There is no way to remove or edit an entry. The revision is bumped on every
/// append.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    entries: Vec<LogEntry>,
    revision: usize,
}

impl LogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn revision(&self) -> usize {
        self.revision
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Stamp a new entry with a fresh id and the local time of day, then append it.
    pub fn append(&mut self, kind: EntryKind, content: impl Into<String>) -> EntryId {
        let id = EntryId::new();
        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        self.push(LogEntry::new(id, timestamp, kind, content));
        id
    }

    pub fn push(&mut self, entry: LogEntry) {
        tracing::trace!(id = %entry.id(), kind = %entry.kind(), "log append");
        self.entries.push(entry);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Entries of one kind, in insertion order.
    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }
}

impl<'a> IntoIterator for &'a LogStore {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
