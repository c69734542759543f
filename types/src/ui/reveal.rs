//! Character-by-character reveal for binary entries.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use crate::{EntryId, LogEntry};

/// Reveal progress of a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealState {
    fingerprint: u64,
    started: Instant,
}

impl RevealState {
    fn new(fingerprint: u64, started: Instant) -> Self {
        Self {
            fingerprint,
            started,
        }
    }

    /// One grapheme becomes visible per elapsed `interval`, capped at `len`.
    #[must_use]
    pub fn visible(&self, now: Instant, interval: Duration, len: usize) -> usize {
        if interval.is_zero() {
            return len;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let steps = elapsed.as_nanos() / interval.as_nanos();
        usize::try_from(steps).map_or(len, |steps| steps.min(len))
    }
}

/// Tracks reveal progress per entry.
///
/// State is keyed by entry id and the content's fingerprint: rendering the
/// same entry again continues where it left off, while a changed content
/// identity restarts the reveal.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    interval: Duration,
    states: HashMap<EntryId, RevealState>,
}

impl RevealTracker {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            states: HashMap::new(),
        }
    }

    /// A tracker that shows every entry fully on first sight.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Number of graphemes of `entry` visible at `now`.
    ///
    /// Entries that are not revealed progressively are always fully visible
    /// and leave no state behind.
    pub fn visible_graphemes(&mut self, entry: &LogEntry, now: Instant) -> usize {
        let len = entry.grapheme_len();
        if !entry.kind().is_revealed() {
            return len;
        }

        let fingerprint = fingerprint(entry.content());
        let state = self
            .states
            .entry(entry.id())
            .and_modify(|state| {
                if state.fingerprint != fingerprint {
                    *state = RevealState::new(fingerprint, now);
                }
            })
            .or_insert_with(|| RevealState::new(fingerprint, now));

        state.visible(now, self.interval, len)
    }

    /// True while any tracked entry is still typing at `now`.
    #[must_use]
    pub fn is_animating<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a LogEntry>,
        now: Instant,
    ) -> bool {
        entries.into_iter().any(|entry| {
            self.states.get(&entry.id()).is_some_and(|state| {
                let len = entry.grapheme_len();
                state.visible(now, self.interval, len) < len
            })
        })
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.states.len()
    }
}

fn fingerprint(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}
