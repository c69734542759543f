//! Core domain types for Ghostline.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod entry;
mod progress;
mod sanitize;
pub mod ui;

pub use entry::{EntryId, EntryKind, LogEntry};
pub use progress::Progress;
pub use sanitize::sanitize_terminal_text;

// ============================================================================
// Run State
// ============================================================================

/// Coarse lifecycle phase of a session.
///
/// Transitions only move forward: `NotStarted -> Decoding -> Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    NotStarted,
    Decoding,
    Finished,
}

impl RunState {
    /// Upper-case label shown in the HUD (`ACCESS_NODE_<label>`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RunState::NotStarted => "INITIALIZING",
            RunState::Decoding => "DECODING",
            RunState::Finished => "FINISHED",
        }
    }

    #[must_use]
    pub const fn is_started(self) -> bool {
        !matches!(self, RunState::NotStarted)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
