//! UI state types shared by the engine and the TUI.
//!
//! Pure data types with no IO, no async, no ratatui dependency.

mod reveal;

pub use reveal::{RevealState, RevealTracker};

/// UI configuration options derived from config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Show binary entries fully instead of typing them out.
    pub reduced_motion: bool,
}
