//! The fixed script a session plays.

use ghostline_types::EntryKind;

/// Built-in sequence: 8-bit ASCII for "THEY SEE YOU".
pub const NUMBER_SEQUENCE: [&str; 12] = [
    "01010100", "01001000", "01000101", "01011001", "00100000", "01010011", "01000101",
    "01000101", "00100000", "01011001", "01001111", "01010101",
];

/// Pool for the warning injected after every third token. Repeats are allowed.
pub const SCARY_MESSAGES: [&str; 4] = [
    "THEY ARE WATCHING YOUR KEYSTROKES.",
    "YOUR FILES ARE BREATHING.",
    "THE VOID IS CONSUMING THE BUFFER.",
    "SYSTEM ENTROPY INCREASING.",
];

pub const UPLINK_ESTABLISHED: &str = ">> UPLINK ESTABLISHED. BYPASSING RING-0...";
pub const SOLVE_THE_BINARY: &str = ">> SOLVE THE BINARY BEFORE IT'S TOO LATE.";
pub const SEQUENCE_COMPLETE: &str = "SEQUENCE COMPLETE. EXTRACTING PATTERNS...";
pub const FINAL_DECODED_REALITY: &str = "FINAL DECODED REALITY:";
pub const DECODING_FAILED: &str = "DECODING FAILED. REALITY CORRUPTED.";
pub const CONNECTION_SEVERED: &str = ">> CONNECTION SEVERED.";

/// Every `SCARE_EVERY` tokens a warning pair is injected.
pub const SCARE_EVERY: usize = 3;

#[must_use]
pub fn default_sequence() -> Vec<String> {
    NUMBER_SEQUENCE.iter().map(ToString::to_string).collect()
}

/// An entry the driver wants appended, before it is stamped by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub kind: EntryKind,
    pub content: String,
}

impl ScriptLine {
    #[must_use]
    pub fn new(kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn scary(message: &str) -> Self {
        Self::new(EntryKind::Warning, format!("!! {message}"))
    }
}
