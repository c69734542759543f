//! Terminal text sanitization for model output.
//!
//! Generated text is untrusted: escape sequences in it could move the cursor,
//! rewrite the screen, or touch the clipboard. Everything that reaches the log
//! from the network goes through [`sanitize_terminal_text`] first.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    /// Just saw ESC.
    Escape,
    /// Inside `ESC [` parameters.
    Csi,
    /// Inside OSC/DCS/PM/APC until BEL or `ESC \`.
    StringSeq,
    /// Saw ESC inside a string sequence.
    StringEscape,
    /// Two-byte escape (`ESC ( B` and friends): drop one more char.
    Designator,
}

/// Strip ANSI escape sequences and control characters, keeping `\n` and `\t`.
///
/// Returns `Cow::Borrowed` when the input is already clean.
///
/// ```
/// use ghostline_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("RUN\x1b[2J."), "RUN.");
/// assert_eq!(sanitize_terminal_text("plain"), "plain");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_unsafe) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut scan = Scan::Text;

    for c in input.chars() {
        scan = match scan {
            Scan::Text => match c {
                ESC => Scan::Escape,
                C1_CSI => Scan::Csi,
                c if is_unsafe(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Escape => match c {
                '[' => Scan::Csi,
                ']' | 'P' | '^' | '_' => Scan::StringSeq,
                '(' | ')' | '*' | '+' | '#' | ' ' => Scan::Designator,
                _ => Scan::Text,
            },
            Scan::Csi => {
                if ('\x40'..='\x7e').contains(&c) {
                    Scan::Text
                } else if ('\x20'..='\x3f').contains(&c) {
                    Scan::Csi
                } else {
                    // Malformed; resume with this char as text.
                    if !is_unsafe(c) {
                        out.push(c);
                    }
                    Scan::Text
                }
            }
            Scan::StringSeq => match c {
                BEL => Scan::Text,
                ESC => Scan::StringEscape,
                _ => Scan::StringSeq,
            },
            Scan::StringEscape => {
                if c == '\\' {
                    Scan::Text
                } else {
                    Scan::StringSeq
                }
            }
            Scan::Designator => Scan::Text,
        };
    }

    Cow::Owned(out)
}

fn is_unsafe(c: char) -> bool {
    let c0 = c <= '\x1f' && !matches!(c, '\n' | '\t');
    let c1 = ('\u{0080}'..='\u{009f}').contains(&c);
    c0 || c1 || c == '\x7f'
}
