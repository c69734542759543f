//! Sequence driver: the linear `idle -> running -> done` state machine.
//!
//! The driver owns no timers. The caller decides *when* a tick happens and
//! the driver decides *what* it produces:
//!
//! ```text
//! start()            Idle -> Running, position = -1
//! begin()            position = 0, evaluate
//! advance()          position += 1, evaluate
//! evaluate           position < len  -> Step::Emit(lines)
//!                    position >= len -> Running -> Done, Step::Complete
//! ```

use ghostline_types::{EntryKind, Progress};
use thiserror::Error;

use crate::script::{SCARE_EVERY, SCARY_MESSAGES, SOLVE_THE_BINARY, ScriptLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverPhase {
    #[default]
    Idle,
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("sequence already started")]
    AlreadyStarted,
    #[error("sequence is not running")]
    NotRunning,
    #[error("sequence position already set")]
    AlreadyBegun,
}

/// Outcome of evaluating the current position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Append these lines; another tick should follow.
    Emit(Vec<ScriptLine>),
    /// Every token was emitted; the driver is now `Done`.
    Complete,
}

/// Chooses an index into a pool of `len` scripted messages.
pub trait MessagePicker {
    fn pick(&mut self, len: usize) -> usize;
}

impl<F> MessagePicker for F
where
    F: FnMut(usize) -> usize,
{
    fn pick(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform pseudo-random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl MessagePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::random_range(0..len)
    }
}

#[derive(Debug, Clone)]
pub struct SequenceDriver {
    tokens: Vec<String>,
    /// `None` until the first tick fires.
    position: Option<usize>,
    phase: DriverPhase,
}

impl SequenceDriver {
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            position: None,
            phase: DriverPhase::Idle,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        let completed = self.position.map_or(0, |pos| pos + 1);
        Progress::new(completed, self.tokens.len())
    }

    pub fn start(&mut self) -> Result<(), DriverError> {
        if self.phase != DriverPhase::Idle {
            return Err(DriverError::AlreadyStarted);
        }
        self.phase = DriverPhase::Running;
        Ok(())
    }

    /// First tick after the start delay: position 0.
    pub fn begin(&mut self, picker: &mut dyn MessagePicker) -> Result<Step, DriverError> {
        if self.phase != DriverPhase::Running {
            return Err(DriverError::NotRunning);
        }
        if self.position.is_some() {
            return Err(DriverError::AlreadyBegun);
        }
        self.position = Some(0);
        Ok(self.evaluate(picker))
    }

    /// Subsequent ticks: position + 1.
    pub fn advance(&mut self, picker: &mut dyn MessagePicker) -> Result<Step, DriverError> {
        if self.phase != DriverPhase::Running {
            return Err(DriverError::NotRunning);
        }
        let Some(position) = self.position else {
            return self.begin(picker);
        };
        self.position = Some(position + 1);
        Ok(self.evaluate(picker))
    }

    fn evaluate(&mut self, picker: &mut dyn MessagePicker) -> Step {
        let position = self.position.unwrap_or(0);
        let len = self.tokens.len();

        let Some(token) = self.tokens.get(position) else {
            self.phase = DriverPhase::Done;
            return Step::Complete;
        };

        let mut lines = vec![ScriptLine::new(EntryKind::Binary, token.clone())];

        let emitted = position + 1;
        if emitted % SCARE_EVERY == 0 && emitted < len {
            let idx = picker.pick(SCARY_MESSAGES.len()).min(SCARY_MESSAGES.len() - 1);
            lines.push(ScriptLine::scary(SCARY_MESSAGES[idx]));
            lines.push(ScriptLine::new(EntryKind::Hacker, SOLVE_THE_BINARY));
        }

        Step::Emit(lines)
    }
}
