//! Core domain logic for Ghostline.
//!
//! Everything here is synchronous and free of IO:
//! the append-only [`LogStore`], the [`SequenceDriver`] state machine, and
//! the fixed script the driver plays.

mod store;
pub mod script;
mod sequence;

pub use store::LogStore;
pub use script::ScriptLine;
pub use sequence::{DriverError, DriverPhase, MessagePicker, RandomPicker, SequenceDriver, Step};
