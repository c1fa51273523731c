//! Logging collaborator for the conversion engine
//!
//! The synthesis functions never print. Progress and recovered problems are
//! reported through a `ConversionLog` supplied by the caller, so the engine
//! stays usable from tests and other front ends.

use std::cell::RefCell;

/// Receiver for progress and warning messages emitted during a conversion
pub trait ConversionLog {
    /// Progress message
    fn info(&self, message: &str);

    /// A step finished successfully
    fn success(&self, message: &str);

    /// A recoverable problem (unparseable URL, skipped example, ...)
    fn warn(&self, message: &str);
}

/// Discards every message
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLog;

impl ConversionLog for SilentLog {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

/// Collects warnings in memory
///
/// Useful when a caller wants to inspect what was recovered after a run.
#[derive(Debug, Default)]
pub struct RecordingLog {
    warnings: RefCell<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings recorded so far, in emission order
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl ConversionLog for RecordingLog {
    fn info(&self, _message: &str) {}
    fn success(&self, _message: &str) {}

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}
