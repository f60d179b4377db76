//! Caller-supplied warning sink.
//!
//! Strategies never talk to a UI directly. Non-fatal conditions (dropped
//! tabs, skipped degenerate geometry) are pushed here and mirrored to the
//! tracing log; the caller decides what to show.

use std::fmt;

/// One non-fatal condition raised while generating toolpaths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Accumulates warnings for one engine invocation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to the log.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(Warning { message });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drain accumulated warnings, leaving the sink empty.
    pub fn take(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
