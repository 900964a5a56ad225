//! Error-reporting collaborator seam.
//!
//! The bus and the dispatch wrappers capture every failure here in addition
//! to logging it. Capture is fire-and-forget: reporters must not block and
//! have no way to signal failure back.

use tracing::error;

use crate::error::EventError;

/// Pluggable sink for event-subsystem failures.
pub trait ErrorReporter: Send + Sync {
    fn capture(&self, error: &EventError);
}

/// Production default: writes captured errors to the log stream.
/// Swap in a monitoring-SDK reporter where one is configured.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn capture(&self, error: &EventError) {
        error!(kind = error.kind(), error = %error, "captured event error");
    }
}

/// No-op reporter for testing.
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn capture(&self, _error: &EventError) {}
}
