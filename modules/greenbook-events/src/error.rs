use thiserror::Error;

use crate::registry::PropertyKind;

/// Everything that can go wrong inside the event subsystem.
///
/// None of these are ever raised to the publisher; they are captured to the
/// [`ErrorReporter`](crate::report::ErrorReporter) and logged. The worst
/// case is a dropped side effect.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("cannot publish event '{name}' without an event definition")]
    UnknownEvent { name: String },

    #[error("cannot publish event '{event}' with required property '{property}' missing or null")]
    MissingRequiredProperty { event: String, property: String },

    #[error(
        "invalid value for property '{property}' of event '{event}': expected {expected}, got {actual}"
    )]
    TypeMismatch {
        event: String,
        property: String,
        expected: PropertyKind,
        actual: &'static str,
    },

    #[error("handler '{handler}' failed for event '{event}': {source}")]
    HandlerExecution {
        event: String,
        handler: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl EventError {
    /// Stable discriminant string, used by reporters for grouping.
    pub fn kind(&self) -> &'static str {
        match self {
            EventError::UnknownEvent { .. } => "unknown_event",
            EventError::MissingRequiredProperty { .. } => "missing_required_property",
            EventError::TypeMismatch { .. } => "type_mismatch",
            EventError::HandlerExecution { .. } => "handler_execution",
        }
    }
}
