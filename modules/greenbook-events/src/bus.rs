//! The event bus: validates payloads against the registry and dispatches
//! to registered handlers.
//!
//! ## Architecture
//! ```text
//! Publishers (request path):          Handlers (side effects):
//!   review mutation ──┐                 ┌──► share-link upload
//!   like mutation   ──┼──► EventBus ────┼──► like-email upload
//!   ...             ──┘   (validate,    └──► ...
//!                          spawn per
//!                          handler)
//! ```
//!
//! ## Rules
//! - **Fire-and-forget publish**: `publish` never returns an error to the
//!   caller. A malformed event is captured and logged, never dispatched,
//!   and never crashes the request path that triggered it.
//! - **Detached dispatch**: each handler invocation is spawned as its own
//!   tokio task. Handlers for one event start in registration order but
//!   complete in any order; the bus does not await, aggregate, or
//!   propagate their outcomes.
//! - **No durability**: events exist only for the duration of dispatch.
//!   This is an in-process notification mechanism, not a queue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::EventError;
use crate::registry::{value_kind, EventRegistry, PropertyKind, CUSTOM_FIELDS_KEY};
use crate::report::ErrorReporter;

/// Payload supplied by the publisher: property name → JSON value.
pub type EventProperties = serde_json::Map<String, serde_json::Value>;

/// Per-publish metadata passed to every handler alongside the payload.
#[derive(Debug, Clone, Serialize)]
pub struct EventMetadata {
    pub id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// A unit reacting to one event name.
///
/// Handlers get their own copy of the payload and metadata, must not assume
/// anything about sibling handlers, and get at most one attempt per
/// dispatch. A returned error is reported with the event id and goes no
/// further.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Short identifier used in logs and error reports.
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        properties: EventProperties,
        metadata: EventMetadata,
    ) -> anyhow::Result<()>;
}

/// One entry of the handler registration table.
pub struct HandlerRegistration {
    pub event: &'static str,
    pub handler: Arc<dyn EventHandler>,
}

/// Validates and dispatches events. One instance per process.
///
/// `publish` must be called from within a tokio runtime; handler
/// invocations are spawned onto it.
pub struct EventBus {
    registry: EventRegistry,
    reporter: Arc<dyn ErrorReporter>,
    listeners: RwLock<HashMap<&'static str, Vec<Arc<dyn EventHandler>>>>,
    registered: AtomicBool,
}

impl EventBus {
    pub fn new(registry: EventRegistry, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            registry,
            reporter,
            listeners: RwLock::new(HashMap::new()),
            registered: AtomicBool::new(false),
        }
    }

    /// Register the handler table. Idempotent: only the first call takes
    /// effect, later calls log and return. Within an event name, dispatch
    /// order is registration order.
    ///
    /// Call once at startup, before any `publish`.
    pub fn register_handlers(&self, table: Vec<HandlerRegistration>) {
        if self.registered.swap(true, Ordering::SeqCst) {
            info!("event handlers already registered, ignoring repeated registration");
            return;
        }

        let mut listeners = self.listeners.write().expect("listener map lock poisoned");
        let count = table.len();
        for registration in table {
            listeners
                .entry(registration.event)
                .or_default()
                .push(registration.handler);
        }

        info!(handlers = count, "event handlers registered");
    }

    /// Validate and dispatch an event.
    ///
    /// Never raises to the caller. Validation failures are captured to the
    /// error reporter and logged with the generated event id; on success
    /// every handler registered for `name` is spawned with its own copy of
    /// the payload and metadata.
    pub fn publish(&self, name: &str, properties: EventProperties) {
        let event_id = Uuid::new_v4();
        info!(event_id = %event_id, event = name, "publishing event");

        if let Err(event_error) = self.validate(name, &properties) {
            error!(event_id = %event_id, error = %event_error, "event rejected");
            self.reporter.capture(&event_error);
            return;
        }

        let metadata = EventMetadata {
            id: event_id,
            name: name.to_string(),
            timestamp: Utc::now(),
        };

        self.dispatch(properties, metadata);
    }

    fn validate(&self, name: &str, properties: &EventProperties) -> Result<(), EventError> {
        let definition =
            self.registry
                .find_definition(name)
                .ok_or_else(|| EventError::UnknownEvent {
                    name: name.to_string(),
                })?;

        for spec in &definition.properties {
            // Absent and explicit null are the same thing to publishers.
            let value = properties.get(spec.name).filter(|v| !v.is_null());

            let Some(value) = value else {
                if spec.required {
                    return Err(EventError::MissingRequiredProperty {
                        event: name.to_string(),
                        property: spec.name.to_string(),
                    });
                }
                continue;
            };

            // Arrays are checked structurally, independent of the kind
            // comparison below and with no exemption.
            if spec.kind == PropertyKind::Array {
                if !value.is_array() {
                    return Err(EventError::TypeMismatch {
                        event: name.to_string(),
                        property: spec.name.to_string(),
                        expected: spec.kind,
                        actual: value_kind(value),
                    });
                }
                continue;
            }

            if spec.name == CUSTOM_FIELDS_KEY {
                continue;
            }

            if !spec.kind.matches(value) {
                return Err(EventError::TypeMismatch {
                    event: name.to_string(),
                    property: spec.name.to_string(),
                    expected: spec.kind,
                    actual: value_kind(value),
                });
            }
        }

        Ok(())
    }

    fn dispatch(&self, properties: EventProperties, metadata: EventMetadata) {
        let listeners = self.listeners.read().expect("listener map lock poisoned");

        let Some(handlers) = listeners.get(metadata.name.as_str()) else {
            info!(event_id = %metadata.id, event = %metadata.name, "no handlers registered for event");
            return;
        };

        for handler in handlers {
            let handler = Arc::clone(handler);
            let reporter = Arc::clone(&self.reporter);
            let properties = properties.clone();
            let metadata = metadata.clone();

            tokio::spawn(async move {
                if let Err(source) = handler.handle(properties, metadata.clone()).await {
                    let event_error = EventError::HandlerExecution {
                        event: metadata.name.clone(),
                        handler: handler.name(),
                        source,
                    };
                    error!(
                        event_id = %metadata.id,
                        handler = handler.name(),
                        error = %event_error,
                        "event handler failed"
                    );
                    reporter.capture(&event_error);
                }
            });
        }
    }
}
