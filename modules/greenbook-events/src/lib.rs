//! In-process event bus for The Green Book Project's backend.
//!
//! Request handlers publish named events with JSON payloads; the bus
//! validates them against a static registry and fans each one out to the
//! handlers registered for that name, each as its own detached task.
//! Side effects (mailing-list uploads) stay out of the request path, and a
//! malformed or failing event can never crash it.
//!
//! Intentionally not a durable queue: no persistence, no retry, no
//! cross-process delivery.
//!
//! ```no_run
//! use std::sync::Arc;
//! use greenbook_events::{registry::names, EventBus, EventRegistry, LogReporter};
//! use serde_json::json;
//!
//! # fn wire(table: Vec<greenbook_events::HandlerRegistration>) {
//! let bus = EventBus::new(EventRegistry::green_book(), Arc::new(LogReporter));
//! bus.register_handlers(table);
//!
//! let properties = json!({
//!     "id": 1, "type": "review", "userId": 7, "reviewId": 42
//! });
//! bus.publish(names::LIKE_CREATED, properties.as_object().unwrap().clone());
//! # }
//! ```

pub mod bus;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod report;
pub mod services;

pub use bus::{EventBus, EventHandler, EventMetadata, EventProperties, HandlerRegistration};
pub use error::EventError;
pub use registry::{EventDefinition, EventRegistry, PropertyKind, PropertySpec};
pub use report::{ErrorReporter, LogReporter, NoopReporter};
