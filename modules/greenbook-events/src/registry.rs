//! Event definitions — the single source of truth for what events exist
//! and what shape their payloads must have.
//!
//! Definitions are fixed at process start; the registry has no mutation
//! operations after construction.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Payload property key exempt from strict type checking. Carries
/// provider-specific custom field data whose shape we don't own.
pub const CUSTOM_FIELDS_KEY: &str = "customFields";

/// Recognized payload property kinds.
///
/// Each kind owns its own structural check against the JSON value;
/// arrays in particular are checked with `is_array`, never by object-ness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyKind {
    /// Does `value` structurally match this kind?
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PropertyKind::String => value.is_string(),
            PropertyKind::Number => value.is_number(),
            PropertyKind::Boolean => value.is_boolean(),
            PropertyKind::Object => value.is_object(),
            PropertyKind::Array => value.is_array(),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::String => "string",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
            PropertyKind::Object => "object",
            PropertyKind::Array => "array",
        };
        f.write_str(name)
    }
}

/// The kind of a JSON value, for type-mismatch messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One declared payload property.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
}

impl PropertySpec {
    pub fn required(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub fn optional(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Schema for one event: its name and declared payload properties.
#[derive(Debug, Clone)]
pub struct EventDefinition {
    pub name: &'static str,
    pub properties: Vec<PropertySpec>,
}

impl EventDefinition {
    pub fn new(name: &'static str, properties: Vec<PropertySpec>) -> Self {
        Self { name, properties }
    }
}

/// Immutable lookup from event name to its definition.
pub struct EventRegistry {
    definitions: HashMap<&'static str, EventDefinition>,
}

impl EventRegistry {
    pub fn new(definitions: Vec<EventDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().map(|d| (d.name, d)).collect(),
        }
    }

    /// The registry with every Green Book event definition.
    pub fn green_book() -> Self {
        Self::new(green_book_definitions())
    }

    pub fn find_definition(&self, name: &str) -> Option<&EventDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Event name constants. Publishers and the handler table use these
/// instead of repeating string literals.
pub mod names {
    pub const REVIEW_CREATED: &str = "review:created";
    pub const LIKE_CREATED: &str = "like:created";
    pub const ANSWER_CREATED: &str = "answer:created";
    pub const PUSH_TOKEN_CREATED: &str = "push_token:created";
    pub const MASS_PUSH_NOTIFICATION_REQUESTED: &str = "mass_push_notification:requested";
    pub const MASS_PUSH_NOTIFICATION_COMPLETED: &str = "mass_push_notification:completed";
}

/// Every event the backend publishes.
pub fn green_book_definitions() -> Vec<EventDefinition> {
    use PropertyKind::*;

    vec![
        EventDefinition::new(
            names::REVIEW_CREATED,
            vec![
                PropertySpec::required("id", Number),
                PropertySpec::required("description", String),
                PropertySpec::required("isAnonymous", Boolean),
                PropertySpec::required("isFlagged", Boolean),
                PropertySpec::required("color", String),
                PropertySpec::required("likeCount", Number),
                PropertySpec::required("userId", Number),
                PropertySpec::required("placeId", Number),
                PropertySpec::required("place_name", String),
                PropertySpec::optional(CUSTOM_FIELDS_KEY, Object),
            ],
        ),
        EventDefinition::new(
            names::LIKE_CREATED,
            vec![
                PropertySpec::required("id", Number),
                PropertySpec::required("type", String),
                PropertySpec::required("userId", Number),
                PropertySpec::required("reviewId", Number),
            ],
        ),
        EventDefinition::new(
            names::ANSWER_CREATED,
            vec![
                PropertySpec::required("id", Number),
                PropertySpec::required("description", String),
                PropertySpec::required("userId", Number),
                PropertySpec::optional("parentId", Number),
                PropertySpec::required("questionId", Number),
            ],
        ),
        EventDefinition::new(
            names::PUSH_TOKEN_CREATED,
            vec![
                PropertySpec::required("userId", Number),
                PropertySpec::required("value", String),
                PropertySpec::required("type", String),
            ],
        ),
        EventDefinition::new(
            names::MASS_PUSH_NOTIFICATION_REQUESTED,
            vec![
                PropertySpec::required("platform", String),
                PropertySpec::required("title", String),
                PropertySpec::optional("subtitle", String),
                PropertySpec::required("body", String),
                PropertySpec::required("send_time", String),
                PropertySpec::optional("data", String),
                PropertySpec::optional("is_test", Boolean),
                PropertySpec::optional("test_recipient_email", String),
            ],
        ),
        EventDefinition::new(
            names::MASS_PUSH_NOTIFICATION_COMPLETED,
            vec![
                PropertySpec::required("messageId", String),
                PropertySpec::required("tickets", Array),
            ],
        ),
    ]
}
