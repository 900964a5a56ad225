//! Event handlers and the process-wide registration table.

pub mod like_created;
pub mod review_created;

pub use like_created::SendLikeEmail;
pub use review_created::SendShareLink;

use std::sync::Arc;

use anyhow::anyhow;
use greenbook_common::Config;

use crate::bus::{EventProperties, HandlerRegistration};
use crate::registry::names;
use crate::services::{ContactPreferenceStore, MailingContacts, ReviewStore, UserStore};

/// The handler registration table, built once at startup and fed to
/// [`EventBus::register_handlers`](crate::bus::EventBus::register_handlers).
///
/// Dispatch order within an event name follows the order here.
pub fn registrations(
    users: Arc<dyn UserStore>,
    reviews: Arc<dyn ReviewStore>,
    preferences: Arc<dyn ContactPreferenceStore>,
    contacts: Arc<dyn MailingContacts>,
    config: &Config,
) -> Vec<HandlerRegistration> {
    vec![
        HandlerRegistration {
            event: names::REVIEW_CREATED,
            handler: Arc::new(SendShareLink::new(
                Arc::clone(&users),
                Arc::clone(&preferences),
                Arc::clone(&contacts),
                config,
            )),
        },
        HandlerRegistration {
            event: names::LIKE_CREATED,
            handler: Arc::new(SendLikeEmail::new(reviews, users, preferences, contacts)),
        },
    ]
}

/// Pull an integer property out of a payload the bus already validated.
pub(crate) fn require_number(properties: &EventProperties, key: &str) -> anyhow::Result<i64> {
    properties
        .get(key)
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| anyhow!("event payload missing numeric property '{key}'"))
}
