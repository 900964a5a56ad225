//! Handler behavior against stub collaborators: consent gating, missing
//! entities, contact payload shape.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use greenbook_common::types::{ContactPreferences, ReviewRecord, UserRecord};
use greenbook_common::{Config, Environment};
use greenbook_events::handlers::{SendLikeEmail, SendShareLink};
use greenbook_events::registry::names;
use greenbook_events::services::{
    ContactJob, ContactPreferenceStore, MailingContact, MailingContacts, ReviewStore, UserStore,
};
use greenbook_events::{EventHandler, EventMetadata, EventProperties};
use serde_json::json;

// =========================================================================
// Stub collaborators
// =========================================================================

struct StubUsers(HashMap<i32, UserRecord>);

#[async_trait]
impl UserStore for StubUsers {
    async fn get_user(&self, id: i32) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.0.get(&id).cloned())
    }
}

struct StubReviews(HashMap<i32, ReviewRecord>);

#[async_trait]
impl ReviewStore for StubReviews {
    async fn get_review(&self, id: i32) -> anyhow::Result<Option<ReviewRecord>> {
        Ok(self.0.get(&id).cloned())
    }
}

/// `None` models a user with no preference row at all.
struct StubPreferences(HashMap<i32, bool>);

#[async_trait]
impl ContactPreferenceStore for StubPreferences {
    async fn get_contact_preferences(
        &self,
        user_id: i32,
    ) -> anyhow::Result<Option<ContactPreferences>> {
        Ok(self.0.get(&user_id).map(|&consent| ContactPreferences {
            user_id,
            email_contact_consent: consent,
        }))
    }
}

#[derive(Default)]
struct RecordingMailer {
    calls: Mutex<Vec<MailingContact>>,
}

impl RecordingMailer {
    fn uploaded(&self) -> Vec<MailingContact> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailingContacts for RecordingMailer {
    async fn upsert_contact(&self, contact: MailingContact) -> anyhow::Result<ContactJob> {
        self.calls.lock().unwrap().push(contact);
        Ok(ContactJob {
            status_code: 202,
            job_id: "job-1".into(),
        })
    }
}

// =========================================================================
// Fixtures
// =========================================================================

fn user(id: i32, full_name: &str, email: &str) -> UserRecord {
    UserRecord {
        id,
        full_name: full_name.into(),
        email: email.into(),
        verified: true,
        country_code: "US".into(),
        locale: "en-US".into(),
    }
}

fn review(id: i32, user_id: i32) -> ReviewRecord {
    ReviewRecord {
        id,
        description: "quiet, friendly staff".into(),
        is_anonymous: false,
        is_flagged: false,
        color: Some("green".into()),
        like_count: 3,
        user_id,
        place_id: 11,
        place_name: "Joe's Diner".into(),
    }
}

fn config() -> Config {
    Config {
        database_url: String::new(),
        sendgrid_api_key: String::new(),
        web_host: "0.0.0.0".into(),
        web_port: 3000,
        environment: Environment::Production,
    }
}

fn metadata(name: &str) -> EventMetadata {
    EventMetadata {
        id: Uuid::new_v4(),
        name: name.to_string(),
        timestamp: Utc::now(),
    }
}

fn props(value: serde_json::Value) -> EventProperties {
    value.as_object().unwrap().clone()
}

fn share_link_handler(
    users: HashMap<i32, UserRecord>,
    preferences: HashMap<i32, bool>,
) -> (SendShareLink, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let handler = SendShareLink::new(
        Arc::new(StubUsers(users)),
        Arc::new(StubPreferences(preferences)),
        mailer.clone(),
        &config(),
    );
    (handler, mailer)
}

fn like_email_handler(
    reviews: HashMap<i32, ReviewRecord>,
    users: HashMap<i32, UserRecord>,
    preferences: HashMap<i32, bool>,
) -> (SendLikeEmail, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let handler = SendLikeEmail::new(
        Arc::new(StubReviews(reviews)),
        Arc::new(StubUsers(users)),
        Arc::new(StubPreferences(preferences)),
        mailer.clone(),
    );
    (handler, mailer)
}

fn review_created_props(review_id: i32, user_id: i32) -> EventProperties {
    props(json!({
        "id": review_id,
        "description": "quiet, friendly staff",
        "isAnonymous": false,
        "isFlagged": false,
        "color": "green",
        "likeCount": 0,
        "userId": user_id,
        "placeId": 11,
        "place_name": "Joe's Diner"
    }))
}

fn like_created_props(review_id: i32) -> EventProperties {
    props(json!({"id": 1, "type": "review", "userId": 99, "reviewId": review_id}))
}

// =========================================================================
// Share-link handler
// =========================================================================

#[tokio::test]
async fn share_link_uploads_creator_with_custom_fields() {
    let (handler, mailer) = share_link_handler(
        HashMap::from([(7, user(7, "Ada Lovelace", "ada@example.com"))]),
        HashMap::from([(7, true)]),
    );

    handler
        .handle(review_created_props(42, 7), metadata(names::REVIEW_CREATED))
        .await
        .unwrap();

    let uploaded = mailer.uploaded();
    assert_eq!(uploaded.len(), 1);

    let contact = &uploaded[0];
    assert_eq!(contact.email, "ada@example.com");
    assert_eq!(contact.first_name, "Ada");
    assert!(!contact.mailing_list_id.is_empty());

    let custom_fields = contact.custom_fields.as_ref().unwrap();
    assert!(custom_fields.values().any(|v| v == 42));
    assert!(custom_fields.values().any(|v| {
        v.as_str()
            .is_some_and(|s| s.contains("/review/42") && s.contains("utm_campaign"))
    }));
}

#[tokio::test]
async fn share_link_skips_user_without_preference_row() {
    let (handler, mailer) = share_link_handler(
        HashMap::from([(7, user(7, "Ada Lovelace", "ada@example.com"))]),
        HashMap::new(),
    );

    handler
        .handle(review_created_props(42, 7), metadata(names::REVIEW_CREATED))
        .await
        .unwrap();

    assert!(mailer.uploaded().is_empty());
}

#[tokio::test]
async fn share_link_skips_explicit_refusal() {
    let (handler, mailer) = share_link_handler(
        HashMap::from([(7, user(7, "Ada Lovelace", "ada@example.com"))]),
        HashMap::from([(7, false)]),
    );

    handler
        .handle(review_created_props(42, 7), metadata(names::REVIEW_CREATED))
        .await
        .unwrap();

    assert!(mailer.uploaded().is_empty());
}

#[tokio::test]
async fn share_link_errors_on_missing_user() {
    let (handler, mailer) = share_link_handler(HashMap::new(), HashMap::new());

    let result = handler
        .handle(review_created_props(42, 7), metadata(names::REVIEW_CREATED))
        .await;

    assert!(result.is_err());
    assert!(mailer.uploaded().is_empty());
}

// =========================================================================
// Like-email handler
// =========================================================================

#[tokio::test]
async fn like_email_uploads_review_author() {
    let (handler, mailer) = like_email_handler(
        HashMap::from([(42, review(42, 7))]),
        HashMap::from([(7, user(7, "Grace Hopper", "grace@example.com"))]),
        HashMap::from([(7, true)]),
    );

    handler
        .handle(like_created_props(42), metadata(names::LIKE_CREATED))
        .await
        .unwrap();

    let uploaded = mailer.uploaded();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].email, "grace@example.com");
    assert_eq!(uploaded[0].first_name, "Grace");
    assert!(uploaded[0].custom_fields.is_none());
}

#[tokio::test]
async fn like_email_errors_on_missing_review() {
    let (handler, mailer) = like_email_handler(HashMap::new(), HashMap::new(), HashMap::new());

    let result = handler
        .handle(like_created_props(42), metadata(names::LIKE_CREATED))
        .await;

    assert!(result.is_err());
    assert!(mailer.uploaded().is_empty());
}

// =========================================================================
// Full wiring: registration table → bus → handler → mailer
// =========================================================================

#[tokio::test]
async fn registration_table_wires_handlers_to_bus() {
    use greenbook_events::handlers::registrations;
    use greenbook_events::{EventBus, EventRegistry, NoopReporter};
    use std::time::Duration;

    let mailer = Arc::new(RecordingMailer::default());
    let users = Arc::new(StubUsers(HashMap::from([(
        7,
        user(7, "Ada Lovelace", "ada@example.com"),
    )])));
    let reviews = Arc::new(StubReviews(HashMap::from([(42, review(42, 7))])));
    let preferences = Arc::new(StubPreferences(HashMap::from([(7, true)])));

    let bus = EventBus::new(EventRegistry::green_book(), Arc::new(NoopReporter));
    bus.register_handlers(registrations(
        users,
        reviews,
        preferences,
        mailer.clone(),
        &config(),
    ));

    bus.publish(names::REVIEW_CREATED, review_created_props(42, 7));
    bus.publish(names::LIKE_CREATED, like_created_props(42));

    tokio::time::timeout(Duration::from_secs(2), async {
        while mailer.uploaded().len() < 2 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("handlers did not run");

    let uploaded = mailer.uploaded();
    assert_eq!(uploaded.len(), 2);
    // Both paths end at the same creator, on different lists.
    assert!(uploaded.iter().all(|c| c.email == "ada@example.com"));
    assert_ne!(uploaded[0].mailing_list_id, uploaded[1].mailing_list_id);
}

#[tokio::test]
async fn like_email_skips_author_without_consent() {
    let (handler, mailer) = like_email_handler(
        HashMap::from([(42, review(42, 7))]),
        HashMap::from([(7, user(7, "Grace Hopper", "grace@example.com"))]),
        HashMap::from([(7, false)]),
    );

    handler
        .handle(like_created_props(42), metadata(names::LIKE_CREATED))
        .await
        .unwrap();

    assert!(mailer.uploaded().is_empty());
}
