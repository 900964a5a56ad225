//! `review:created` → upload the review creator to the review-creators
//! mailing list, with a share link for their new review.
//!
//! The mail itself is sent by the provider's automation on that list; this
//! handler only uploads the contact and the custom fields the template
//! needs.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use url::Url;

use greenbook_common::{Config, Environment};

use crate::bus::{EventHandler, EventMetadata, EventProperties};
use crate::handlers::require_number;
use crate::services::{ContactPreferenceStore, MailingContacts, UserStore};

const REVIEW_CREATORS_MAILING_LIST: &str = "0db4e9d1-1a6e-4b6c-a1c5-0a6d6c2f9b3e";

// SendGrid custom-field ids on the review-creators list.
const CONTACTED_FIELD_ID: &str = "e1_T";
const REVIEW_ID_FIELD_ID: &str = "e2_N";
const SHARE_LINK_FIELD_ID: &str = "e3_T";

pub struct SendShareLink {
    users: Arc<dyn UserStore>,
    preferences: Arc<dyn ContactPreferenceStore>,
    contacts: Arc<dyn MailingContacts>,
    environment: Environment,
    web_port: u16,
}

impl SendShareLink {
    pub fn new(
        users: Arc<dyn UserStore>,
        preferences: Arc<dyn ContactPreferenceStore>,
        contacts: Arc<dyn MailingContacts>,
        config: &Config,
    ) -> Self {
        Self {
            users,
            preferences,
            contacts,
            environment: config.environment,
            web_port: config.web_port,
        }
    }
}

#[async_trait]
impl EventHandler for SendShareLink {
    fn name(&self) -> &'static str {
        "send_share_link"
    }

    async fn handle(
        &self,
        properties: EventProperties,
        metadata: EventMetadata,
    ) -> anyhow::Result<()> {
        info!(event_id = %metadata.id, event = %metadata.name, "starting share link handler");

        let review_id = require_number(&properties, "id")? as i32;
        let user_id = require_number(&properties, "userId")? as i32;

        let creator = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| anyhow!("no matching user for review {review_id} (user {user_id})"))?;

        // Only explicit consent proceeds; a missing preference row is a no.
        match self.preferences.get_contact_preferences(creator.id).await? {
            Some(preferences) if preferences.email_contact_consent => {}
            _ => {
                info!(
                    event_id = %metadata.id,
                    user_id = creator.id,
                    "contact not uploaded, no email contact consent"
                );
                return Ok(());
            }
        }

        let share_link = review_share_link(self.environment, self.web_port, review_id);

        let mut custom_fields = serde_json::Map::new();
        custom_fields.insert(CONTACTED_FIELD_ID.into(), json!("yes"));
        custom_fields.insert(REVIEW_ID_FIELD_ID.into(), json!(review_id));
        custom_fields.insert(SHARE_LINK_FIELD_ID.into(), json!(share_link.as_str()));

        let job = self
            .contacts
            .upsert_contact(crate::services::MailingContact {
                email: creator.email.clone(),
                first_name: creator.first_name().to_string(),
                mailing_list_id: REVIEW_CREATORS_MAILING_LIST.to_string(),
                custom_fields: Some(custom_fields),
            })
            .await?;

        info!(
            event_id = %metadata.id,
            status = job.status_code,
            job_id = %job.job_id,
            "contact uploaded to review creators list"
        );

        Ok(())
    }
}

/// Share link for a review, pointing at the public site in production and
/// the local server otherwise. Tagged for the review-creator mail campaign.
fn review_share_link(environment: Environment, port: u16, review_id: i32) -> Url {
    let base = match environment {
        Environment::Production => {
            format!("https://www.thegreenbookproject.io/review/{review_id}")
        }
        Environment::Development => format!("http://localhost:{port}/review/{review_id}"),
    };

    let mut url = Url::parse(&base).expect("share link base is well-formed");
    url.query_pairs_mut()
        .append_pair("utm_source", "sendgrid")
        .append_pair("utm_medium", "email")
        .append_pair("utm_campaign", "review_creator_journey");

    url
}
