//! `like:created` → upload the liked review's author to the liked-reviews
//! mailing list.
//!
//! No mail is sent here. The provider's automation on that list decides
//! whether and how often to notify, which keeps send-frequency control and
//! analytics in one place.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::bus::{EventHandler, EventMetadata, EventProperties};
use crate::handlers::require_number;
use crate::services::{
    ContactPreferenceStore, MailingContact, MailingContacts, ReviewStore, UserStore,
};

const LIKED_REVIEWS_MAILING_LIST: &str = "7c3f2a8e-5b21-4f0d-9e47-3d1b8c6a5e90";

pub struct SendLikeEmail {
    reviews: Arc<dyn ReviewStore>,
    users: Arc<dyn UserStore>,
    preferences: Arc<dyn ContactPreferenceStore>,
    contacts: Arc<dyn MailingContacts>,
}

impl SendLikeEmail {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        users: Arc<dyn UserStore>,
        preferences: Arc<dyn ContactPreferenceStore>,
        contacts: Arc<dyn MailingContacts>,
    ) -> Self {
        Self {
            reviews,
            users,
            preferences,
            contacts,
        }
    }
}

#[async_trait]
impl EventHandler for SendLikeEmail {
    fn name(&self) -> &'static str {
        "send_like_email"
    }

    async fn handle(
        &self,
        properties: EventProperties,
        metadata: EventMetadata,
    ) -> anyhow::Result<()> {
        info!(event_id = %metadata.id, event = %metadata.name, "starting like email handler");

        let review_id = require_number(&properties, "reviewId")? as i32;

        let review = self
            .reviews
            .get_review(review_id)
            .await?
            .ok_or_else(|| anyhow!("cannot upload contact for missing review {review_id}"))?;

        let author = self
            .users
            .get_user(review.user_id)
            .await?
            .ok_or_else(|| anyhow!("cannot upload contact for missing user {}", review.user_id))?;

        // Only explicit consent proceeds; a missing preference row is a no.
        match self.preferences.get_contact_preferences(author.id).await? {
            Some(preferences) if preferences.email_contact_consent => {}
            _ => {
                warn!(
                    event_id = %metadata.id,
                    user_id = author.id,
                    "contact not uploaded, no email contact consent"
                );
                return Ok(());
            }
        }

        let job = self
            .contacts
            .upsert_contact(MailingContact {
                email: author.email.clone(),
                first_name: author.first_name().to_string(),
                mailing_list_id: LIKED_REVIEWS_MAILING_LIST.to_string(),
                custom_fields: None,
            })
            .await?;

        info!(
            event_id = %metadata.id,
            status = job.status_code,
            job_id = %job.job_id,
            "contact uploaded to liked reviews list"
        );

        Ok(())
    }
}
