//! Collaborator traits the handlers depend on.
//!
//! Handlers never touch the database or the mail provider directly; they
//! go through these seams so tests can substitute recording doubles and so
//! the subsystem stays ignorant of storage and transport details.

use async_trait::async_trait;

use greenbook_common::types::{ContactPreferences, ReviewRecord, UserRecord};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> anyhow::Result<Option<UserRecord>>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn get_review(&self, id: i32) -> anyhow::Result<Option<ReviewRecord>>;
}

#[async_trait]
pub trait ContactPreferenceStore: Send + Sync {
    async fn get_contact_preferences(
        &self,
        user_id: i32,
    ) -> anyhow::Result<Option<ContactPreferences>>;
}

/// A contact to add or update on a mailing list.
#[derive(Debug, Clone)]
pub struct MailingContact {
    pub email: String,
    pub first_name: String,
    pub mailing_list_id: String,
    /// Provider custom-field id → value.
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Outcome of an accepted contact upload.
#[derive(Debug, Clone)]
pub struct ContactJob {
    pub status_code: u16,
    pub job_id: String,
}

/// Mailing-list side of the mail provider.
#[async_trait]
pub trait MailingContacts: Send + Sync {
    async fn upsert_contact(&self, contact: MailingContact) -> anyhow::Result<ContactJob>;
}

#[async_trait]
impl MailingContacts for sendgrid::SendgridClient {
    async fn upsert_contact(&self, contact: MailingContact) -> anyhow::Result<ContactJob> {
        let request = sendgrid::ContactUpsert {
            list_ids: vec![contact.mailing_list_id],
            contacts: vec![sendgrid::Contact {
                email: contact.email,
                first_name: Some(contact.first_name),
                custom_fields: contact.custom_fields,
            }],
        };

        let job = self.upsert_contacts(&request).await?;

        Ok(ContactJob {
            status_code: job.status_code,
            job_id: job.job_id,
        })
    }
}
