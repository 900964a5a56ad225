use serde::{Deserialize, Serialize};

/// Body of `PUT /v3/marketing/contacts`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactUpsert {
    pub list_ids: Vec<String>,
    pub contacts: Vec<Contact>,
}

/// A single contact in an upsert request.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Keyed by SendGrid custom-field id, not field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactUpsertResponse {
    pub job_id: String,
}

/// Outcome of an accepted upsert: the HTTP status plus the async
/// import job SendGrid queues the contacts on.
#[derive(Debug, Clone)]
pub struct UpsertJob {
    pub status_code: u16,
    pub job_id: String,
}
