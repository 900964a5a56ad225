pub mod error;
pub mod types;

pub use error::{Result, SendgridError};
pub use types::{Contact, ContactUpsert, ContactUpsertResponse, UpsertJob};

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.sendgrid.com";

pub struct SendgridClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SendgridClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (mock server in tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Add or update marketing contacts via `PUT /v3/marketing/contacts`.
    ///
    /// SendGrid processes the upsert asynchronously; a success response means
    /// the contacts were queued on the returned job, not yet imported.
    pub async fn upsert_contacts(&self, request: &ContactUpsert) -> Result<UpsertJob> {
        let endpoint = format!("{}/v3/marketing/contacts", self.base_url);

        let resp = self
            .client
            .put(&endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SendgridError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ContactUpsertResponse = serde_json::from_str(&resp.text().await?)?;

        Ok(UpsertJob {
            status_code: status.as_u16(),
            job_id: body.job_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_serializes_without_empty_optionals() {
        let contact = Contact {
            email: "ada@example.com".into(),
            first_name: None,
            custom_fields: None,
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value, json!({"email": "ada@example.com"}));
    }

    #[test]
    fn upsert_body_shape() {
        let mut custom_fields = serde_json::Map::new();
        custom_fields.insert("e2_N".into(), json!(42));

        let request = ContactUpsert {
            list_ids: vec!["list-1".into()],
            contacts: vec![Contact {
                email: "ada@example.com".into(),
                first_name: Some("Ada".into()),
                custom_fields: Some(custom_fields),
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["list_ids"][0], "list-1");
        assert_eq!(value["contacts"][0]["first_name"], "Ada");
        assert_eq!(value["contacts"][0]["custom_fields"]["e2_N"], 42);
    }
}
