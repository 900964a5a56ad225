//! Read-side record types shared across the backend.
//!
//! Field names follow the production schema. Columns the ORM spells in
//! camelCase (`isAnonymous`, `likeCount`) map to snake_case here; the store
//! layer owns the translation.

use serde::{Deserialize, Serialize};

/// A registered user, as read from the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub verified: bool,
    pub country_code: String,
    pub locale: String,
}

impl UserRecord {
    /// First whitespace-separated token of the full name.
    /// Mail templates address the user by first name only.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.full_name)
    }
}

/// A place review, as read from the `reviews` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: i32,
    pub description: String,
    pub is_anonymous: bool,
    pub is_flagged: bool,
    pub color: Option<String>,
    pub like_count: i32,
    pub user_id: i32,
    pub place_id: i32,
    pub place_name: String,
}

/// A user's contact-consent row. Absence of a row means no consent was
/// ever recorded, which callers must treat the same as explicit refusal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactPreferences {
    pub user_id: i32,
    pub email_contact_consent: bool,
}
