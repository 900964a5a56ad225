//! `PgStore` — plain-SQL lookups over the production tables.
//!
//! Column names follow the existing schema: the ORM that owns the tables
//! spells several of them in camelCase, so those are quoted here.

use async_trait::async_trait;
use sqlx::PgPool;

use greenbook_common::types::{ContactPreferences, ReviewRecord, UserRecord};
use greenbook_events::services::{ContactPreferenceStore, ReviewStore, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: i32) -> anyhow::Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, (i32, String, String, bool, String, String)>(
            r#"
            SELECT id, full_name, email, verified, country_code, locale
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, full_name, email, verified, country_code, locale)| UserRecord {
                id,
                full_name,
                email,
                verified,
                country_code,
                locale,
            },
        ))
    }
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn get_review(&self, id: i32) -> anyhow::Result<Option<ReviewRecord>> {
        let row = sqlx::query_as::<_, (i32, String, bool, bool, Option<String>, i32, i32, i32, String)>(
            r#"
            SELECT id, description, "isAnonymous", "isFlagged", color,
                   "likeCount", "userId", "placeId", place_name
            FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(
                id,
                description,
                is_anonymous,
                is_flagged,
                color,
                like_count,
                user_id,
                place_id,
                place_name,
            )| ReviewRecord {
                id,
                description,
                is_anonymous,
                is_flagged,
                color,
                like_count,
                user_id,
                place_id,
                place_name,
            },
        ))
    }
}

#[async_trait]
impl ContactPreferenceStore for PgStore {
    async fn get_contact_preferences(
        &self,
        user_id: i32,
    ) -> anyhow::Result<Option<ContactPreferences>> {
        let row = sqlx::query_as::<_, (i32, bool)>(
            r#"
            SELECT "userId", email_contact_consent
            FROM contact_preferences
            WHERE "userId" = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(user_id, email_contact_consent)| ContactPreferences {
            user_id,
            email_contact_consent,
        }))
    }
}
