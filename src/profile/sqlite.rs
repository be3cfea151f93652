//! SQLite profile store — one JSON document row per user.
//!
//! The production default. Each profile is a whole document in a single
//! column, written with `INSERT OR REPLACE`, which matches the
//! last-writer-wins tolerance for concurrent events from the same user.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::warn;

use super::{ProfileStore, StoreError, UserProfile};

/// sqlx-backed store keyed by `user_id`.
pub struct SqliteProfileStore {
    db: SqlitePool,
}

impl SqliteProfileStore {
    /// Open (creating if needed) the database at `path` and ensure the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database cannot be opened
    /// or the schema cannot be created.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite://{path}?mode=rwc")).await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool (tests use `sqlite::memory:` pools).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the schema cannot be created.
    pub async fn with_pool(db: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS profiles (\
                 user_id TEXT PRIMARY KEY, \
                 document TEXT NOT NULL, \
                 updated_at TEXT NOT NULL DEFAULT (datetime('now'))\
             )",
        )
        .execute(&db)
        .await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT document FROM profiles WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        let Some((document,)) = row else {
            return Ok(None);
        };
        match serde_json::from_str(&document) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!(user_id, error = %e, "malformed profile document, re-initializing");
                Ok(None)
            }
        }
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let document = serde_json::to_string(profile)?;
        sqlx::query(
            "INSERT OR REPLACE INTO profiles (user_id, document, updated_at) \
             VALUES (?1, ?2, datetime('now'))",
        )
        .bind(&profile.user_id)
        .bind(document)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
