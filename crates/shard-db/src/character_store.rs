//! Durable character persistence (§4.D): periodic snapshot flush of
//! [`CharacterSave`] rows and an append-only `diary_entries` table backing
//! the hot store's capped 200-entry list beyond its eviction horizon.

use shard_types::{CharacterSave, DiaryEntry};
use sqlx::PgPool;

use crate::error::DbError;

/// Operations on the `character_saves` and `diary_entries` tables.
pub struct CharacterStore<'a> {
    pool: &'a PgPool,
}

impl<'a> CharacterStore<'a> {
    /// Create a new character store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the durable snapshot for `wallet`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, or
    /// [`DbError::Serialization`] if `save` cannot be serialized.
    pub async fn upsert_save(&self, wallet: &str, save: &CharacterSave) -> Result<(), DbError> {
        let payload = serde_json::to_value(save)?;

        sqlx::query(
            r"INSERT INTO character_saves (wallet, name, level, payload, updated_at)
              VALUES ($1, $2, $3, $4, now())
              ON CONFLICT (wallet) DO UPDATE SET
                name = EXCLUDED.name,
                level = EXCLUDED.level,
                payload = EXCLUDED.payload,
                updated_at = now()",
        )
        .bind(wallet)
        .bind(&save.name)
        .bind(i32::try_from(save.level).unwrap_or(i32::MAX))
        .bind(&payload)
        .execute(self.pool)
        .await?;

        tracing::debug!(wallet, "upserted character save");
        Ok(())
    }

    /// Load the durable snapshot for `wallet`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails, or
    /// [`DbError::Serialization`] if the stored payload fails to
    /// deserialize.
    pub async fn load_save(&self, wallet: &str) -> Result<Option<CharacterSave>, DbError> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as(r"SELECT payload FROM character_saves WHERE wallet = $1")
                .bind(wallet)
                .fetch_optional(self.pool)
                .await?;

        row.map(|(payload,)| serde_json::from_value(payload).map_err(DbError::from)).transpose()
    }

    /// Append one diary entry to the durable, append-only log.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails, or
    /// [`DbError::Serialization`] if `entry` cannot be serialized.
    pub async fn append_diary_entry(&self, wallet: &str, entry: &DiaryEntry) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO diary_entries (id, wallet, zone_id, x, y, action, headline, narrative, details, created_at)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(entry.id)
        .bind(wallet)
        .bind(entry.zone_id.into_inner())
        .bind(entry.x)
        .bind(entry.y)
        .bind(&entry.action)
        .bind(&entry.headline)
        .bind(&entry.narrative)
        .bind(&entry.details)
        .bind(entry.timestamp)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Load the most recent `limit` diary entries for `wallet`, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn recent_diary_entries(&self, wallet: &str, limit: i64) -> Result<Vec<DiaryEntryRow>, DbError> {
        let rows = sqlx::query_as::<_, DiaryEntryRow>(
            r"SELECT id, wallet, zone_id, x, y, action, headline, narrative, details, created_at
              FROM diary_entries
              WHERE wallet = $1
              ORDER BY created_at DESC
              LIMIT $2",
        )
        .bind(wallet)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

/// A row from the `diary_entries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiaryEntryRow {
    /// Entry UUID.
    pub id: uuid::Uuid,
    /// The wallet this diary entry belongs to.
    pub wallet: String,
    /// The zone the action occurred in.
    pub zone_id: uuid::Uuid,
    /// Position x at the time of the action.
    pub x: f64,
    /// Position y at the time of the action.
    pub y: f64,
    /// The action category.
    pub action: String,
    /// A short one-line summary.
    pub headline: String,
    /// A longer narrative description.
    pub narrative: String,
    /// Structured details specific to the action.
    pub details: serde_json::Value,
    /// Real-world timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
}
