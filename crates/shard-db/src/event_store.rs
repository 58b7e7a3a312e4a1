//! Event store operations for batch-inserting domain events.
//!
//! Events are the durable source of truth for the shard's history. Every
//! significant state change (spawn, death, craft, trade, ledger anomaly, …)
//! produces an immutable row in the `events` table.

use chrono::{DateTime, Utc};
use shard_types::EventType;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Default batch size for event inserts.
const DEFAULT_BATCH_SIZE: usize = 100;

/// A domain event pending insertion, built by the zone tick or action
/// pipeline before being handed to [`EventStore::batch_insert`].
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// The tick this event occurred on.
    pub tick: u64,
    /// The event category.
    pub event_type: EventType,
    /// The entity primarily involved, if any.
    pub entity_id: Option<Uuid>,
    /// The zone this event occurred in, if any.
    pub zone_id: Option<Uuid>,
    /// Type-specific payload.
    pub details: serde_json::Value,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewEvent {
    /// Build an event for the current tick with an empty details payload.
    #[must_use]
    pub fn new(tick: u64, event_type: EventType, created_at: DateTime<Utc>) -> Self {
        Self { tick, event_type, entity_id: None, zone_id: None, details: serde_json::Value::Null, created_at }
    }

    /// Attach the entity primarily involved in this event.
    #[must_use]
    pub const fn with_entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach the zone this event occurred in.
    #[must_use]
    pub const fn with_zone(mut self, zone_id: Uuid) -> Self {
        self.zone_id = Some(zone_id);
        self
    }

    /// Attach a type-specific details payload.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Operations on the `events` table.
pub struct EventStore<'a> {
    pool: &'a PgPool,
    batch_size: usize,
}

impl<'a> EventStore<'a> {
    /// Create a new event store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool, batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Set the batch size for inserts.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Batch-insert events into the `events` table.
    ///
    /// Events are inserted in batches of configurable size for efficiency.
    /// Each batch is wrapped in a transaction so either all events in the
    /// batch are committed or none are.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn batch_insert(&self, events: &[NewEvent]) -> Result<(), DbError> {
        if events.is_empty() {
            return Ok(());
        }

        for chunk in events.chunks(self.batch_size) {
            let mut tx = self.pool.begin().await?;

            for event in chunk {
                sqlx::query(
                    r"INSERT INTO events (tick, event_type, entity_id, zone_id, details, created_at)
                      VALUES ($1, $2::event_type, $3, $4, $5, $6)",
                )
                .bind(i64::try_from(event.tick).unwrap_or(i64::MAX))
                .bind(event_type_to_db(event.event_type))
                .bind(event.entity_id)
                .bind(event.zone_id)
                .bind(&event.details)
                .bind(event.created_at)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
        }

        tracing::debug!(count = events.len(), "inserted events");
        Ok(())
    }

    /// Query events for a specific tick.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_events_by_tick(&self, tick: u64) -> Result<Vec<EventRow>, DbError> {
        let tick_i64 = i64::try_from(tick).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, tick, event_type::TEXT as event_type, entity_id, zone_id, details, created_at
              FROM events
              WHERE tick = $1
              ORDER BY id",
        )
        .bind(tick_i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Query events for a specific entity within a tick range.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_events_by_entity(
        &self,
        entity_id: Uuid,
        from_tick: u64,
        to_tick: u64,
    ) -> Result<Vec<EventRow>, DbError> {
        let from_i64 = i64::try_from(from_tick).unwrap_or(i64::MAX);
        let to_i64 = i64::try_from(to_tick).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, EventRow>(
            r"SELECT id, tick, event_type::TEXT as event_type, entity_id, zone_id, details, created_at
              FROM events
              WHERE entity_id = $1 AND tick >= $2 AND tick < $3
              ORDER BY tick, id",
        )
        .bind(entity_id)
        .bind(from_i64)
        .bind(to_i64)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

/// A row from the `events` table.
///
/// Uses runtime types rather than compile-time checked types to avoid
/// requiring a live database during builds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Auto-incremented event ID.
    pub id: i64,
    /// The tick when this event occurred.
    pub tick: i64,
    /// Event type as a string (cast from the `PostgreSQL` enum).
    pub event_type: String,
    /// Primary entity involved, if any.
    pub entity_id: Option<Uuid>,
    /// Zone where the event occurred, if any.
    pub zone_id: Option<Uuid>,
    /// Type-specific payload.
    pub details: serde_json::Value,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

/// Convert an [`EventType`] enum variant to its `PostgreSQL` enum string.
const fn event_type_to_db(et: EventType) -> &'static str {
    match et {
        EventType::TickStart => "tick_start",
        EventType::TickEnd => "tick_end",
        EventType::EntitySpawned => "entity_spawned",
        EventType::EntityLoggedOut => "entity_logged_out",
        EventType::EntityDied => "entity_died",
        EventType::ActionSubmitted => "action_submitted",
        EventType::ActionSucceeded => "action_succeeded",
        EventType::ActionRejected => "action_rejected",
        EventType::NodeDepleted => "node_depleted",
        EventType::NodeRespawned => "node_respawned",
        EventType::TechniqueUsed => "technique_used",
        EventType::CooldownExpired => "cooldown_expired",
        EventType::EffectApplied => "effect_applied",
        EventType::EffectExpired => "effect_expired",
        EventType::LevelUp => "level_up",
        EventType::SignatureTechniqueUnlocked => "signature_technique_unlocked",
        EventType::ItemCrafted => "item_crafted",
        EventType::CraftStuck => "craft_stuck",
        EventType::TradeCompleted => "trade_completed",
        EventType::TradeFailed => "trade_failed",
        EventType::MerchantPriceUpdated => "merchant_price_updated",
        EventType::MerchantRestocked => "merchant_restocked",
        EventType::MerchantAnnouncement => "merchant_announcement",
        EventType::LedgerReconciled => "ledger_reconciled",
        EventType::LedgerAnomaly => "ledger_anomaly",
        EventType::AuctionHouseEvent => "auction_house_event",
    }
}
