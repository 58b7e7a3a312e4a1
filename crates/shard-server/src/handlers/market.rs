//! `GET /auctionhouse` and `GET /guild` (`spec.md` §2 Non-goals: "Prediction
//! markets, guild vaults, and auction-house on-chain contracts: their
//! business logic lives in smart contracts; the shard stores only the
//! event-sourced cache"). These handlers are thin reads over that cache;
//! they never mutate listings or membership.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::error::ShardError;
use crate::state::AppState;

fn auctionhouse_key() -> &'static str {
    "cache:auctionhouse:listings"
}

fn guild_key(guild_id: &str) -> String {
    format!("cache:guild:{guild_id}")
}

/// `GET /auctionhouse`
///
/// The last auction-house listing snapshot ingested from the on-chain
/// contract's events. Empty until an external ingestion process has
/// populated the cache.
///
/// # Errors
///
/// Never fails.
pub async fn auctionhouse(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ShardError> {
    let cached: Option<serde_json::Value> = state.persistence.get(auctionhouse_key()).await?;
    Ok(Json(cached.unwrap_or_else(|| serde_json::json!({"listings": []}))))
}

/// `GET /guild/:guild_id`
///
/// The last guild-vault/roster snapshot ingested from the on-chain
/// contract's events for `guild_id`.
///
/// # Errors
///
/// Returns [`ShardError::NotFound`] if no snapshot has ever been cached
/// for this guild.
pub async fn guild(
    State(state): State<Arc<AppState>>,
    Path(guild_id): Path<String>,
) -> Result<Json<serde_json::Value>, ShardError> {
    let cached: Option<serde_json::Value> = state.persistence.get(&guild_key(&guild_id)).await?;
    cached.map(Json).ok_or_else(|| ShardError::NotFound(format!("no cached snapshot for guild {guild_id}")))
}
