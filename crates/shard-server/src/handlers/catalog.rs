//! Read-only catalog and leaderboard endpoints: `GET /items/catalog`,
//! `GET /techniques/catalog`, `GET /leaderboard` (`spec.md` §4.A, §4.G).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use shard_catalog::items::ItemDefinition;
use shard_types::{EntityId, Technique, ZoneId};

use crate::error::ShardError;
use crate::state::AppState;

/// `GET /items/catalog`
///
/// Every item definition authored in the static catalog.
///
/// # Errors
///
/// Never fails.
pub async fn items_catalog(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ItemDefinition>>, ShardError> {
    Ok(Json(state.catalog.all_items().cloned().collect()))
}

/// `GET /techniques/catalog`
///
/// Every statically authored technique. Per-wallet generated
/// signature/ultimate techniques are not listed here; a player learns
/// theirs via level-up, not by browsing a shared catalog.
///
/// # Errors
///
/// Never fails.
pub async fn techniques_catalog(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Technique>>, ShardError> {
    Ok(Json(state.catalog.all_techniques().cloned().collect()))
}

/// One row of the kill-count leaderboard.
#[derive(Debug, serde::Serialize)]
pub struct LeaderboardRow {
    /// The ranked entity.
    pub entity_id: EntityId,
    /// The zone it currently occupies.
    pub zone_id: ZoneId,
    /// Display name.
    pub name: String,
    /// Character level.
    pub level: u32,
    /// Lifetime kill count.
    pub kills: u32,
}

/// Number of rows returned by `GET /leaderboard`.
const LEADERBOARD_SIZE: usize = 20;

/// `GET /leaderboard`
///
/// The top players currently online, ranked by kill count then level,
/// across every instantiated zone.
///
/// # Errors
///
/// Never fails.
pub async fn leaderboard(State(state): State<Arc<AppState>>) -> Result<Json<Vec<LeaderboardRow>>, ShardError> {
    let world = state.world.lock().await;
    let mut rows = Vec::new();
    for zone_id in world.zone_ids() {
        let Ok(zone) = world.zone(zone_id) else { continue };
        for entity in zone.entities() {
            if entity.wallet_address.is_none() {
                continue;
            }
            rows.push(LeaderboardRow {
                entity_id: entity.id,
                zone_id,
                name: entity.name.clone(),
                level: entity.level.unwrap_or(1),
                kills: entity.kills.unwrap_or(0),
            });
        }
    }
    rows.sort_by(|a, b| b.kills.cmp(&a.kills).then(b.level.cmp(&a.level)));
    rows.truncate(LEADERBOARD_SIZE);
    Ok(Json(rows))
}
