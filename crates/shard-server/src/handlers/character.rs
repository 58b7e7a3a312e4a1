//! Character save and diary endpoints: `GET /character`, `PUT /character`,
//! `GET /diary` (`spec.md` §4.D hot persistence).

use std::sync::Arc;

use axum::extract::State;
use axum::http::Extensions;
use axum::Json;
use shard_types::{CharacterSave, DiaryEntry, BOUNDED_LIST_CAP};

use crate::error::ShardError;
use crate::handlers::authenticated_wallet;
use crate::state::AppState;

fn character_key(wallet: &str) -> String {
    format!("wallet:{wallet}:character")
}

fn diary_key(wallet: &str) -> String {
    format!("wallet:{wallet}:diary")
}

/// `GET /character`
///
/// Returns the authenticated wallet's saved character, if any.
///
/// # Errors
///
/// Returns [`ShardError::NotFound`] if no save exists.
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
) -> Result<Json<CharacterSave>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let save: Option<CharacterSave> = state.persistence.get(&character_key(&wallet)).await?;
    save.map(Json).ok_or_else(|| ShardError::NotFound(format!("no saved character for {wallet}")))
}

/// `PUT /character`
///
/// Overwrites the authenticated wallet's saved character. Intended for
/// operator/admin tooling and test fixtures; normal play persists saves
/// via `POST /logout`.
///
/// # Errors
///
/// Never fails beyond persistence-layer errors.
pub async fn put_character(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<CharacterSave>,
) -> Result<Json<serde_json::Value>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    state.persistence.set(&character_key(&wallet), &body).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// `GET /diary`
///
/// Returns the authenticated wallet's diary entries, oldest first,
/// capped at [`BOUNDED_LIST_CAP`] entries.
///
/// # Errors
///
/// Never fails beyond persistence-layer errors.
pub async fn diary(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
) -> Result<Json<Vec<DiaryEntry>>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let entries: Vec<DiaryEntry> = state.persistence.get_list(&diary_key(&wallet)).await?;
    Ok(Json(entries))
}

/// Append `entry` to `wallet`'s diary, capped at [`BOUNDED_LIST_CAP`].
///
/// Shared by action handlers that narrate notable events (kills, level
/// ups, quest completions) rather than exposed as its own route.
///
/// # Errors
///
/// Returns [`ShardError::Db`] if the persistence layer rejects the write.
pub(crate) async fn push_diary_entry(state: &AppState, wallet: &str, entry: &DiaryEntry) -> Result<(), ShardError> {
    state.persistence.push_capped(&diary_key(wallet), entry, BOUNDED_LIST_CAP).await?;
    Ok(())
}
