//! HTTP handlers for the shard's player-facing surface (`spec.md` §4.K).
//!
//! Split by resource the way the teacher splits `handlers.rs` into one
//! function per route group, but across several files since this surface
//! is much wider than the teacher's four read-only endpoints.

pub mod agent;
pub mod catalog;
pub mod character;
pub mod command;
pub mod market;
pub mod party;
pub mod spawn;
pub mod state_query;

use axum::extract::State;
use axum::response::IntoResponse;
use std::sync::Arc;

use shard_types::Entity;

use crate::auth::AuthenticatedWallet;
use crate::error::ShardError;
use crate::state::AppState;

/// Minimal HTML status page at `GET /`.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let zones = state.world.lock().await.zone_ids().count();
    axum::response::Html(format!(
        "<html><body><h1>shard-server</h1><p>{zones} zone(s) instantiated.</p></body></html>"
    ))
}

/// Confirm `wallet` owns `entity` before a mutating handler proceeds
/// (`spec.md` §4.F: "All authenticated actions require... the wallet owns
/// the target entity").
pub(crate) fn require_ownership(entity: &Entity, wallet: &str) -> Result<(), ShardError> {
    match entity.wallet_address.as_deref() {
        Some(owner) if owner == wallet => Ok(()),
        _ => Err(ShardError::Forbidden(format!("wallet does not own entity {}", entity.id))),
    }
}

/// Extract the bearer-authenticated wallet from request extensions,
/// attached by [`crate::auth::require_auth`].
pub(crate) fn authenticated_wallet(extensions: &axum::http::Extensions) -> Result<String, ShardError> {
    extensions
        .get::<AuthenticatedWallet>()
        .map(|wallet| wallet.0.clone())
        .ok_or_else(|| ShardError::Unauthorized("no authenticated wallet on request".to_owned()))
}
