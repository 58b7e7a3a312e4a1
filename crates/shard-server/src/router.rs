//! Axum router construction for the shard server's player-facing HTTP
//! surface (`spec.md` §4.K) plus the operator control plane (`spec.md`
//! §9) and the `/ws` tick stream.
//!
//! Every mutating route (anything that reads or mutates a specific
//! wallet's entity) runs behind [`require_auth`]. Read-only catalog,
//! leaderboard, auth, and operator-status endpoints are left open.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::handlers::{agent, catalog, character, command, market, party, spawn, state_query};
use crate::state::AppState;
use crate::{auth, operator, ws};

/// Build the complete Axum router for the shard server.
#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let public = Router::new()
        .route("/", get(crate::handlers::index))
        .route("/ws", get(ws::ws_ticks))
        .route("/auth/challenge", get(auth::challenge))
        .route("/auth/verify", post(auth::verify))
        .route("/items/catalog", get(catalog::items_catalog))
        .route("/techniques/catalog", get(catalog::techniques_catalog))
        .route("/leaderboard", get(catalog::leaderboard))
        .route("/portals", get(state_query::portals))
        .route("/auctionhouse", get(market::auctionhouse))
        .route("/guild/{guild_id}", get(market::guild))
        .route("/party/status", get(party::status))
        .route("/operator/status", get(operator::status));

    let authenticated = Router::new()
        .route("/spawn", post(spawn::spawn))
        .route("/logout", post(spawn::logout))
        .route("/command", post(command::command))
        .route("/mining", post(command::mining))
        .route("/herbalism", post(command::herbalism))
        .route("/skinning", post(command::skinning))
        .route("/cooking", post(command::cooking))
        .route("/alchemy", post(command::alchemy))
        .route("/crafting", post(command::crafting))
        .route("/equipment", post(command::equipment))
        .route("/shop", post(command::shop))
        .route("/party/form", post(party::form))
        .route("/party/leave", post(party::leave))
        .route("/state", get(state_query::state))
        .route("/transition/auto", post(state_query::transition_auto))
        .route("/character", get(character::get_character).put(character::put_character))
        .route("/diary", get(character::diary))
        .route("/agent/deploy", post(agent::deploy))
        .route("/agent/stop", post(agent::stop))
        .route("/agent/status", get(agent::status))
        .route("/agent/chat", post(agent::chat))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    let operator_routes = Router::new()
        .route("/operator/pause", post(operator::pause))
        .route("/operator/resume", post(operator::resume))
        .route("/operator/speed", post(operator::set_speed))
        .route("/operator/stop", post(operator::stop));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(operator_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
