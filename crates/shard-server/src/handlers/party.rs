//! `/party/form`, `/party/leave`, `/party/status`: thin wrappers over
//! [`crate::handlers::command::dispatch`]'s `PartyForm`/`PartyLeave`
//! parameters, plus a read-only roster query (`spec.md` §4.F, §170
//! endpoint grouping).

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::Extensions;
use axum::Json;
use shard_types::{ActionParameters, ActionRequest, ActionResult, ActionType, EntityId, Party, PartyId, ZoneId};

use crate::error::ShardError;
use crate::handlers::authenticated_wallet;
use crate::handlers::command;
use crate::state::AppState;

/// Request body shared by `/party/form` and `/party/leave`.
#[derive(Debug, serde::Deserialize)]
pub struct PartyFormRequest {
    /// The zone both entities occupy.
    pub zone_id: ZoneId,
    /// The requesting entity (must be owned by the authenticated wallet).
    pub entity_id: EntityId,
    /// The entity being invited to form a party.
    pub target_id: EntityId,
}

/// `POST /party/form`
///
/// # Errors
///
/// See [`command::dispatch`].
pub async fn form(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<PartyFormRequest>,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let request = ActionRequest {
        zone_id: body.zone_id,
        entity_id: body.entity_id,
        wallet_address: wallet.clone(),
        action_type: ActionType::PartyForm,
        parameters: ActionParameters::PartyForm { target_id: body.target_id },
    };
    Ok(Json(command::dispatch(&state, &wallet, request).await?))
}

/// Request body for `POST /party/leave`.
#[derive(Debug, serde::Deserialize)]
pub struct PartyLeaveRequest {
    /// The zone the entity occupies.
    pub zone_id: ZoneId,
    /// The leaving entity.
    pub entity_id: EntityId,
    /// The party being left.
    pub party_id: PartyId,
}

/// `POST /party/leave`
///
/// # Errors
///
/// See [`command::dispatch`].
pub async fn leave(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<PartyLeaveRequest>,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let request = ActionRequest {
        zone_id: body.zone_id,
        entity_id: body.entity_id,
        wallet_address: wallet.clone(),
        action_type: ActionType::PartyLeave,
        parameters: ActionParameters::PartyLeave { party_id: body.party_id },
    };
    Ok(Json(command::dispatch(&state, &wallet, request).await?))
}

/// Query params for `GET /party/status`.
#[derive(Debug, serde::Deserialize)]
pub struct PartyStatusQuery {
    /// The party to look up.
    pub party_id: PartyId,
}

/// `GET /party/status`
///
/// # Errors
///
/// Returns [`ShardError::NotFound`] if no party exists with that id.
pub async fn status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PartyStatusQuery>,
) -> Result<Json<Party>, ShardError> {
    let parties = state.parties.lock().await;
    parties.get(&query.party_id).cloned().map(Json).ok_or_else(|| ShardError::NotFound(format!("no party {}", query.party_id)))
}
