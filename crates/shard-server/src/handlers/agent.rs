//! `/agent/deploy|stop|status|chat` (`spec.md` §4.J), proxied straight
//! through to the host application's [`AgentManager`](crate::agent_manager::AgentManager).
//!
//! `deploy` additionally runs the rest of the spec's deploy flow before
//! handing off to the agent manager: creating the agent's own custodial
//! wallet, minting its starter gold and character NFT, and spawning its
//! entity, reusing `handlers::spawn`'s character-creation path.
//!
//! Every handler here returns `503` via [`ShardError::ExternalUnavailable`]
//! when no agent manager is attached to this deployment.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Extensions;
use axum::Json;
use shard_chain::ContractKind;
use shard_types::{AgentConfig, AgentFocus, AgentStrategy, ClassId, EntityId, EntityRef, Gender, RaceId, ZoneId};

use crate::agent_manager::AgentStatus;
use crate::error::ShardError;
use crate::handlers::authenticated_wallet;
use crate::handlers::spawn::new_character;
use crate::state::AppState;

/// Starter copper minted to a freshly deployed agent's custodial wallet
/// (`spec.md` §4.J: "mint starter gold").
const STARTER_GOLD_COPPER: u64 = 500;

fn require_agents(state: &AppState) -> Result<&Arc<dyn crate::agent_manager::AgentManager>, ShardError> {
    state.agents.as_ref().ok_or_else(|| ShardError::ExternalUnavailable("autonomous play is not enabled on this deployment".to_owned()))
}

/// Request body for `POST /agent/deploy`.
#[derive(Debug, serde::Deserialize, validator::Validate)]
pub struct DeployRequest {
    /// Character name for the agent's new character.
    #[validate(length(min = 1, max = 32))]
    pub name: String,
    /// Race for the agent's new character.
    pub race_id: RaceId,
    /// Class for the agent's new character.
    pub class_id: ClassId,
    /// Cosmetic gender for the agent's new character.
    pub gender: Gender,
    /// The zone to spawn the agent's character into.
    pub zone_id: ZoneId,
    /// Initial behavior focus.
    pub focus: AgentFocus,
    /// Initial risk posture.
    pub strategy: AgentStrategy,
}

/// Response body for `POST /agent/deploy`.
#[derive(Debug, serde::Serialize)]
pub struct DeployResponse {
    /// The custodial wallet generated for this agent.
    pub custodial_wallet: String,
    /// The entity the agent now controls.
    pub entity_id: EntityId,
    /// The zone the entity was placed in.
    pub zone_id: ZoneId,
}

/// `POST /agent/deploy`
///
/// Runs the full deploy flow (`spec.md` §4.J): creates a custodial wallet
/// for the agent, mints its starter gold and character NFT, spawns its
/// entity, then starts its loop and waits for first-tick confirmation.
/// Calling this again for a wallet that already has an agent deployed
/// instead just updates its focus/strategy, leaving the existing
/// custodial wallet and entity in place.
///
/// # Errors
///
/// Returns [`ShardError::ExternalUnavailable`] if no agent manager is
/// attached, or if any chain mint call or the loop's first-tick
/// confirmation fails.
pub async fn deploy(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<DeployRequest>,
) -> Result<Json<DeployResponse>, ShardError> {
    use validator::Validate;
    body.validate().map_err(|err| ShardError::Validation(err.to_string()))?;

    let wallet = authenticated_wallet(&extensions)?;

    let custodial_wallet = format!("0x{}", uuid::Uuid::new_v4().simple());
    state.chain.mint_gold(&custodial_wallet, STARTER_GOLD_COPPER).await?;

    let character_token = state.chain.next_id(ContractKind::Character).await?;
    let mut entity = new_character(&custodial_wallet, body.name, body.race_id, body.class_id, body.gender);
    entity.character_token_id = Some(uuid::Uuid::from_u64_pair(character_token, 0));

    let entity_id = entity.id;
    {
        let mut world = state.world.lock().await;
        let zone = world.get_or_create_zone(&state.catalog, body.zone_id)?;
        zone.insert_entity(entity);
    }

    let config = AgentConfig {
        enabled: true,
        focus: body.focus,
        strategy: body.strategy,
        target_zone: None,
        chat_history: Vec::new(),
        custodial_wallet: custodial_wallet.clone(),
        entity_ref: Some(EntityRef { zone_id: body.zone_id, entity_id }),
        last_updated: chrono::Utc::now(),
    };

    require_agents(&state)?.deploy(wallet, config).await?;

    Ok(Json(DeployResponse { custodial_wallet, entity_id, zone_id: body.zone_id }))
}

/// `POST /agent/stop`
///
/// Stops the authenticated wallet's agent loop, if running.
///
/// # Errors
///
/// Returns [`ShardError::ExternalUnavailable`] if no agent manager is
/// attached.
pub async fn stop(State(state): State<Arc<AppState>>, extensions: Extensions) -> Result<Json<serde_json::Value>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    require_agents(&state)?.stop(wallet).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

/// `GET /agent/status`
///
/// # Errors
///
/// Returns [`ShardError::ExternalUnavailable`] if no agent manager is
/// attached.
pub async fn status(State(state): State<Arc<AppState>>, extensions: Extensions) -> Result<Json<AgentStatus>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let status = require_agents(&state)?.status(wallet).await?;
    Ok(Json(status))
}

/// Request body for `POST /agent/chat`.
#[derive(Debug, serde::Deserialize)]
pub struct ChatRequest {
    /// The user's chat message to the deployed agent.
    pub message: String,
}

/// `POST /agent/chat`
///
/// Appends a chat turn and returns the agent's reply, falling back to a
/// canned response if the LLM backend is unavailable (`spec.md` §7).
///
/// # Errors
///
/// Returns [`ShardError::ExternalUnavailable`] if no agent manager is
/// attached.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let reply = require_agents(&state)?.chat(wallet, body.message).await?;
    Ok(Json(serde_json::json!({"reply": reply})))
}
