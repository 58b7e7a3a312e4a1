//! `POST /command`: the unified action envelope (`spec.md` §4.F), plus the
//! profession/equipment/shop route aliases that narrow it to one action
//! type for clients that prefer a dedicated path (`/mining`, `/cooking`,
//! `/equipment`, `/shop`, ...).
//!
//! Every route in this module funnels into [`dispatch`], which matches on
//! [`ActionParameters`] and calls straight through to the matching
//! `shard_actions::handlers` function. Two-entity actions (attack, a
//! technique cast against a target, gathering from a node, forming a
//! party) clone the secondary entity's current state, operate against a
//! single live `&mut Entity` for the primary actor, then write the primary
//! actor back -- `Zone`'s entity table is a `BTreeMap` and cannot yield two
//! disjoint `&mut` borrows at once.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Extensions;
use axum::Json;
use shard_actions::death::{self, DEFAULT_CORPSE_LIFETIME_TICKS};
use shard_actions::error::BurnedMaterial;
use shard_actions::{handlers as action_handlers, leveling, party, quest};
use shard_ledger::ledger::TransferParams;
use shard_types::{
    ActionOutcome, ActionParameters, ActionRequest, ActionResult, ActionType, EntityKind,
    EquipmentSlot, LedgerEntryType, LedgerPartyType, Profession, RejectionDetails, RejectionReason,
    BOUNDED_LIST_CAP,
};

use crate::error::ShardError;
use crate::handlers::{authenticated_wallet, require_ownership};
use crate::state::AppState;

/// `POST /command`
///
/// # Errors
///
/// Returns [`ShardError::Unauthorized`]/[`ShardError::Forbidden`] if the
/// bearer wallet doesn't match the request or doesn't own the acting
/// entity, [`ShardError::NotFound`] if the zone or entity doesn't exist.
/// Domain-level rejections (out of range, on cooldown, ...) are carried in
/// the returned [`ActionResult::rejection`], not as an HTTP error.
pub async fn command(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    if wallet != request.wallet_address {
        return Err(ShardError::Forbidden("authenticated wallet does not match request wallet".to_owned()));
    }
    let result = dispatch(&state, &wallet, request).await?;
    Ok(Json(result))
}

/// Execute one [`ActionRequest`] against live zone state, translating a
/// domain-level rejection into [`ActionResult::rejection`] rather than an
/// HTTP error -- only infrastructure failures (missing zone/entity, ledger/
/// chain faults) propagate as [`ShardError`].
///
/// Public so the host application's [`crate::agent_manager::AgentManager`]
/// implementation can submit autonomous-agent actions through the exact
/// same path human clients use via `POST /command`.
pub async fn dispatch(state: &AppState, wallet: &str, request: ActionRequest) -> Result<ActionResult, ShardError> {
    let tick = {
        let world = state.world.lock().await;
        world.zone(request.zone_id).map(|zone| zone.tick).unwrap_or(0)
    };

    let outcome = run_action(state, wallet, &request).await;

    match outcome {
        Ok(outcome) => Ok(ActionResult {
            tick,
            entity_id: request.entity_id,
            action_type: request.action_type,
            success: true,
            outcome: Some(outcome),
            rejection: None,
        }),
        Err(ActionOutcomeError::Rejected(reason, remaining_ticks)) => Ok(ActionResult {
            tick,
            entity_id: request.entity_id,
            action_type: request.action_type,
            success: false,
            outcome: None,
            rejection: Some(RejectionDetails { reason, message: reason_message(reason), remaining_ticks }),
        }),
        Err(ActionOutcomeError::Infra(err)) => Err(err),
    }
}

/// An action's failure mode, split so [`dispatch`] can decide whether it
/// belongs in [`ActionResult::rejection`] (a game rule) or propagates as an
/// HTTP error (infrastructure).
enum ActionOutcomeError {
    Rejected(RejectionReason, Option<u64>),
    Infra(ShardError),
}

impl From<ShardError> for ActionOutcomeError {
    fn from(err: ShardError) -> Self {
        Self::Infra(err)
    }
}

impl From<shard_actions::error::ActionError> for ActionOutcomeError {
    fn from(err: shard_actions::error::ActionError) -> Self {
        use shard_actions::error::ActionError;
        match err {
            // Infrastructure failures: the action handler's precondition
            // checks all passed, but a downstream system (zone runtime,
            // ledger, chain) failed while carrying it out. These are bugs
            // or outages, not game rules, so they propagate as a real HTTP
            // error rather than a 200 `success:false` rejection.
            ActionError::World(e) => Self::Infra(ShardError::World(e)),
            ActionError::Ledger(e) => Self::Infra(ShardError::Ledger(e)),
            ActionError::Chain(e) => Self::Infra(ShardError::Chain(e)),
            ActionError::ArithmeticOverflow { context } => {
                Self::Infra(ShardError::Internal(format!("arithmetic overflow: {context}")))
            }
            ActionError::CraftStuck { ref wallet, .. } => {
                Self::Infra(ShardError::Internal(format!("craft stuck for {wallet}: {err}")))
            }
            other => Self::Rejected(other.rejection_reason(), None),
        }
    }
}

/// Persist a `CraftStuck` event to the hot store so operators can find and
/// reimburse wallets whose materials were burned with no output minted.
///
/// Mirrors `handlers::character::push_diary_entry`'s append-capped-list
/// pattern, keyed globally rather than per-wallet since this is an operator
/// concern, not a player-facing one.
async fn persist_craft_stuck_event(
    state: &AppState,
    wallet: &str,
    tick: u64,
    materials: &[BurnedMaterial],
) -> Result<(), ShardError> {
    let record = serde_json::json!({
        "event_type": "craft_stuck",
        "tick": tick,
        "wallet": wallet,
        "materials": materials.iter().map(|m| serde_json::json!({
            "token_id": m.token_id,
            "quantity": m.quantity,
        })).collect::<Vec<_>>(),
    });
    state.persistence.push_capped("events:craft_stuck", &record, BOUNDED_LIST_CAP).await?;
    Ok(())
}

fn reason_message(reason: RejectionReason) -> String {
    format!("{reason:?}")
}

/// Resolve a resource node's [`shard_types::NodeMaterial`] to the catalog
/// item it yields. The catalog has no direct material-to-item index, so
/// this matches the node's ore/flower kind against a material-category
/// item whose name contains it, the same way [`shard_catalog::Catalog`]
/// resolves a mob's loot table by name.
fn resolve_node_output_token_id(
    catalog: &shard_catalog::Catalog,
    material: &shard_types::NodeMaterial,
) -> Result<shard_types::ItemTokenId, ShardError> {
    let kind = match material {
        shard_types::NodeMaterial::Ore { ore_kind } => ore_kind,
        shard_types::NodeMaterial::Flower { flower_kind } => flower_kind,
    };
    catalog
        .all_items()
        .find(|item| {
            item.category == shard_catalog::items::ItemCategory::Material
                && item.name.to_lowercase().contains(&kind.to_lowercase())
        })
        .map(|item| item.token_id)
        .ok_or_else(|| ShardError::NotFound(format!("no catalog item for node material {kind}")))
}

#[allow(clippy::too_many_lines)]
async fn run_action(state: &AppState, wallet: &str, request: &ActionRequest) -> Result<ActionOutcome, ActionOutcomeError> {
    let mut world = state.world.lock().await;
    let zone = world.zone_mut(request.zone_id).map_err(ShardError::from)?;

    let mut actor = zone.entity(request.entity_id).map_err(ShardError::from)?.clone();
    require_ownership(&actor, wallet)?;

    let outcome = match &request.parameters {
        ActionParameters::Move { x, y } => Ok(action_handlers::execute_move(&mut actor, zone.bounds, *x, *y)),

        ActionParameters::Attack { target_id } => {
            let mut rng = rand::rng();
            let weapon = actor
                .equipment
                .get(&EquipmentSlot::Weapon)
                .and_then(|item| state.catalog.item_by_token_id(item.token_id).ok());
            let range = weapon.and_then(|item| item.weapon_range).unwrap_or(shard_actions::costs::DEFAULT_MELEE_RANGE);
            let damage = weapon.and_then(|item| item.weapon_base_damage).unwrap_or(5);

            let defender = zone.entity_mut(*target_id).map_err(ShardError::from)?;
            let result = action_handlers::execute_attack(&mut actor, defender, range, damage, &mut rng);
            let defender_died = defender.is_dead() && defender.kind == EntityKind::Mob;
            if defender_died {
                resolve_mob_death(state, zone, &mut actor, *target_id).await.map_err(ShardError::from)?;
            }
            result.map_err(ActionOutcomeError::from)
        }

        ActionParameters::UseTechnique { technique_id, target_id } => {
            let techniques = state.techniques.lock().await;
            let technique = techniques.technique_by_id(&state.catalog, *technique_id).map_err(|_err| {
                ActionOutcomeError::Rejected(RejectionReason::TechniqueNotLearned, None)
            })?;
            let technique = technique.clone();
            drop(techniques);

            let tick = zone.tick;
            let mut rng = rand::rng();
            match target_id {
                Some(target_id) => {
                    let target = zone.entity_mut(*target_id).map_err(ShardError::from)?;
                    let result = action_handlers::execute_use_technique(&mut actor, Some(target), &technique, tick, &mut rng);
                    let target_died = target.is_dead() && target.kind == EntityKind::Mob;
                    if target_died {
                        resolve_mob_death(state, zone, &mut actor, *target_id).await.map_err(ShardError::from)?;
                    }
                    result.map_err(ActionOutcomeError::from)
                }
                None => action_handlers::execute_use_technique(&mut actor, None, &technique, tick, &mut rng)
                    .map_err(ActionOutcomeError::from),
            }
        }

        ActionParameters::Gather { profession, node_id } => {
            let mut node = zone.entity(*node_id).map_err(ShardError::from)?.clone();
            let tool_slot = EquipmentSlot::Tool;
            let material = node.node_material.clone().ok_or(ActionOutcomeError::Rejected(RejectionReason::InvalidInput, None))?;
            let output_token_id = resolve_node_output_token_id(&state.catalog, &material).map_err(ShardError::from)?;
            let mut ledger = state.ledger.lock().await;
            let result = action_handlers::execute_gather(
                &mut actor,
                &mut node,
                *profession,
                tool_slot,
                output_token_id,
                &state.catalog,
                &state.chain,
                &mut ledger,
                zone.tick,
            )
            .await;
            if result.is_ok() {
                *zone.entity_mut(*node_id).map_err(ShardError::from)? = node;
            }
            result.map_err(ActionOutcomeError::from)
        }

        ActionParameters::Craft { profession, station_id, recipe_id } => {
            let station = zone.entity(*station_id).map_err(ShardError::from)?;
            let distance = shard_actions::validation::distance(&actor, station);
            let station_kind = station.kind;
            let recipe = state.catalog.recipe_by_id(*recipe_id).map_err(ShardError::from)?;
            if recipe.profession != *profession {
                return Err(ActionOutcomeError::Rejected(RejectionReason::ProfessionMissing, None));
            }
            let mut ledger = state.ledger.lock().await;
            let mut rng = rand::rng();
            let result = action_handlers::execute_craft(
                &mut actor,
                recipe,
                station_kind,
                shard_actions::costs::DEFAULT_MELEE_RANGE,
                distance,
                &state.chain,
                &mut ledger,
                zone.tick,
                &mut rng,
            )
            .await;
            if let Err(shard_actions::error::ActionError::CraftStuck { ref wallet, ref materials, .. }) = result {
                persist_craft_stuck_event(state, wallet, zone.tick, materials).await?;
            }
            result.map_err(ActionOutcomeError::from)
        }

        ActionParameters::Equip { token_id } => {
            action_handlers::execute_equip(&mut actor, &state.catalog, *token_id, &state.chain)
                .await
                .map_err(ActionOutcomeError::from)
        }

        ActionParameters::Unequip { slot } => Ok(action_handlers::execute_unequip(&mut actor, *slot)),

        ActionParameters::Repair { slot } => {
            let mut gold_ledger = state.gold_ledger.lock().await;
            let mut ledger = state.ledger.lock().await;
            let on_chain_gold = state.chain.gold_balance(wallet).await.map_err(ShardError::from)?;
            action_handlers::execute_repair(&mut actor, *slot, &mut gold_ledger, &mut ledger, on_chain_gold, zone.tick)
                .map_err(ActionOutcomeError::from)
        }

        ActionParameters::Buy { merchant_id, token_id, quantity } => {
            let mut merchants = state.merchants.lock().await;
            let merchant = merchants.get_mut(merchant_id).ok_or(ShardError::NotFound("merchant not found".to_owned()))?;
            let mut gold_ledger = state.gold_ledger.lock().await;
            let mut ledger = state.ledger.lock().await;
            let on_chain_gold = state.chain.gold_balance(wallet).await.map_err(ShardError::from)?;
            action_handlers::execute_buy(
                &mut actor,
                merchant,
                *token_id,
                *quantity,
                &state.chain,
                &mut gold_ledger,
                &mut ledger,
                on_chain_gold,
                zone.tick,
            )
            .await
            .map_err(ActionOutcomeError::from)
        }

        ActionParameters::Sell { merchant_id, token_id, quantity } => {
            let mut merchants = state.merchants.lock().await;
            let merchant = merchants.get_mut(merchant_id).ok_or(ShardError::NotFound("merchant not found".to_owned()))?;
            let mut ledger = state.ledger.lock().await;
            action_handlers::execute_sell(&mut actor, merchant, *token_id, *quantity, &state.chain, &mut ledger, zone.tick)
                .await
                .map_err(ActionOutcomeError::from)
        }

        ActionParameters::TradeOffer { target_id, offer_items, offer_copper, request_items, request_copper } => {
            let trade = shard_actions::trade::trade_offer(
                actor.id,
                *target_id,
                offer_items.clone(),
                *offer_copper,
                request_items.clone(),
                *request_copper,
                zone.tick,
                shard_actions::trade::DEFAULT_TRADE_EXPIRY_TICKS,
            )
            .map_err(ActionOutcomeError::from)?;
            let trade_id = trade.id;
            state.pending_trades.lock().await.insert(trade_id, trade);
            Ok(ActionOutcome {
                copper_delta: 0,
                item_deltas: std::collections::BTreeMap::new(),
                profession_xp: std::collections::BTreeMap::new(),
                details: serde_json::json!({"trade_id": trade_id}),
            })
        }

        ActionParameters::TradeAccept { trade_id } => {
            let trade = {
                let mut pending = state.pending_trades.lock().await;
                pending.remove(trade_id).ok_or(ShardError::NotFound("trade not found".to_owned()))?
            };
            let legs = shard_actions::trade::trade_accept(&trade);
            let proposer = zone.entity(trade.proposer_id).map_err(ShardError::from)?.clone();
            let target = zone.entity(trade.target_id).map_err(ShardError::from)?.clone();
            let proposer_wallet = proposer.wallet_address.clone().ok_or(ShardError::Validation("proposer has no wallet".to_owned()))?;
            let target_wallet = target.wallet_address.clone().ok_or(ShardError::Validation("target has no wallet".to_owned()))?;
            let mut gold_ledger = state.gold_ledger.lock().await;
            let mut ledger = state.ledger.lock().await;
            action_handlers::apply_trade_leg(&legs.proposer, &target_wallet, &proposer_wallet, &state.chain, &mut gold_ledger, &mut ledger, zone.tick)
                .await
                .map_err(ActionOutcomeError::from)?;
            action_handlers::apply_trade_leg(&legs.target, &proposer_wallet, &target_wallet, &state.chain, &mut gold_ledger, &mut ledger, zone.tick)
                .await
                .map_err(ActionOutcomeError::from)?;
            Ok(ActionOutcome {
                details: serde_json::json!({"trade_id": trade_id}),
                ..empty_outcome()
            })
        }

        ActionParameters::TradeReject { trade_id } => {
            state.pending_trades.lock().await.remove(trade_id);
            Ok(ActionOutcome { details: serde_json::json!({"trade_id": trade_id, "rejected": true}), ..empty_outcome() })
        }

        ActionParameters::PartyForm { target_id } => {
            let mut target = zone.entity(*target_id).map_err(ShardError::from)?.clone();
            let new_party = party::form_party(&mut actor, &mut target).map_err(|reason| ActionOutcomeError::Rejected(reason, None))?;
            *zone.entity_mut(*target_id).map_err(ShardError::from)? = target;
            let party_id = new_party.id;
            state.parties.lock().await.insert(party_id, new_party);
            Ok(ActionOutcome { details: serde_json::json!({"party_id": party_id}), ..empty_outcome() })
        }

        ActionParameters::PartyLeave { party_id } => {
            let mut parties = state.parties.lock().await;
            let record = parties.get_mut(party_id).ok_or(ShardError::NotFound("party not found".to_owned()))?;
            let leave_outcome = party::leave_party(record, &mut actor).map_err(|reason| ActionOutcomeError::Rejected(reason, None))?;
            if matches!(leave_outcome, party::LeaveOutcome::Disbanded) {
                parties.remove(party_id);
            }
            Ok(ActionOutcome { details: serde_json::json!({"party_id": party_id}), ..empty_outcome() })
        }

        ActionParameters::QuestAccept { quest_id } => {
            let definition = state.catalog.quest_by_id(*quest_id).map_err(ShardError::from)?;
            quest::check_eligibility(&actor, definition).map_err(|reason| ActionOutcomeError::Rejected(reason, None))?;
            Ok(ActionOutcome { details: serde_json::json!({"quest_id": quest_id, "accepted": true}), ..empty_outcome() })
        }

        ActionParameters::QuestComplete { quest_id } => {
            let definition = state.catalog.quest_by_id(*quest_id).map_err(ShardError::from)?;
            action_handlers::execute_quest_complete(&mut actor, definition).map_err(ActionOutcomeError::from)
        }
    };

    if outcome.is_ok() {
        *zone.entity_mut(request.entity_id).map_err(ShardError::from)? = actor;
    }
    outcome
}

/// Apply death bookkeeping for a killed mob: split XP across the killer's
/// party, roll loot, mint it to the killer's wallet, build a skinnable
/// corpse, and remove the mob.
async fn resolve_mob_death(
    state: &AppState,
    zone: &mut shard_world::zone::Zone,
    killer: &mut shard_types::Entity,
    mob_id: shard_types::EntityId,
) -> Result<(), ShardError> {
    let mob = zone.entity(mob_id).map_err(ShardError::from)?.clone();
    let wallet = killer.wallet_address.clone().ok_or(ShardError::Validation("killer has no wallet".to_owned()))?;

    let party_members: Vec<_> = match killer.party_id {
        Some(party_id) => state.parties.lock().await.get(&party_id).map(|party| party.members.iter().copied().collect()).unwrap_or_default(),
        None => Vec::new(),
    };
    let shares = death::split_kill_xp(mob.xp_reward.unwrap_or(0), killer.id, &party_members);
    let mut techniques = state.techniques.lock().await;
    for share in shares {
        if share.entity_id == killer.id {
            let events = leveling::apply_xp_gain(killer, share.xp);
            let _ = action_handlers::apply_level_up_unlocks(killer, &events, &mut techniques);
        } else if let Ok(member) = zone.entity_mut(share.entity_id) {
            let events = leveling::apply_xp_gain(member, share.xp);
            let _ = action_handlers::apply_level_up_unlocks(member, &events, &mut techniques);
        }
    }
    drop(techniques);

    let table = state.catalog.loot_table(&mob.name).map_err(ShardError::from)?;
    let mut rng = rand::rng();
    let loot = death::roll_loot(table, &mut rng);
    let mut ledger = state.ledger.lock().await;
    if loot.copper > 0 {
        state.chain.mint_gold(&wallet, loot.copper).await.map_err(ShardError::from)?;
        ledger
            .record_transfer(TransferParams {
                tick: zone.tick,
                entry_type: LedgerEntryType::Trade,
                token_id: None,
                quantity: loot.copper,
                from: "chain".to_owned(),
                from_type: LedgerPartyType::Chain,
                to: wallet.clone(),
                to_type: LedgerPartyType::Wallet,
                reason: "LOOT".to_owned(),
            })
            .map_err(ShardError::from)?;
    }
    for drop in &loot.drops {
        state.chain.mint_item(&wallet, drop.token_id, u64::from(drop.quantity)).await.map_err(ShardError::from)?;
        ledger
            .record_transfer(TransferParams {
                tick: zone.tick,
                entry_type: LedgerEntryType::Trade,
                token_id: Some(drop.token_id),
                quantity: u64::from(drop.quantity),
                from: "chain".to_owned(),
                from_type: LedgerPartyType::Chain,
                to: wallet.clone(),
                to_type: LedgerPartyType::Wallet,
                reason: "LOOT".to_owned(),
            })
            .map_err(ShardError::from)?;
    }

    let corpse = death::build_corpse(&mob, zone.tick, DEFAULT_CORPSE_LIFETIME_TICKS);
    zone.remove_entity(mob_id);
    zone.insert_entity(corpse);

    let entry = shard_types::DiaryEntry {
        id: uuid::Uuid::new_v4(),
        timestamp: chrono::Utc::now(),
        zone_id: zone.id,
        x: killer.x,
        y: killer.y,
        action: "kill".to_owned(),
        headline: format!("{} slew {}", killer.name, mob.name),
        narrative: format!("{} defeated {} and claimed {} copper and {} item(s).", killer.name, mob.name, loot.copper, loot.drops.len()),
        details: serde_json::json!({
            "mob": mob.name,
            "copper": loot.copper,
            "drops": loot.drops.iter().map(|drop| serde_json::json!({"token_id": drop.token_id, "quantity": drop.quantity})).collect::<Vec<_>>(),
        }),
    };
    let _ = crate::handlers::character::push_diary_entry(state, &wallet, &entry).await;

    Ok(())
}

fn empty_outcome() -> ActionOutcome {
    ActionOutcome {
        copper_delta: 0,
        item_deltas: std::collections::BTreeMap::new(),
        profession_xp: std::collections::BTreeMap::new(),
        details: serde_json::Value::Null,
    }
}

// ---------------------------------------------------------------------------
// Thin route aliases: profession-specific gather/craft paths, equipment,
// shop (`spec.md` §4.K's named endpoint groups, each just a narrower
// `ActionRequest` funneled through `dispatch`).
// ---------------------------------------------------------------------------

/// Request body shared by `/mining`, `/herbalism`, `/skinning`.
#[derive(Debug, serde::Deserialize, validator::Validate)]
pub struct GatherRequest {
    /// The zone the node is in.
    pub zone_id: shard_types::ZoneId,
    /// The gathering entity.
    pub entity_id: shard_types::EntityId,
    /// The resource node to gather from.
    pub node_id: shard_types::EntityId,
}

async fn gather_route(
    state: Arc<AppState>,
    extensions: Extensions,
    body: GatherRequest,
    profession: Profession,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let request = ActionRequest {
        zone_id: body.zone_id,
        entity_id: body.entity_id,
        wallet_address: wallet.clone(),
        action_type: ActionType::Gather,
        parameters: ActionParameters::Gather { profession, node_id: body.node_id },
    };
    Ok(Json(dispatch(&state, &wallet, request).await?))
}

/// `POST /mining`
///
/// # Errors
///
/// See [`command`].
pub async fn mining(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<GatherRequest>) -> Result<Json<ActionResult>, ShardError> {
    gather_route(state.0, extensions, body, Profession::Mining).await
}

/// `POST /herbalism`
///
/// # Errors
///
/// See [`command`].
pub async fn herbalism(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<GatherRequest>) -> Result<Json<ActionResult>, ShardError> {
    gather_route(state.0, extensions, body, Profession::Herbalism).await
}

/// `POST /skinning`
///
/// # Errors
///
/// See [`command`].
pub async fn skinning(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<GatherRequest>) -> Result<Json<ActionResult>, ShardError> {
    gather_route(state.0, extensions, body, Profession::Skinning).await
}

/// Request body shared by `/cooking`, `/alchemy`, `/crafting`.
#[derive(Debug, serde::Deserialize, validator::Validate)]
pub struct CraftRequest {
    /// The zone the station is in.
    pub zone_id: shard_types::ZoneId,
    /// The crafting entity.
    pub entity_id: shard_types::EntityId,
    /// The crafting station entity.
    pub station_id: shard_types::EntityId,
    /// The recipe to produce.
    pub recipe_id: shard_types::RecipeId,
}

async fn craft_route(
    state: Arc<AppState>,
    extensions: Extensions,
    body: CraftRequest,
    profession: Profession,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let request = ActionRequest {
        zone_id: body.zone_id,
        entity_id: body.entity_id,
        wallet_address: wallet.clone(),
        action_type: ActionType::Craft,
        parameters: ActionParameters::Craft { profession, station_id: body.station_id, recipe_id: body.recipe_id },
    };
    Ok(Json(dispatch(&state, &wallet, request).await?))
}

/// `POST /cooking`
///
/// # Errors
///
/// See [`command`].
pub async fn cooking(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<CraftRequest>) -> Result<Json<ActionResult>, ShardError> {
    craft_route(state.0, extensions, body, Profession::Cooking).await
}

/// `POST /alchemy`
///
/// # Errors
///
/// See [`command`].
pub async fn alchemy(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<CraftRequest>) -> Result<Json<ActionResult>, ShardError> {
    craft_route(state.0, extensions, body, Profession::Alchemy).await
}

/// `POST /crafting`
///
/// # Errors
///
/// See [`command`].
pub async fn crafting(state: State<Arc<AppState>>, extensions: Extensions, Json(body): Json<CraftRequest>) -> Result<Json<ActionResult>, ShardError> {
    craft_route(state.0, extensions, body, Profession::Blacksmithing).await
}

/// Request body for `/equipment`: equip, unequip, or repair in one slot.
#[derive(Debug, serde::Deserialize, validator::Validate)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EquipmentRequest {
    /// Equip an owned item.
    Equip {
        /// Zone the entity is in.
        zone_id: shard_types::ZoneId,
        /// The equipping entity.
        entity_id: shard_types::EntityId,
        /// The item to equip.
        token_id: shard_types::ItemTokenId,
    },
    /// Clear a slot.
    Unequip {
        /// Zone the entity is in.
        zone_id: shard_types::ZoneId,
        /// The entity.
        entity_id: shard_types::EntityId,
        /// The slot to clear.
        slot: EquipmentSlot,
    },
    /// Repair a slot's equipped item.
    Repair {
        /// Zone the entity is in.
        zone_id: shard_types::ZoneId,
        /// The entity.
        entity_id: shard_types::EntityId,
        /// The slot to repair.
        slot: EquipmentSlot,
    },
}

/// `POST /equipment`
///
/// # Errors
///
/// See [`command`].
pub async fn equipment(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<EquipmentRequest>,
) -> Result<Json<ActionResult>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;
    let (zone_id, entity_id, action_type, parameters) = match body {
        EquipmentRequest::Equip { zone_id, entity_id, token_id } => {
            (zone_id, entity_id, ActionType::Equip, ActionParameters::Equip { token_id })
        }
        EquipmentRequest::Unequip { zone_id, entity_id, slot } => {
            (zone_id, entity_id, ActionType::Unequip, ActionParameters::Unequip { slot })
        }
        EquipmentRequest::Repair { zone_id, entity_id, slot } => {
            (zone_id, entity_id, ActionType::Repair, ActionParameters::Repair { slot })
        }
    };
    let request = ActionRequest { zone_id, entity_id, wallet_address: wallet.clone(), action_type, parameters };
    Ok(Json(dispatch(&state, &wallet, request).await?))
}

/// Request body for `/shop`: buy or sell from a merchant.
#[derive(Debug, serde::Deserialize, validator::Validate)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ShopRequest {
    /// Purchase from a merchant.
    Buy {
        /// Zone the entity and merchant are in.
        zone_id: shard_types::ZoneId,
        /// The buying entity.
        entity_id: shard_types::EntityId,
        /// The merchant entity.
        merchant_id: shard_types::EntityId,
        /// The item to buy.
        token_id: shard_types::ItemTokenId,
        /// Quantity to buy.
        #[validate(range(min = 1))]
        quantity: u32,
    },
    /// Sell to a merchant.
    Sell {
        /// Zone the entity and merchant are in.
        zone_id: shard_types::ZoneId,
        /// The selling entity.
        entity_id: shard_types::EntityId,
        /// The merchant entity.
        merchant_id: shard_types::EntityId,
        /// The item to sell.
        token_id: shard_types::ItemTokenId,
        /// Quantity to sell.
        #[validate(range(min = 1))]
        quantity: u32,
    },
}

/// `POST /shop`
///
/// # Errors
///
/// See [`command`].
pub async fn shop(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<ShopRequest>,
) -> Result<Json<ActionResult>, ShardError> {
    use validator::Validate;
    body.validate().map_err(|err| ShardError::Validation(err.to_string()))?;

    let wallet = authenticated_wallet(&extensions)?;
    let (zone_id, entity_id, action_type, parameters) = match body {
        ShopRequest::Buy { zone_id, entity_id, merchant_id, token_id, quantity } => {
            (zone_id, entity_id, ActionType::Buy, ActionParameters::Buy { merchant_id, token_id, quantity })
        }
        ShopRequest::Sell { zone_id, entity_id, merchant_id, token_id, quantity } => {
            (zone_id, entity_id, ActionType::Sell, ActionParameters::Sell { merchant_id, token_id, quantity })
        }
    };
    let request = ActionRequest { zone_id, entity_id, wallet_address: wallet.clone(), action_type, parameters };
    Ok(Json(dispatch(&state, &wallet, request).await?))
}
