//! `POST /spawn` and `POST /logout` (`spec.md` §4.F): the two actions that
//! don't fit [`crate::handlers::command`]'s generic envelope since they
//! create/remove the live entity rather than acting on an existing one.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Extensions;
use axum::Json;
use shard_actions::leveling;
use shard_types::{
    CharacterSave, ClassId, Entity, EntityId, EntityKind, Gender, RaceId, Stats, ZoneId,
};

use crate::error::ShardError;
use crate::handlers::{authenticated_wallet, require_ownership};
use crate::state::AppState;

/// Base stats for a freshly created level-1 character, before race/class
/// growth has been applied (`spec.md` §4.G).
const STARTING_STATS: Stats = Stats { strength: 5, agility: 5, intellect: 5, vitality: 5 };

/// Request body for `POST /spawn`.
#[derive(Debug, serde::Deserialize, validator::Validate)]
pub struct SpawnRequest {
    /// The wallet spawning a character.
    pub wallet_address: String,
    /// The zone to place the character in.
    pub zone_id: ZoneId,
    /// Character name, required only when creating a new character (no
    /// saved [`CharacterSave`] exists yet for this wallet).
    #[validate(length(min = 1, max = 32))]
    pub name: Option<String>,
    /// Race, required only for a new character.
    pub race_id: Option<RaceId>,
    /// Class, required only for a new character.
    pub class_id: Option<ClassId>,
    /// Cosmetic gender, required only for a new character.
    pub gender: Option<Gender>,
}

/// Response body for `POST /spawn`.
#[derive(Debug, serde::Serialize)]
pub struct SpawnResponse {
    /// The instantiated entity id within `zone_id`.
    pub entity_id: EntityId,
    /// The zone the entity was placed in.
    pub zone_id: ZoneId,
    /// Whether this spawn created a brand-new character.
    pub new_character: bool,
}

/// `POST /spawn`
///
/// Restores a saved character if `wallet_address` has one in the hot
/// persistence store, otherwise creates a fresh level-1 character from
/// `name`/`race_id`/`class_id`/`gender`.
///
/// # Errors
///
/// Returns [`ShardError::Validation`] if no save exists and any of
/// `name`/`race_id`/`class_id`/`gender` is missing, or
/// [`ShardError::NotFound`] if `zone_id` has no catalog layout.
pub async fn spawn(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<SpawnRequest>,
) -> Result<Json<SpawnResponse>, ShardError> {
    use validator::Validate;
    body.validate().map_err(|err| ShardError::Validation(err.to_string()))?;

    let wallet = authenticated_wallet(&extensions)?;
    if wallet != body.wallet_address {
        return Err(ShardError::Forbidden("authenticated wallet does not match request wallet".to_owned()));
    }

    let key = character_key(&wallet);
    let saved: Option<CharacterSave> = state.persistence.get(&key).await?;

    let (entity, new_character) = match saved {
        Some(save) => (entity_from_save(&wallet, &save), false),
        None => {
            let name = body.name.ok_or_else(|| ShardError::Validation("name required for a new character".to_owned()))?;
            let race_id = body.race_id.ok_or_else(|| ShardError::Validation("race_id required for a new character".to_owned()))?;
            let class_id = body.class_id.ok_or_else(|| ShardError::Validation("class_id required for a new character".to_owned()))?;
            let gender = body.gender.ok_or_else(|| ShardError::Validation("gender required for a new character".to_owned()))?;
            (new_character(&wallet, name, race_id, class_id, gender), true)
        }
    };

    let entity_id = entity.id;
    {
        let mut world = state.world.lock().await;
        let zone = world.get_or_create_zone(&state.catalog, body.zone_id)?;
        zone.insert_entity(entity);
    }

    Ok(Json(SpawnResponse { entity_id, zone_id: body.zone_id, new_character }))
}

/// Request body for `POST /logout`.
#[derive(Debug, serde::Deserialize)]
pub struct LogoutRequest {
    /// The zone the entity is currently in.
    pub zone_id: ZoneId,
    /// The entity to remove and persist.
    pub entity_id: EntityId,
}

/// `POST /logout`
///
/// Persists the entity's current state as a [`CharacterSave`] and removes
/// it from the live zone.
///
/// # Errors
///
/// Returns [`ShardError::Forbidden`] if the wallet does not own the
/// entity, [`ShardError::NotFound`] if the zone/entity does not exist.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    Json(body): Json<LogoutRequest>,
) -> Result<Json<serde_json::Value>, ShardError> {
    let wallet = authenticated_wallet(&extensions)?;

    let entity = {
        let mut world = state.world.lock().await;
        let zone = world.zone_mut(body.zone_id)?;
        let entity = zone.entity(body.entity_id)?.clone();
        require_ownership(&entity, &wallet)?;
        zone.remove_entity(body.entity_id);
        entity
    };

    let save = save_from_entity(&entity, body.zone_id);
    state.persistence.set(&character_key(&wallet), &save).await?;

    Ok(Json(serde_json::json!({"ok": true})))
}

fn character_key(wallet: &str) -> String {
    format!("wallet:{wallet}:character")
}

pub(crate) fn new_character(wallet: &str, name: String, race_id: RaceId, class_id: ClassId, gender: Gender) -> Entity {
    let (max_hp, max_essence) = leveling::max_vitals_for_stats(STARTING_STATS);
    Entity {
        id: EntityId::new(),
        kind: EntityKind::Player,
        name,
        x: 0.0,
        y: 0.0,
        hp: max_hp,
        max_hp,
        essence: Some(max_essence),
        max_essence: Some(max_essence),
        wallet_address: Some(wallet.to_owned()),
        character_token_id: None,
        level: Some(1),
        xp: Some(0),
        xp_reward: None,
        race_id: Some(race_id),
        class_id: Some(class_id),
        gender: Some(gender),
        kills: Some(0),
        stats: STARTING_STATS,
        effective_stats: STARTING_STATS,
        equipment: std::collections::BTreeMap::new(),
        learned_techniques: std::collections::BTreeSet::new(),
        active_effects: Vec::new(),
        cooldowns: std::collections::BTreeMap::new(),
        completed_quests: std::collections::BTreeSet::new(),
        professions: std::collections::BTreeMap::new(),
        signature_technique_id: None,
        ultimate_technique_id: None,
        party_id: None,
        charges: None,
        max_charges: None,
        node_material: None,
        node_tier: None,
        depleted_at_tick: None,
        respawn_ticks: None,
        skinned: None,
        skinnable_until: None,
        mob_name: None,
    }
}

fn entity_from_save(wallet: &str, save: &CharacterSave) -> Entity {
    let (max_hp, max_essence) = leveling::max_vitals_for_stats(stats_for_level(save.race_id, save.class_id, save.level));
    Entity {
        id: EntityId::new(),
        kind: EntityKind::Player,
        name: save.name.clone(),
        x: save.x,
        y: save.y,
        hp: max_hp,
        max_hp,
        essence: Some(max_essence),
        max_essence: Some(max_essence),
        wallet_address: Some(wallet.to_owned()),
        character_token_id: None,
        level: Some(save.level),
        xp: Some(save.xp),
        xp_reward: None,
        race_id: Some(save.race_id),
        class_id: Some(save.class_id),
        gender: Some(save.gender),
        kills: Some(save.kills),
        stats: stats_for_level(save.race_id, save.class_id, save.level),
        effective_stats: stats_for_level(save.race_id, save.class_id, save.level),
        equipment: std::collections::BTreeMap::new(),
        learned_techniques: save.learned_techniques.clone(),
        active_effects: Vec::new(),
        cooldowns: std::collections::BTreeMap::new(),
        completed_quests: save.completed_quests.clone(),
        professions: save.professions.clone(),
        signature_technique_id: save.signature_technique_id,
        ultimate_technique_id: save.ultimate_technique_id,
        party_id: None,
        charges: None,
        max_charges: None,
        node_material: None,
        node_tier: None,
        depleted_at_tick: None,
        respawn_ticks: None,
        skinned: None,
        skinnable_until: None,
        mob_name: None,
    }
}

fn stats_for_level(race_id: RaceId, class_id: ClassId, level: u32) -> Stats {
    let mut stats = STARTING_STATS;
    for _ in 1..level {
        stats = stats.saturating_add(leveling::growth_for_level_up(race_id, class_id));
    }
    stats
}

fn save_from_entity(entity: &Entity, zone_id: ZoneId) -> CharacterSave {
    CharacterSave {
        name: entity.name.clone(),
        level: entity.level.unwrap_or(1),
        xp: entity.xp.unwrap_or(0),
        race_id: entity.race_id.unwrap_or(RaceId::Human),
        class_id: entity.class_id.unwrap_or(ClassId::Warrior),
        gender: entity.gender.unwrap_or(Gender::Neutral),
        zone: zone_id,
        x: entity.x,
        y: entity.y,
        kills: entity.kills.unwrap_or(0),
        completed_quests: entity.completed_quests.clone(),
        learned_techniques: entity.learned_techniques.clone(),
        professions: entity.professions.clone(),
        signature_technique_id: entity.signature_technique_id,
        ultimate_technique_id: entity.ultimate_technique_id,
    }
}
