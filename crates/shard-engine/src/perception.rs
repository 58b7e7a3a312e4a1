//! The live [`PerceptionSource`](shard_agent_runner::PerceptionSource)
//! implementation: builds an [`AgentPerception`] from the zone runtime
//! `shard-server`'s HTTP handlers read from.
//!
//! Mirrors `shard_server::handlers::state_query::state`'s own
//! area-of-interest read: subscribe the controlled entity, ask the AoI for
//! its visible set, then resolve each id against the zone's entity table.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use shard_agent_runner::{PerceptionSource, RunnerError};
use shard_server::AppState;
use shard_types::perception::{
    AgentPerception, PartySummary, PendingTradeSummary, SelfState, VisibleEntity, VisibleQuest,
};
use shard_types::structs::EntityRef;
use shard_types::Entity;

/// Reads [`AgentPerception`] payloads straight from the live [`AppState`]
/// shared with the HTTP surface -- autonomous agents see exactly what a
/// human client's `GET /state` would show them.
pub struct ZoneAwarePerceptionSource {
    state: Arc<AppState>,
}

impl ZoneAwarePerceptionSource {
    /// Build a perception source over the given shared application state.
    #[must_use]
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

fn self_state(entity: &Entity, gold_balance: String, copper_balance: u64) -> SelfState {
    SelfState {
        id: entity.id,
        name: entity.name.clone(),
        level: entity.level.unwrap_or(1),
        xp: entity.xp.unwrap_or(0),
        race_id: entity.race_id.unwrap_or(shard_types::RaceId::Human),
        class_id: entity.class_id.unwrap_or(shard_types::ClassId::Warrior),
        hp: entity.hp,
        max_hp: entity.max_hp,
        essence: entity.essence.unwrap_or(0),
        max_essence: entity.max_essence.unwrap_or(0),
        x: entity.x,
        y: entity.y,
        effective_stats: entity.effective_stats,
        equipment: entity.equipment.clone(),
        learned_techniques: entity.learned_techniques.iter().copied().collect(),
        on_cooldown: entity.cooldowns.clone(),
        active_effects: entity.active_effects.clone(),
        gold_balance,
        copper_balance,
    }
}

fn visible_entity(entity: &Entity, controlled: &Entity) -> VisibleEntity {
    VisibleEntity {
        id: entity.id,
        kind: entity.kind,
        name: entity.name.clone(),
        x: entity.x,
        y: entity.y,
        hp: Some(entity.hp),
        max_hp: Some(entity.max_hp),
        level: entity.level,
        charges: entity.charges,
        hostile: entity.kind == shard_types::EntityKind::Mob && entity.wallet_address != controlled.wallet_address,
    }
}

impl PerceptionSource for ZoneAwarePerceptionSource {
    fn perceive(
        &self,
        entity_ref: EntityRef,
    ) -> Pin<Box<dyn Future<Output = Result<AgentPerception, RunnerError>> + Send + '_>> {
        Box::pin(async move {
            let mut world = self.state.world.lock().await;
            let zone = world
                .zone(entity_ref.zone_id)
                .map_err(|e| RunnerError::Config(format!("{e}")))?;
            let tick = zone.tick;
            let controlled = zone
                .entity(entity_ref.entity_id)
                .map_err(|e| RunnerError::Config(format!("{e}")))?
                .clone();
            let wallet = controlled
                .wallet_address
                .clone()
                .ok_or_else(|| RunnerError::Config(format!("entity {} has no wallet", controlled.id)))?;

            let aoi = world
                .aoi_mut(entity_ref.zone_id)
                .map_err(|e| RunnerError::Config(format!("{e}")))?;
            aoi.subscribe(entity_ref.entity_id);
            let visible_ids = aoi.visible_to(entity_ref.entity_id);

            let zone = world
                .zone(entity_ref.zone_id)
                .map_err(|e| RunnerError::Config(format!("{e}")))?;
            let nearby_entities: Vec<VisibleEntity> = visible_ids
                .iter()
                .filter(|id| **id != entity_ref.entity_id)
                .filter_map(|id| zone.entity(*id).ok())
                .map(|entity| visible_entity(entity, &controlled))
                .collect();

            let available_quests: Vec<VisibleQuest> = self
                .state
                .catalog
                .all_quests()
                .map(|quest| VisibleQuest {
                    id: quest.id,
                    name: quest.name.clone(),
                    description: quest.description.clone(),
                    accepted: false,
                    ready_to_complete: shard_actions::quest::check_eligibility(&controlled, quest).is_ok(),
                })
                .collect();

            let party = match controlled.party_id {
                Some(party_id) => self.state.parties.lock().await.get(&party_id).map(|record| PartySummary {
                    id: party_id,
                    member_names: record
                        .members
                        .iter()
                        .filter_map(|id| zone.entity(*id).ok())
                        .map(|entity| entity.name.clone())
                        .collect(),
                }),
                None => None,
            };

            let pending_trades: Vec<PendingTradeSummary> = self
                .state
                .pending_trades
                .lock()
                .await
                .values()
                .filter(|trade| trade.target_id == entity_ref.entity_id)
                .map(|trade| PendingTradeSummary {
                    id: trade.id,
                    offerer_name: zone.entity(trade.proposer_id).map(|entity| entity.name.clone()).unwrap_or_else(|_| "unknown".to_owned()),
                    offer_copper: trade.offer_copper,
                    request_copper: trade.request_copper,
                })
                .collect();

            drop(world);

            let on_chain_gold = self
                .state
                .chain
                .gold_balance(&wallet)
                .await
                .map_err(|e| RunnerError::Config(format!("{e}")))?;
            let copper_balance = self.state.gold_ledger.lock().await.available_gold(&wallet, on_chain_gold);

            Ok(AgentPerception {
                tick,
                zone_id: entity_ref.zone_id,
                self_state: self_state(&controlled, on_chain_gold.to_string(), copper_balance),
                nearby_entities,
                available_quests,
                party,
                pending_trades,
                notifications: Vec::new(),
            })
        })
    }
}
