//! Tick complexity scoring for dynamic LLM backend selection.
//!
//! Not every decision an autonomous character makes is equally hard. An
//! agent alone gathering ore needs a cheap fast model. An agent surrounded
//! by hostiles, sitting on a ready-to-turn-in quest, or holding a pending
//! trade benefits from a more capable model.
//!
//! This module scores the complexity of an agent's decision context from
//! its [`AgentPerception`] and produces a [`ComplexityLevel`] the runner
//! uses to route the LLM call to the appropriate backend.

use shard_types::perception::AgentPerception;

// ---------------------------------------------------------------------------
// Complexity level
// ---------------------------------------------------------------------------

/// The complexity tier of an agent's decision context for a given tick.
///
/// Determines which LLM backend handles the decision:
/// - [`Low`](ComplexityLevel::Low) and [`Medium`](ComplexityLevel::Medium)
///   route to the primary (cheap/fast) backend.
/// - [`High`](ComplexityLevel::High) routes to the escalation (capable)
///   backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexityLevel {
    /// Routine gathering, uncontested movement, no one nearby.
    Low,
    /// A party present, a single hostile, a pending trade.
    Medium,
    /// Multiple hostiles, a boss nearby, a completable quest, low health.
    High,
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring thresholds
// ---------------------------------------------------------------------------

/// Score at or above which the decision is classified as [`ComplexityLevel::Medium`].
const MEDIUM_THRESHOLD: u32 = 3;

/// Score at or above which the decision is classified as [`ComplexityLevel::High`].
const HIGH_THRESHOLD: u32 = 7;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score the complexity of an agent's decision context.
///
/// # Scoring factors
///
/// | Factor | Points |
/// |--------|--------|
/// | Hostile entities nearby | 1 per entity (max 3) |
/// | Pending trades | 1 per trade (max 2) |
/// | A merchant/quest-giver/trainer nearby | 1 |
/// | Notifications present | 1 per notification (max 3) |
/// | A boss-tier mob nearby | 2 |
/// | In a party | 2 |
/// | A quest is ready to complete | 3 |
/// | Low health (< 30% of max) | 1 |
/// | Low essence (< 30% of max) | 1 |
/// | Long chat history (>= 3 turns) | 1 |
///
/// The total is then compared against thresholds:
/// - `< 3` => [`Low`](ComplexityLevel::Low)
/// - `3..7` => [`Medium`](ComplexityLevel::Medium)
/// - `>= 7` => [`High`](ComplexityLevel::High)
pub fn score_complexity(perception: &AgentPerception, chat_history_len: usize) -> ComplexityLevel {
    let score = compute_raw_score(perception, chat_history_len);

    if score >= HIGH_THRESHOLD {
        ComplexityLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::Low
    }
}

/// Compute the raw numeric complexity score from a perception payload.
///
/// Exposed as a separate function so tests can verify exact scores.
fn compute_raw_score(perception: &AgentPerception, chat_history_len: usize) -> u32 {
    let mut score: u32 = 0;

    let hostile_count = perception.nearby_entities.iter().filter(|e| e.hostile).count();
    score = score.saturating_add(std::cmp::min(hostile_count, 3) as u32);

    let trade_count = perception.pending_trades.len();
    score = score.saturating_add(std::cmp::min(trade_count, 2) as u32);

    let has_service_npc = perception.nearby_entities.iter().any(|e| {
        matches!(
            e.kind,
            shard_types::enums::EntityKind::Merchant
                | shard_types::enums::EntityKind::QuestGiver
                | shard_types::enums::EntityKind::Trainer
        )
    });
    if has_service_npc {
        score = score.saturating_add(1);
    }

    let notification_count = perception.notifications.len();
    score = score.saturating_add(std::cmp::min(notification_count, 3) as u32);

    let has_boss = perception
        .nearby_entities
        .iter()
        .any(|e| e.kind == shard_types::enums::EntityKind::Boss);
    if has_boss {
        score = score.saturating_add(2);
    }

    if perception.party.is_some() {
        score = score.saturating_add(2);
    }

    let quest_ready = perception.available_quests.iter().any(|q| q.ready_to_complete);
    if quest_ready {
        score = score.saturating_add(3);
    }

    let low_health = perception.self_state.max_hp > 0
        && perception.self_state.hp.saturating_mul(100) < perception.self_state.max_hp.saturating_mul(30);
    if low_health {
        score = score.saturating_add(1);
    }

    let low_essence = perception.self_state.max_essence > 0
        && perception.self_state.essence.saturating_mul(100)
            < perception.self_state.max_essence.saturating_mul(30);
    if low_essence {
        score = score.saturating_add(1);
    }

    if chat_history_len >= 3 {
        score = score.saturating_add(1);
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::enums::{ClassId, EntityKind, RaceId};
    use shard_types::ids::{EntityId, ZoneId};
    use shard_types::perception::{SelfState, VisibleEntity};
    use shard_types::structs::Stats;

    fn base_perception() -> AgentPerception {
        AgentPerception {
            tick: 1,
            zone_id: ZoneId::new(),
            self_state: SelfState {
                id: EntityId::new(),
                name: "Test".to_owned(),
                level: 10,
                xp: 0,
                race_id: RaceId::Human,
                class_id: ClassId::Warrior,
                hp: 100,
                max_hp: 100,
                essence: 50,
                max_essence: 50,
                x: 0.0,
                y: 0.0,
                effective_stats: Stats {
                    strength: 0,
                    agility: 0,
                    intellect: 0,
                    vitality: 0,
                },
                equipment: Default::default(),
                learned_techniques: Vec::new(),
                on_cooldown: Default::default(),
                active_effects: Vec::new(),
                gold_balance: "0g".to_owned(),
                copper_balance: 0,
            },
            nearby_entities: Vec::new(),
            available_quests: Vec::new(),
            party: None,
            pending_trades: Vec::new(),
            notifications: Vec::new(),
        }
    }

    fn hostile() -> VisibleEntity {
        VisibleEntity {
            id: EntityId::new(),
            kind: EntityKind::Mob,
            name: "wolf".to_owned(),
            x: 1.0,
            y: 1.0,
            hp: Some(10),
            max_hp: Some(10),
            level: Some(5),
            charges: None,
            hostile: true,
        }
    }

    #[test]
    fn solo_gathering_is_low() {
        let perception = base_perception();
        assert_eq!(score_complexity(&perception, 0), ComplexityLevel::Low);
    }

    #[test]
    fn single_hostile_plus_low_health_stays_below_medium() {
        let mut perception = base_perception();
        perception.nearby_entities.push(hostile());
        assert_eq!(compute_raw_score(&perception, 0), 1);
    }

    #[test]
    fn party_and_hostile_is_medium() {
        let mut perception = base_perception();
        perception.nearby_entities.push(hostile());
        perception.party = Some(shard_types::perception::PartySummary {
            id: shard_types::ids::PartyId::new(),
            member_names: vec!["Ally".to_owned()],
        });
        assert_eq!(score_complexity(&perception, 0), ComplexityLevel::Medium);
    }

    #[test]
    fn boss_and_multiple_hostiles_and_low_health_is_high() {
        let mut perception = base_perception();
        perception.self_state.hp = 10;
        for _ in 0..3 {
            perception.nearby_entities.push(hostile());
        }
        let mut boss = hostile();
        boss.kind = EntityKind::Boss;
        perception.nearby_entities.push(boss);

        assert_eq!(score_complexity(&perception, 0), ComplexityLevel::High);
    }

    #[test]
    fn ready_quest_alone_reaches_medium() {
        let mut perception = base_perception();
        perception.available_quests.push(shard_types::perception::VisibleQuest {
            id: shard_types::ids::QuestId::new(),
            name: "Boars".to_owned(),
            description: "desc".to_owned(),
            accepted: true,
            ready_to_complete: true,
        });
        assert_eq!(score_complexity(&perception, 0), ComplexityLevel::Medium);
    }
}
