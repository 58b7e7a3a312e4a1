//! Deterministic target resolution for autonomous characters.
//!
//! The LLM only ever picks a coarse focus/strategy or a coarse action type
//! (`update_focus`/`take_action`, per the tool schema described in
//! `actions.j2`). It never sees raw coordinates or entity ids to reason
//! about -- that would burn tokens on arithmetic a deterministic function
//! does better. [`resolve_action`] takes the coarse choice plus the current
//! [`AgentPerception`] and fills in a concrete, submittable [`ResolvedAction`].
//!
//! This same function backs two call sites: the LLM-bypass fast path (an
//! agent whose current focus has an obvious next step doesn't need to ask
//! the model at all) and finalizing whatever the LLM decided.

use shard_types::enums::{ActionType, EntityKind, Profession};
use shard_types::ids::{EntityId, QuestId, RecipeId, TechniqueId};
use shard_types::perception::{AgentPerception, VisibleEntity};
use shard_types::structs::AgentFocus;

use crate::costs::DEFAULT_MELEE_RANGE;

/// A concrete, ready-to-submit action, with targets filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAction {
    /// Walk toward a point; the action pipeline clamps to zone bounds.
    Move { x: f64, y: f64 },
    /// Attack a specific entity.
    Attack { target: EntityId },
    /// Use a learned technique on a target (or self, when `target` is `None`).
    UseTechnique {
        technique: TechniqueId,
        target: Option<EntityId>,
    },
    /// Gather from a specific resource node.
    Gather {
        node: EntityId,
        profession: Profession,
    },
    /// Craft at a specific station using a specific recipe.
    Craft {
        station: EntityId,
        recipe: RecipeId,
        profession: Profession,
    },
    /// In range of a crafting station but no recipe has been chosen yet;
    /// the caller must pick one via the catalog (profession + station
    /// kind + materials on hand) before submitting a [`Self::Craft`].
    ReadyToCraft {
        station: EntityId,
        profession: Profession,
    },
    /// Complete a quest that is ready to turn in.
    QuestComplete { quest: QuestId },
    /// Nothing useful to do this cycle; hold position.
    Idle,
}

/// Distance squared between the controlled entity and a visible entity.
fn dist_sq(perception: &AgentPerception, other: &VisibleEntity) -> f64 {
    let dx = perception.self_state.x - other.x;
    let dy = perception.self_state.y - other.y;
    dx.mul_add(dx, dy * dy)
}

/// The nearest entity matching `predicate`, if any.
fn nearest<'p>(
    perception: &'p AgentPerception,
    predicate: impl Fn(&VisibleEntity) -> bool,
) -> Option<&'p VisibleEntity> {
    perception
        .nearby_entities
        .iter()
        .filter(|e| predicate(e))
        .min_by(|a, b| {
            dist_sq(perception, a)
                .partial_cmp(&dist_sq(perception, b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// The resource-node entity kind an agent should target for a profession.
const fn node_kind_for_profession(profession: Profession) -> Option<EntityKind> {
    match profession {
        Profession::Mining => Some(EntityKind::OreNode),
        Profession::Herbalism => Some(EntityKind::FlowerNode),
        Profession::Skinning => Some(EntityKind::Corpse),
        _ => None,
    }
}

/// The crafting station entity kind for a profession.
const fn station_kind_for_profession(profession: Profession) -> Option<EntityKind> {
    match profession {
        Profession::Alchemy => Some(EntityKind::AlchemyLab),
        Profession::Cooking => Some(EntityKind::Campfire),
        Profession::Forging | Profession::Leatherworking | Profession::Jewelcrafting => {
            Some(EntityKind::Forge)
        }
        _ => None,
    }
}

/// Infer the profession implied by a resource-node or station entity kind.
///
/// `EntityKind::Forge` serves three professions; without an eligibility map
/// in `SelfState` we guess `Forging` first and let a `ProfessionMissing`
/// rejection correct us next cycle.
const fn profession_for_node(kind: EntityKind) -> Option<Profession> {
    match kind {
        EntityKind::OreNode => Some(Profession::Mining),
        EntityKind::FlowerNode => Some(Profession::Herbalism),
        EntityKind::Corpse => Some(Profession::Skinning),
        EntityKind::AlchemyLab => Some(Profession::Alchemy),
        EntityKind::Campfire => Some(Profession::Cooking),
        EntityKind::Forge => Some(Profession::Forging),
        _ => None,
    }
}

/// Resolve a coarse action type (plus an optional profession hint) against
/// the current perception into a concrete action.
///
/// `profession_hint` comes from whichever `AgentFocus` is active (e.g.
/// [`AgentFocus::Gathering`] with no further detail); when the focus itself
/// names a profession-shaped activity but the caller has not narrowed it
/// further, pass `None` and let [`nearest_profession_target`] pick whichever
/// node/station is closest.
pub fn resolve_action(
    action_type: ActionType,
    profession_hint: Option<Profession>,
    perception: &AgentPerception,
) -> ResolvedAction {
    match action_type {
        ActionType::Attack => resolve_combat(perception),
        ActionType::Gather => resolve_gather(perception, profession_hint),
        ActionType::Craft => resolve_craft(perception, profession_hint),
        ActionType::QuestComplete => resolve_quest_complete(perception),
        ActionType::Move | ActionType::Spawn | ActionType::Logout => ResolvedAction::Idle,
        _ => ResolvedAction::Idle,
    }
}

/// Resolve the default action implied by an [`AgentFocus`] alone, with no
/// explicit `take_action` from the LLM -- the fast-path bypass.
pub fn default_action_for_focus(
    focus: AgentFocus,
    perception: &AgentPerception,
) -> ResolvedAction {
    match focus {
        AgentFocus::Combat => resolve_combat(perception),
        AgentFocus::Gathering => resolve_gather(perception, None),
        AgentFocus::Alchemy => resolve_gather_or_craft(perception, Profession::Alchemy),
        AgentFocus::Cooking => resolve_gather_or_craft(perception, Profession::Cooking),
        AgentFocus::Crafting => resolve_craft(perception, None),
        AgentFocus::Questing => resolve_quest_complete(perception),
        AgentFocus::Enchanting | AgentFocus::Trading | AgentFocus::Idle => ResolvedAction::Idle,
    }
}

fn resolve_combat(perception: &AgentPerception) -> ResolvedAction {
    let Some(target) = nearest(perception, |e| e.hostile) else {
        return ResolvedAction::Idle;
    };
    if dist_sq(perception, target) <= DEFAULT_MELEE_RANGE * DEFAULT_MELEE_RANGE {
        ResolvedAction::Attack { target: target.id }
    } else {
        ResolvedAction::Move {
            x: target.x,
            y: target.y,
        }
    }
}

fn resolve_gather(perception: &AgentPerception, profession_hint: Option<Profession>) -> ResolvedAction {
    let wants_kind = profession_hint.and_then(node_kind_for_profession);
    let node = nearest(perception, |e| match wants_kind {
        Some(kind) => e.kind == kind,
        None => node_kind_for_profession_matches(e.kind),
    });
    resolve_gather_target(perception, node)
}

/// Finish resolving a gather target once the candidate node is known:
/// move into range, or gather if already there. Returns `Idle` if the node
/// kind has no associated profession (should not happen for a node that
/// passed [`node_kind_for_profession_matches`]).
fn resolve_gather_target(
    perception: &AgentPerception,
    node: Option<&VisibleEntity>,
) -> ResolvedAction {
    let Some(node) = node else {
        return ResolvedAction::Idle;
    };
    let Some(profession) = profession_for_node(node.kind) else {
        return ResolvedAction::Idle;
    };
    if dist_sq(perception, node) <= DEFAULT_MELEE_RANGE * DEFAULT_MELEE_RANGE {
        ResolvedAction::Gather {
            node: node.id,
            profession,
        }
    } else {
        ResolvedAction::Move {
            x: node.x,
            y: node.y,
        }
    }
}

/// True when `kind` is one of the gatherable resource node kinds (as
/// opposed to a crafting station kind), used when no profession hint is
/// available and we're picking among any reachable node.
const fn node_kind_for_profession_matches(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::OreNode | EntityKind::FlowerNode | EntityKind::Corpse
    )
}

fn resolve_craft(perception: &AgentPerception, profession_hint: Option<Profession>) -> ResolvedAction {
    let wants_kind = profession_hint.and_then(station_kind_for_profession);
    let station = nearest(perception, |e| match wants_kind {
        Some(kind) => e.kind == kind,
        None => matches!(
            e.kind,
            EntityKind::Forge | EntityKind::AlchemyLab | EntityKind::Campfire
        ),
    });

    let Some(station) = station else {
        return ResolvedAction::Idle;
    };
    let Some(profession) = profession_hint.or_else(|| profession_for_node(station.kind)) else {
        return ResolvedAction::Idle;
    };
    if dist_sq(perception, station) > DEFAULT_MELEE_RANGE * DEFAULT_MELEE_RANGE {
        return ResolvedAction::Move {
            x: station.x,
            y: station.y,
        };
    }

    // Recipe selection needs the catalog, which this module deliberately
    // doesn't hold; the caller picks a recipe and builds the final Craft.
    ResolvedAction::ReadyToCraft {
        station: station.id,
        profession,
    }
}

/// For gathering-profession focuses that also have a crafting counterpart
/// (alchemy ingredients vs. alchemy lab, cooking ingredients vs. campfire),
/// prefer whichever of node/station is currently closer.
fn resolve_gather_or_craft(perception: &AgentPerception, profession: Profession) -> ResolvedAction {
    let node = nearest(perception, |e| {
        node_kind_for_profession(profession) == Some(e.kind)
    });
    let station = nearest(perception, |e| {
        station_kind_for_profession(profession) == Some(e.kind)
    });

    match (node, station) {
        (Some(n), Some(s)) => {
            if dist_sq(perception, n) <= dist_sq(perception, s) {
                resolve_gather_target(perception, Some(n))
            } else {
                resolve_craft(perception, Some(profession))
            }
        }
        (Some(_), None) => resolve_gather(perception, Some(profession)),
        (None, Some(_)) => resolve_craft(perception, Some(profession)),
        (None, None) => ResolvedAction::Idle,
    }
}

fn resolve_quest_complete(perception: &AgentPerception) -> ResolvedAction {
    perception
        .available_quests
        .iter()
        .find(|q| q.ready_to_complete)
        .map_or(ResolvedAction::Idle, |q| ResolvedAction::QuestComplete {
            quest: q.id,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::ids::{EntityId as Eid, ZoneId};
    use shard_types::perception::SelfState;
    use shard_types::structs::Stats;

    fn empty_perception() -> AgentPerception {
        AgentPerception {
            tick: 0,
            zone_id: ZoneId::new(),
            self_state: SelfState {
                id: Eid::new(),
                name: "Test".to_owned(),
                level: 1,
                xp: 0,
                race_id: shard_types::enums::RaceId::Human,
                class_id: shard_types::enums::ClassId::Warrior,
                hp: 100,
                max_hp: 100,
                essence: 10,
                max_essence: 10,
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

    fn visible(kind: EntityKind, x: f64, y: f64, hostile: bool) -> VisibleEntity {
        VisibleEntity {
            id: EntityId::new(),
            kind,
            name: "target".to_owned(),
            x,
            y,
            hp: Some(10),
            max_hp: Some(10),
            level: Some(1),
            charges: None,
            hostile,
        }
    }

    #[test]
    fn combat_moves_toward_distant_hostile() {
        let mut perception = empty_perception();
        perception
            .nearby_entities
            .push(visible(EntityKind::Mob, 50.0, 50.0, true));

        match resolve_combat(&perception) {
            ResolvedAction::Move { x, y } => {
                assert!((x - 50.0).abs() < f64::EPSILON);
                assert!((y - 50.0).abs() < f64::EPSILON);
            }
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn combat_attacks_hostile_in_range() {
        let mut perception = empty_perception();
        perception
            .nearby_entities
            .push(visible(EntityKind::Mob, 1.0, 0.0, true));

        assert!(matches!(
            resolve_combat(&perception),
            ResolvedAction::Attack { .. }
        ));
    }

    #[test]
    fn combat_idle_with_no_hostiles() {
        let perception = empty_perception();
        assert_eq!(resolve_combat(&perception), ResolvedAction::Idle);
    }

    #[test]
    fn gather_picks_nearest_matching_node() {
        let mut perception = empty_perception();
        perception
            .nearby_entities
            .push(visible(EntityKind::OreNode, 100.0, 0.0, false));
        perception
            .nearby_entities
            .push(visible(EntityKind::FlowerNode, 1.0, 0.0, false));

        match resolve_gather(&perception, Some(Profession::Herbalism)) {
            ResolvedAction::Gather { .. } => {}
            other => panic!("expected Gather, got {other:?}"),
        }
    }

    #[test]
    fn quest_complete_finds_ready_quest() {
        let mut perception = empty_perception();
        perception.available_quests.push(shard_types::perception::VisibleQuest {
            id: QuestId::new(),
            name: "Boars".to_owned(),
            description: "Kill boars".to_owned(),
            accepted: true,
            ready_to_complete: true,
        });

        assert!(matches!(
            resolve_quest_complete(&perception),
            ResolvedAction::QuestComplete { .. }
        ));
    }
}
