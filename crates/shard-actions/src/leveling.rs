//! Character leveling: the XP table, the race/class growth curve, and
//! signature/ultimate technique unlocks (`spec.md` §4.G "Leveling").
//!
//! Grounded in `shard-world`'s `recalculate_entity_vitals` -- a function
//! that mutates an [`Entity`] directly rather than returning a description
//! of the mutation, since leveling is solely about `Entity`'s own fields
//! and has no world-state side effects a caller would need to apply
//! elsewhere.

use shard_types::{ClassId, Entity, RaceId, Stats};

/// Highest attainable character level.
pub const MAX_LEVEL: u32 = 50;

/// Level at which a signature technique is generated and learned.
pub const SIGNATURE_LEVEL: u32 = 15;

/// Level at which an ultimate technique is generated and learned.
pub const ULTIMATE_LEVEL: u32 = 30;

/// XP required to advance from `level` to `level + 1`.
///
/// Deterministic by level per `spec.md` §4.G; not otherwise specified, so
/// this resolves that silence with a curve proportional to level squared --
/// steep enough that late levels are a real grind without overflowing `u64`
/// even at [`MAX_LEVEL`].
#[must_use]
pub fn xp_to_next_level(level: u32) -> u64 {
    let level = u64::from(level.clamp(1, MAX_LEVEL));
    level.saturating_mul(level).saturating_mul(250)
}

/// Per-level base stat growth before race/class weighting.
const BASE_GROWTH: Stats = Stats { strength: 2, agility: 2, intellect: 2, vitality: 2 };

/// Race-specific stat growth deltas added to [`BASE_GROWTH`] each level,
/// matching the lean each [`RaceId`] variant's doc comment describes.
const fn race_growth(race: RaceId) -> Stats {
    match race {
        RaceId::Human => Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 },
        RaceId::Elf => Stats { strength: -1, agility: 1, intellect: 1, vitality: -1 },
        RaceId::Dwarf => Stats { strength: 1, agility: -1, intellect: 0, vitality: 1 },
        RaceId::Orc => Stats { strength: 2, agility: 0, intellect: -1, vitality: -1 },
    }
}

/// Class-specific stat growth deltas added each level, matching the
/// primary-stat lean each [`ClassId`] variant's doc comment describes.
const fn class_growth(class: ClassId) -> Stats {
    match class {
        ClassId::Warrior => Stats { strength: 2, agility: 0, intellect: 0, vitality: 1 },
        ClassId::Mage => Stats { strength: 0, agility: 0, intellect: 2, vitality: 0 },
        ClassId::Rogue => Stats { strength: 0, agility: 2, intellect: 0, vitality: 0 },
        ClassId::Cleric => Stats { strength: 0, agility: 0, intellect: 2, vitality: 1 },
        ClassId::Ranger => Stats { strength: 0, agility: 2, intellect: 0, vitality: 0 },
    }
}

/// The stat growth applied for one level-up of a `(race, class)` character.
#[must_use]
pub fn growth_for_level_up(race: RaceId, class: ClassId) -> Stats {
    BASE_GROWTH.saturating_add(race_growth(race)).saturating_add(class_growth(class))
}

/// Hp granted per point of vitality, and essence granted per point of
/// intellect, when deriving `max_hp`/`max_essence` from `stats`.
const HP_PER_VITALITY: u32 = 10;
const ESSENCE_PER_INTELLECT: u32 = 5;

/// Recompute `max_hp`/`max_essence` from base stats. Does not touch
/// `effective_stats`; that is `shard-world`'s `recalculate_entity_vitals`'s
/// job once equipment/effects are folded in.
#[must_use]
pub fn max_vitals_for_stats(stats: Stats) -> (u32, u32) {
    let vitality = u32::try_from(stats.vitality.max(0)).unwrap_or(0);
    let intellect = u32::try_from(stats.intellect.max(0)).unwrap_or(0);
    let max_hp = vitality.saturating_mul(HP_PER_VITALITY).saturating_add(50);
    let max_essence = intellect.saturating_mul(ESSENCE_PER_INTELLECT).saturating_add(20);
    (max_hp, max_essence)
}

/// One level-up that occurred while applying an XP gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpEvent {
    /// The level reached.
    pub new_level: u32,
    /// Whether this level-up unlocked the signature technique slot.
    pub unlocked_signature: bool,
    /// Whether this level-up unlocked the ultimate technique slot.
    pub unlocked_ultimate: bool,
}

/// Award `xp_gained` to `entity`, applying as many level-ups as the XP
/// supports. Mutates `xp`, `level`, `stats`, `max_hp`, and `max_essence`
/// directly; does not touch `effective_stats` or current `hp`/`essence`,
/// which the caller recomputes via `shard_world::recalculate_entity_vitals`
/// once this returns.
///
/// Returns one [`LevelUpEvent`] per level gained, in order. Signature/
/// ultimate technique *generation* is the caller's job (it needs the
/// entity's wallet address and class, which this function does not take),
/// triggered by `unlocked_signature`/`unlocked_ultimate` on the returned
/// events.
pub fn apply_xp_gain(entity: &mut Entity, xp_gained: u64) -> Vec<LevelUpEvent> {
    let mut events = Vec::new();
    let Some(mut xp) = entity.xp else { return events };
    let Some(mut level) = entity.level else { return events };
    let Some(race) = entity.race_id else { return events };
    let Some(class) = entity.class_id else { return events };

    xp = xp.saturating_add(xp_gained);

    while level < MAX_LEVEL {
        let required = xp_to_next_level(level);
        if xp < required {
            break;
        }
        xp = xp.saturating_sub(required);
        level = level.saturating_add(1);

        let growth = growth_for_level_up(race, class);
        entity.stats = entity.stats.saturating_add(growth);
        let (max_hp, max_essence) = max_vitals_for_stats(entity.stats);
        entity.max_hp = max_hp;
        if entity.max_essence.is_some() {
            entity.max_essence = Some(max_essence);
        }

        events.push(LevelUpEvent {
            new_level: level,
            unlocked_signature: level == SIGNATURE_LEVEL,
            unlocked_ultimate: level == ULTIMATE_LEVEL,
        });
    }

    entity.xp = Some(xp);
    entity.level = Some(level);
    events
}

/// Reduce `xp` by [`crate::costs::XP_DEBT_FRACTION`] of the current level's
/// progress, applied on player death (`spec.md` §4.G "XP debt applied").
/// Never delevels; the debt is floored at zero progress into the level.
pub fn apply_xp_debt(entity: &mut Entity) {
    let Some(xp) = entity.xp else { return };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let debt = (xp as f64 * crate::costs::XP_DEBT_FRACTION) as u64;
    entity.xp = Some(xp.saturating_sub(debt));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_entity(level: u32, xp: u64) -> Entity {
        Entity {
            id: shard_types::EntityId::new(),
            kind: shard_types::EntityKind::Player,
            name: "Test".to_owned(),
            x: 0.0,
            y: 0.0,
            hp: 100,
            max_hp: 100,
            essence: Some(50),
            max_essence: Some(50),
            wallet_address: Some("0xabc".to_owned()),
            character_token_id: None,
            level: Some(level),
            xp: Some(xp),
            xp_reward: None,
            race_id: Some(RaceId::Human),
            class_id: Some(ClassId::Warrior),
            gender: None,
            kills: Some(0),
            stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            effective_stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
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

    #[test]
    fn no_level_up_below_threshold() {
        let mut entity = base_entity(1, 0);
        let events = apply_xp_gain(&mut entity, 10);
        assert!(events.is_empty());
        assert_eq!(entity.xp, Some(10));
        assert_eq!(entity.level, Some(1));
    }

    #[test]
    fn single_level_up_applies_growth() {
        let mut entity = base_entity(1, 0);
        let required = xp_to_next_level(1);
        let events = apply_xp_gain(&mut entity, required);
        assert_eq!(events.len(), 1);
        assert_eq!(entity.level, Some(2));
        assert_eq!(entity.xp, Some(0));
        assert_eq!(entity.stats.strength, 12); // 10 + base(2) + warrior(2) + human(0)
    }

    #[test]
    fn signature_unlocks_at_fifteen() {
        let mut entity = base_entity(14, 0);
        let required = xp_to_next_level(14);
        let events = apply_xp_gain(&mut entity, required);
        assert_eq!(events.len(), 1);
        assert!(events[0].unlocked_signature);
        assert_eq!(entity.level, Some(15));
    }

    #[test]
    fn multi_level_gain_chains_events() {
        let mut entity = base_entity(1, 0);
        let huge_gain = xp_to_next_level(1) + xp_to_next_level(2) + xp_to_next_level(3) + 1;
        let events = apply_xp_gain(&mut entity, huge_gain);
        assert_eq!(events.len(), 3);
        assert_eq!(entity.level, Some(4));
    }

    #[test]
    fn xp_debt_reduces_but_never_deleveled() {
        let mut entity = base_entity(5, 1_000);
        apply_xp_debt(&mut entity);
        assert_eq!(entity.xp, Some(900));
        assert_eq!(entity.level, Some(5));
    }
}
