//! Fixed gameplay constants: profession XP awards, default ranges, and the
//! repair price formula (§4.F/§4.G).
//!
//! Mirrors the teacher's `actions/costs.rs` const-lookup-table idiom: every
//! number a handler needs lives here, named, rather than inline in the
//! handler body.

use shard_types::Profession;

/// Profession XP awarded for one successful gather action.
#[must_use]
pub const fn gather_xp(profession: Profession) -> u32 {
    match profession {
        Profession::Mining => 8,
        Profession::Herbalism => 6,
        Profession::Skinning => 7,
        // Gather only covers mining/herbalism/skinning; the remaining
        // variants never reach this function from the `gather` handler.
        Profession::Alchemy
        | Profession::Cooking
        | Profession::Forging
        | Profession::Leatherworking
        | Profession::Jewelcrafting => 0,
    }
}

/// Profession XP awarded for one successful craft action.
#[must_use]
pub const fn craft_xp(profession: Profession) -> u32 {
    match profession {
        Profession::Forging => 12,
        Profession::Alchemy => 10,
        Profession::Cooking => 8,
        Profession::Leatherworking => 10,
        Profession::Jewelcrafting => 14,
        // Craft only covers the five crafting professions; gathering
        // professions never reach this function from the `craft` handler.
        Profession::Mining | Profession::Herbalism | Profession::Skinning => 0,
    }
}

/// XP required to advance a profession from `level` to `level + 1`.
///
/// Mirrors the teacher's skill XP curve (`level * 100`), reused here since
/// profession skill-ups follow the same shape as the teacher's generic
/// skills, just applied to the MMO's gathering/crafting professions instead.
#[must_use]
pub const fn profession_xp_to_next_level(level: u32) -> u32 {
    level.saturating_add(1).saturating_mul(100)
}

/// Default melee attack range, in world units, used when the attacker has
/// no weapon equipped (`spec.md` §4.F: "unarmed attacks... use the default
/// melee range baked into the combat resolver").
pub const DEFAULT_MELEE_RANGE: f64 = 2.0;

/// Base critical-hit chance before agility scaling.
pub const BASE_CRIT_CHANCE: f64 = 0.05;

/// Agility points required for one percentage point of crit chance.
pub const CRIT_CHANCE_PER_AGILITY: f64 = 0.002;

/// Maximum crit chance, regardless of stats.
pub const MAX_CRIT_CHANCE: f64 = 0.6;

/// Base dodge chance before agility scaling, applied from the defender's
/// agility against an incoming weapon/technique attack.
pub const BASE_DODGE_CHANCE: f64 = 0.03;

/// Agility points required for one percentage point of dodge chance.
pub const DODGE_CHANCE_PER_AGILITY: f64 = 0.0015;

/// Maximum dodge chance, regardless of stats.
pub const MAX_DODGE_CHANCE: f64 = 0.4;

/// Damage multiplier applied on a critical hit.
pub const CRIT_DAMAGE_MULTIPLIER: f64 = 1.5;

/// Fraction of dealt damage returned as lifesteal when a technique's
/// secondary effect does not otherwise specify a heal.
pub const DEFAULT_LIFESTEAL_FRACTION: f64 = 0.0;

/// Caster stat points required for one point of a technique's base power
/// (`spec.md` §4.G: base power is `floor(5 + primary_stat × 0.5)`, before
/// the technique's own `power_multiplier` is applied as a separate step).
pub const PRIMARY_STAT_POWER_FACTOR: f64 = 0.5;

/// Flat power floor added regardless of stats, before `power_multiplier`.
pub const BASE_POWER_FLOOR: u32 = 5;

/// Per-additional-member XP bonus applied to a party kill split, capped at
/// [`shard_types::PARTY_MAX_SIZE`] members (`spec.md` §4.G: "+10% per
/// additional member, capped at party size 5").
pub const PARTY_XP_BONUS_PER_MEMBER: f64 = 0.10;

/// Copper cost to fully repair one point of durability.
pub const REPAIR_COPPER_PER_DURABILITY: u64 = 2;

/// Fraction of current-level XP progress lost on player death (`spec.md`
/// §4.G "XP debt applied"; see `GLOSSARY` -- the exact debt formula is not
/// specified there, so this resolves that silence deterministically).
pub const XP_DEBT_FRACTION: f64 = 0.10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_xp_covers_gathering_professions() {
        assert_eq!(gather_xp(Profession::Mining), 8);
        assert_eq!(gather_xp(Profession::Herbalism), 6);
        assert_eq!(gather_xp(Profession::Skinning), 7);
    }

    #[test]
    fn craft_xp_covers_crafting_professions() {
        assert_eq!(craft_xp(Profession::Forging), 12);
        assert_eq!(craft_xp(Profession::Jewelcrafting), 14);
    }

    #[test]
    fn profession_xp_to_next_level_scales_with_level() {
        assert_eq!(profession_xp_to_next_level(0), 100);
        assert_eq!(profession_xp_to_next_level(9), 1_000);
    }
}
