//! Quality and stat rolls for crafted equipment (`spec.md` §4.F `craft`,
//! `quality_rollable` recipes).
//!
//! Recipes that are not `quality_rollable` (food, potions, raw materials)
//! mint a fixed item and never reach this module; only equipment/
//! jewelcrafting outputs roll a [`Quality`] tier, scaled stats, and an
//! optional bonus affix.

use rand::Rng;
use shard_types::{AffixStat, BonusAffix, Quality, Stats};

/// Cumulative quality-roll weights, common to rare.
const QUALITY_WEIGHTS: [(Quality, f64); 4] = [
    (Quality::Common, 0.55),
    (Quality::Uncommon, 0.28),
    (Quality::Rare, 0.13),
    (Quality::Epic, 0.04),
];

/// Stat multiplier applied to a recipe's `base_stats` for each quality tier.
const fn stat_multiplier(quality: Quality) -> f64 {
    match quality {
        Quality::Common => 1.0,
        Quality::Uncommon => 1.15,
        Quality::Rare => 1.35,
        Quality::Epic => 1.6,
    }
}

/// Roll a quality tier using [`QUALITY_WEIGHTS`].
pub fn roll_quality(rng: &mut impl Rng) -> Quality {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (quality, weight) in QUALITY_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return quality;
        }
    }
    Quality::Common
}

/// Scale `base_stats` by `quality`'s multiplier.
#[must_use]
pub fn roll_stats(base_stats: Stats, quality: Quality) -> Stats {
    let multiplier = stat_multiplier(quality);
    #[allow(clippy::cast_possible_truncation)]
    let scale = |value: i32| (f64::from(value) * multiplier) as i32;
    Stats {
        strength: scale(base_stats.strength),
        agility: scale(base_stats.agility),
        intellect: scale(base_stats.intellect),
        vitality: scale(base_stats.vitality),
    }
}

/// Possible stats a bonus affix can roll onto.
const AFFIX_STATS: [AffixStat; 4] =
    [AffixStat::Strength, AffixStat::Agility, AffixStat::Intellect, AffixStat::Vitality];

/// Roll a bonus affix for `quality`, or `None` below `Rare`.
///
/// `Rare` and `Epic` both roll one [`BonusAffix`] -- `EquippedItem` has a
/// single bonus-affix slot, so Epic's second affix is not modeled.
#[must_use]
pub fn roll_bonus_affix(quality: Quality, rng: &mut impl Rng) -> Option<BonusAffix> {
    if matches!(quality, Quality::Common | Quality::Uncommon) {
        return None;
    }
    let idx = rng.random_range(0..AFFIX_STATS.len());
    let amount = rng.random_range(1..=5);
    Some(BonusAffix { stat: AFFIX_STATS[idx], amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn quality_weights_sum_to_one() {
        let total: f64 = QUALITY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stat_roll_scales_up_with_quality() {
        let base = Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 };
        let common = roll_stats(base, Quality::Common);
        let epic = roll_stats(base, Quality::Epic);
        assert_eq!(common.strength, 10);
        assert!(epic.strength > common.strength);
    }

    #[test]
    fn common_and_uncommon_never_roll_an_affix() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(roll_bonus_affix(Quality::Common, &mut rng), None);
        assert_eq!(roll_bonus_affix(Quality::Uncommon, &mut rng), None);
    }

    #[test]
    fn rare_and_epic_always_roll_an_affix() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(roll_bonus_affix(Quality::Rare, &mut rng).is_some());
        assert!(roll_bonus_affix(Quality::Epic, &mut rng).is_some());
    }
}
