//! Execution handlers for the action pipeline (`spec.md` §4.F).
//!
//! Mirrors the teacher's `actions/handlers.rs` split: [`validation`] checks
//! run first (pure, synchronous), then a handler here performs the side
//! effects. Handlers that only touch `Entity`/effect state are synchronous;
//! handlers that move copper or items cross the [`ChainDriver`] boundary and
//! are `async`. Every handler assumes its preconditions have already been
//! validated by the caller -- it still re-checks the handful of guards that
//! need data only available at execution time (chain balances, merchant
//! stock), but range/cooldown/profession-style checks are the caller's job
//! via [`validation`].

use std::collections::BTreeMap;

use rand::Rng;
use shard_catalog::{Catalog, RecipeDefinition};
use shard_chain::ChainDriver;
use shard_ledger::ledger::TransferParams;
use shard_ledger::{ConservationLedger, GoldLedger};
use shard_techniques::TechniqueCatalog;
use shard_techniques::generator::GeneratedTier;
use shard_types::{
    ActionOutcome, EntityKind, EquipmentSlot, EquippedItem, Entity, ItemTokenId, LedgerEntryType,
    LedgerPartyType, Profession, Quality, RejectionReason, Technique, TechniqueId,
};

use crate::error::ActionError;
use crate::{combat, costs, crafting, leveling, validation};

fn empty_outcome() -> ActionOutcome {
    ActionOutcome {
        copper_delta: 0,
        item_deltas: BTreeMap::new(),
        profession_xp: BTreeMap::new(),
        details: serde_json::Value::Null,
    }
}

fn require_wallet(entity: &Entity) -> Result<&str, ActionError> {
    entity.wallet_address.as_deref().ok_or(ActionError::Rejected(RejectionReason::Unauthorized))
}

/// Apply a batch of [`leveling::LevelUpEvent`]s to `entity`: generate and
/// learn the signature/ultimate technique for any event that unlocked one.
pub fn apply_level_up_unlocks(
    entity: &mut Entity,
    events: &[leveling::LevelUpEvent],
    techniques: &mut TechniqueCatalog,
) -> Result<(), ActionError> {
    let wallet = require_wallet(entity)?.to_owned();
    let class_id = entity.class_id.ok_or(ActionError::Rejected(RejectionReason::InvalidInput))?;
    for event in events {
        if event.unlocked_signature {
            let technique = techniques.generate_and_register(&wallet, class_id, GeneratedTier::Signature);
            entity.signature_technique_id = Some(technique.id);
            entity.learned_techniques.insert(technique.id);
        }
        if event.unlocked_ultimate {
            let technique = techniques.generate_and_register(&wallet, class_id, GeneratedTier::Ultimate);
            entity.ultimate_technique_id = Some(technique.id);
            entity.learned_techniques.insert(technique.id);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

/// Reposition `entity` to `(x, y)`, clamped to `bounds`.
pub fn execute_move(entity: &mut Entity, bounds: shard_types::ZoneBounds, x: f64, y: f64) -> ActionOutcome {
    let (cx, cy) = bounds.clamp_point(x, y);
    entity.x = cx;
    entity.y = cy;
    ActionOutcome {
        details: serde_json::json!({"x": cx, "y": cy}),
        ..empty_outcome()
    }
}

// ---------------------------------------------------------------------------
// attack
// ---------------------------------------------------------------------------

/// Default attack range for an unarmed entity (`spec.md` §4.F: "unarmed
/// attacks... use the default melee range baked into the combat resolver").
pub use costs::DEFAULT_MELEE_RANGE;

/// Resolve a weapon attack from `attacker` against `defender`.
///
/// Death handling (XP award, loot, corpse creation) is the caller's job --
/// it should check `defender.is_dead()` after this call and, if true, hand
/// off to [`crate::death`].
pub fn execute_attack(
    attacker: &mut Entity,
    defender: &mut Entity,
    weapon_range: f64,
    weapon_base_damage: u32,
    rng: &mut impl Rng,
) -> Result<ActionOutcome, ActionError> {
    validation::validate_range(attacker, defender, weapon_range).map_err(ActionError::Rejected)?;

    let lifesteal_fraction = costs::DEFAULT_LIFESTEAL_FRACTION;
    let outcome = combat::resolve_basic_attack(attacker, defender, weapon_base_damage, lifesteal_fraction, rng);
    combat::apply_attack_outcome(attacker, defender, outcome);

    Ok(ActionOutcome {
        details: serde_json::json!({
            "dodged": outcome.dodged,
            "critical": outcome.critical,
            "damage": outcome.damage,
            "lifesteal": outcome.lifesteal,
            "target_id": defender.id,
        }),
        ..empty_outcome()
    })
}

// ---------------------------------------------------------------------------
// use_technique
// ---------------------------------------------------------------------------

/// Resolve casting `technique` from `caster` onto `target` (self-cast if
/// `target` is `None` or the same entity as `caster`).
///
/// Death/effect-expiry handling is the caller's job, same as
/// [`execute_attack`].
pub fn execute_use_technique(
    caster: &mut Entity,
    target: Option<&mut Entity>,
    technique: &Technique,
    current_tick: u64,
    rng: &mut impl Rng,
) -> Result<ActionOutcome, ActionError> {
    validation::validate_technique_learned(caster, technique.id).map_err(ActionError::Rejected)?;
    validation::validate_cooldown(caster, technique.id, current_tick).map_err(ActionError::Rejected)?;
    validation::validate_essence(caster, technique.essence_cost).map_err(ActionError::Rejected)?;

    let essence = caster.essence.unwrap_or(0).saturating_sub(technique.essence_cost);
    caster.essence = Some(essence);
    caster
        .cooldowns
        .insert(technique.id, current_tick.saturating_add(u64::from(technique.cooldown_ticks)));

    let (outcome, target_id) = match target {
        Some(target) => {
            validation::validate_range(caster, target, technique.area_radius.max(DEFAULT_MELEE_RANGE))
                .map_err(ActionError::Rejected)?;
            let outcome = combat::resolve_technique(technique, caster, target, current_tick, rng);
            let target_id = target.id;
            combat::apply_technique_outcome(caster, target, outcome.clone());
            (outcome, Some(target_id))
        }
        None => {
            let self_snapshot = caster.clone();
            let outcome = combat::resolve_technique(technique, caster, &self_snapshot, current_tick, rng);
            if !outcome.dodged {
                if let Some(damage) = outcome.damage {
                    let new_hp = i64::from(caster.hp) - i64::from(damage);
                    caster.set_hp(new_hp);
                }
                if let Some(heal) = outcome.heal {
                    let new_hp = i64::from(caster.hp) + i64::from(heal);
                    caster.set_hp(new_hp);
                }
                if let Some(effect) = outcome.applied_effect.clone() {
                    caster.active_effects.push(effect);
                }
            }
            (outcome, None)
        }
    };

    Ok(ActionOutcome {
        details: serde_json::json!({
            "technique_id": technique.id,
            "dodged": outcome.dodged,
            "critical": outcome.critical,
            "damage": outcome.damage,
            "heal": outcome.heal,
            "target_id": target_id,
        }),
        ..empty_outcome()
    })
}

// ---------------------------------------------------------------------------
// gather
// ---------------------------------------------------------------------------

/// Collect one charge from `node`, consuming a point of the gathering
/// tool's durability, and mint the yielded item.
///
/// On a chain mint failure the caller must roll back `node`'s charge count
/// and the tool's durability -- this function mutates both up front so the
/// caller can snapshot and restore them around the mint call.
pub async fn execute_gather(
    entity: &mut Entity,
    node: &mut Entity,
    profession: Profession,
    tool_slot: EquipmentSlot,
    output_token_id: ItemTokenId,
    catalog: &Catalog,
    chain: &ChainDriver,
    ledger: &mut ConservationLedger,
    current_tick: u64,
) -> Result<ActionOutcome, ActionError> {
    validation::validate_profession_known(entity, profession).map_err(ActionError::Rejected)?;
    validation::validate_range(entity, node, DEFAULT_MELEE_RANGE).map_err(ActionError::Rejected)?;
    validation::validate_node_charges(node.charges).map_err(ActionError::Rejected)?;
    validation::validate_tool_not_broken(entity, tool_slot).map_err(ActionError::Rejected)?;
    let mut tool_tier = 0;
    if let Some(tool) = entity.equipment.get(&tool_slot) {
        let item = catalog.item_by_token_id(tool.token_id)?;
        tool_tier = item.tool_tier.unwrap_or(0);
    }
    validation::validate_tool_tier(node.node_tier, tool_tier).map_err(ActionError::Rejected)?;

    node.charges = node.charges.map(|c| c.saturating_sub(1));
    if node.charges == Some(0) {
        node.depleted_at_tick = Some(current_tick);
    }
    let broke = entity.equipment.get_mut(&tool_slot).is_some_and(|tool| tool.apply_durability_loss(1));

    let wallet = require_wallet(entity)?;
    chain.mint_item(wallet, output_token_id, 1).await?;
    ledger.record_gather(current_tick, output_token_id, 1, wallet)?;

    let xp = costs::gather_xp(profession);
    let level = entity.professions.entry(profession).or_insert(0);
    *level = level.saturating_add(1);

    let mut profession_xp = BTreeMap::new();
    profession_xp.insert(profession, xp);
    let mut item_deltas = BTreeMap::new();
    item_deltas.insert(output_token_id, 1);

    Ok(ActionOutcome {
        copper_delta: 0,
        item_deltas,
        profession_xp,
        details: serde_json::json!({"tool_broke": broke, "node_id": node.id}),
    })
}

// ---------------------------------------------------------------------------
// craft
// ---------------------------------------------------------------------------

/// Produce `recipe`'s output at a station, burning its materials
/// sequentially first. If a material burn fails partway through, already-
/// burned materials are not refunded here (`spec.md` §9: "refund is
/// deferred").
pub async fn execute_craft(
    entity: &mut Entity,
    recipe: &RecipeDefinition,
    station_kind: EntityKind,
    station_range: f64,
    distance_to_station: f64,
    chain: &ChainDriver,
    ledger: &mut ConservationLedger,
    current_tick: u64,
    rng: &mut impl Rng,
) -> Result<ActionOutcome, ActionError> {
    validation::validate_profession_known(entity, recipe.profession).map_err(ActionError::Rejected)?;
    if recipe.station != station_kind {
        return Err(ActionError::Rejected(RejectionReason::InvalidInput));
    }
    if distance_to_station > station_range {
        return Err(ActionError::Rejected(RejectionReason::OutOfRange));
    }

    let wallet = require_wallet(entity)?.to_owned();

    for material in &recipe.materials {
        let balance = chain.item_balance(&wallet, material.token_id).await?;
        if balance < u64::from(material.quantity) {
            return Err(ActionError::InsufficientItem {
                token_id: material.token_id,
                needed: u64::from(material.quantity),
                available: balance,
            });
        }
    }
    for material in &recipe.materials {
        chain.burn_item(&wallet, material.token_id, u64::from(material.quantity)).await?;
        ledger.record_burn(
            current_tick,
            Some(material.token_id),
            u64::from(material.quantity),
            &wallet,
            LedgerPartyType::Wallet,
            "CRAFT",
            None,
        )?;
    }

    if let Err(source) = chain.mint_item(&wallet, recipe.output_token_id, u64::from(recipe.output_quantity)).await {
        let materials = recipe
            .materials
            .iter()
            .map(|material| crate::error::BurnedMaterial { token_id: material.token_id, quantity: u64::from(material.quantity) })
            .collect();
        return Err(ActionError::CraftStuck { wallet, materials, source });
    }
    ledger.record_craft(current_tick, recipe.output_token_id, u64::from(recipe.output_quantity), &wallet)?;

    let rolled = if recipe.quality_rollable {
        let quality = crafting::roll_quality(rng);
        let base_stats = entity.stats;
        let stats = crafting::roll_stats(base_stats, quality);
        let affix = crafting::roll_bonus_affix(quality, rng);
        Some((quality, stats, affix))
    } else {
        None
    };

    let xp = costs::craft_xp(recipe.profession);
    let level = entity.professions.entry(recipe.profession).or_insert(0);
    *level = level.saturating_add(1);

    let mut profession_xp = BTreeMap::new();
    profession_xp.insert(recipe.profession, xp);
    let mut item_deltas = BTreeMap::new();
    item_deltas.insert(recipe.output_token_id, i64::from(recipe.output_quantity));
    for material in &recipe.materials {
        let entry = item_deltas.entry(material.token_id).or_insert(0);
        *entry = entry.saturating_sub(i64::from(material.quantity));
    }

    let details = match rolled {
        Some((quality, stats, affix)) => {
            serde_json::json!({"quality": quality, "rolled_stats": stats, "bonus_affix": affix})
        }
        None => serde_json::Value::Null,
    };

    Ok(ActionOutcome { copper_delta: 0, item_deltas, profession_xp, details })
}

// ---------------------------------------------------------------------------
// equip / unequip / repair
// ---------------------------------------------------------------------------

/// Equip an owned item into its catalog-defined slot.
pub async fn execute_equip(
    entity: &mut Entity,
    catalog: &Catalog,
    token_id: ItemTokenId,
    chain: &ChainDriver,
) -> Result<ActionOutcome, ActionError> {
    let item = catalog.item_by_token_id(token_id)?;
    let slot = item.slot.ok_or(ActionError::Rejected(RejectionReason::InvalidInput))?;

    let wallet = require_wallet(entity)?;
    let balance = chain.item_balance(wallet, token_id).await?;
    if balance < 1 {
        return Err(ActionError::InsufficientItem { token_id, needed: 1, available: balance });
    }

    let max_durability = item.base_durability.unwrap_or(100);
    let base_stats = item.base_stats.unwrap_or(shard_types::Stats {
        strength: 0,
        agility: 0,
        intellect: 0,
        vitality: 0,
    });
    let equipped = EquippedItem {
        token_id,
        durability: max_durability,
        max_durability,
        broken: false,
        quality: Quality::Common,
        rolled_stats: base_stats,
        bonus_affix: None,
    };
    entity.equipment.insert(slot, equipped);

    Ok(ActionOutcome {
        details: serde_json::json!({"slot": slot, "token_id": token_id}),
        ..empty_outcome()
    })
}

/// Clear `slot`, if occupied.
pub fn execute_unequip(entity: &mut Entity, slot: EquipmentSlot) -> ActionOutcome {
    let removed = entity.equipment.remove(&slot);
    ActionOutcome {
        details: serde_json::json!({"slot": slot, "token_id": removed.map(|item| item.token_id)}),
        ..empty_outcome()
    }
}

/// Pay copper to fully restore the item equipped in `slot`.
pub fn execute_repair(
    entity: &mut Entity,
    slot: EquipmentSlot,
    gold_ledger: &mut GoldLedger,
    ledger: &mut ConservationLedger,
    on_chain_gold: u64,
    current_tick: u64,
) -> Result<ActionOutcome, ActionError> {
    let wallet = require_wallet(entity)?.to_owned();
    let item = entity.equipment.get_mut(&slot).ok_or(ActionError::Rejected(RejectionReason::NotFound))?;
    let missing = item.max_durability.saturating_sub(item.durability);
    let cost = u64::from(missing).saturating_mul(costs::REPAIR_COPPER_PER_DURABILITY);

    if gold_ledger.available_gold(&wallet, on_chain_gold) < cost {
        return Err(ActionError::InsufficientCopper { needed: cost, available: on_chain_gold });
    }
    gold_ledger.record_spend(&wallet, cost);
    ledger.record_repair(current_tick, cost, &wallet)?;
    item.repair();

    Ok(ActionOutcome {
        copper_delta: -i64::try_from(cost).unwrap_or(i64::MAX),
        details: serde_json::json!({"slot": slot}),
        ..empty_outcome()
    })
}

// ---------------------------------------------------------------------------
// buy / sell
// ---------------------------------------------------------------------------

/// Purchase `quantity` of `token_id` from a merchant at its current price.
///
/// Copper is reserved off the buyer's gold ledger (no on-chain gold burn
/// exists; see [`shard_ledger::GoldLedger`]'s doc comment) and the item is
/// minted on-chain directly to the buyer.
pub async fn execute_buy(
    entity: &mut Entity,
    merchant: &mut shard_economy::MerchantState,
    token_id: ItemTokenId,
    quantity: u32,
    chain: &ChainDriver,
    gold_ledger: &mut GoldLedger,
    ledger: &mut ConservationLedger,
    on_chain_gold: u64,
    current_tick: u64,
) -> Result<ActionOutcome, ActionError> {
    let wallet = require_wallet(entity)?.to_owned();
    let stock = merchant.stock_mut(token_id)?;
    if stock.quantity < quantity {
        return Err(ActionError::Rejected(RejectionReason::StockOut));
    }
    let cost = stock.current_price.saturating_mul(u64::from(quantity));

    if gold_ledger.available_gold(&wallet, on_chain_gold) < cost {
        return Err(ActionError::InsufficientCopper { needed: cost, available: on_chain_gold });
    }

    stock.quantity = stock.quantity.saturating_sub(quantity);
    gold_ledger.record_spend(&wallet, cost);
    chain.mint_item(&wallet, token_id, u64::from(quantity)).await?;
    ledger.record_transfer(TransferParams {
        tick: current_tick,
        entry_type: LedgerEntryType::Trade,
        token_id: None,
        quantity: cost,
        from: wallet.clone(),
        from_type: LedgerPartyType::Wallet,
        to: merchant.wallet_address.clone(),
        to_type: LedgerPartyType::Merchant,
        reason: "BUY".to_owned(),
    })?;

    let mut item_deltas = BTreeMap::new();
    item_deltas.insert(token_id, i64::from(quantity));

    Ok(ActionOutcome {
        copper_delta: -i64::try_from(cost).unwrap_or(i64::MAX),
        item_deltas,
        profession_xp: BTreeMap::new(),
        details: serde_json::json!({"merchant_id": merchant.entity_id, "unit_price": stock.current_price}),
    })
}

/// Sell `quantity` of `token_id` to a merchant at its current price.
///
/// The item is burned on-chain and the proceeds are minted fresh to the
/// seller's wallet: a sale is new gold entering circulation (the merchant
/// is not a wallet with its own finite balance to debit), so it goes
/// through [`ChainDriver::mint_gold`] rather than the gold ledger's
/// spend/refund reservation counter, which only ever offsets a wallet's
/// existing on-chain balance and cannot grant new gold.
pub async fn execute_sell(
    entity: &mut Entity,
    merchant: &mut shard_economy::MerchantState,
    token_id: ItemTokenId,
    quantity: u32,
    chain: &ChainDriver,
    ledger: &mut ConservationLedger,
    current_tick: u64,
) -> Result<ActionOutcome, ActionError> {
    let wallet = require_wallet(entity)?.to_owned();
    let balance = chain.item_balance(&wallet, token_id).await?;
    if balance < u64::from(quantity) {
        return Err(ActionError::InsufficientItem { token_id, needed: u64::from(quantity), available: balance });
    }

    let stock = merchant.stock_mut(token_id)?;
    let proceeds = stock.current_price.saturating_mul(u64::from(quantity));
    stock.quantity = stock.quantity.saturating_add(quantity);

    chain.burn_item(&wallet, token_id, u64::from(quantity)).await?;
    chain.mint_gold(&wallet, proceeds).await?;
    ledger.record_transfer(TransferParams {
        tick: current_tick,
        entry_type: LedgerEntryType::Trade,
        token_id: None,
        quantity: proceeds,
        from: merchant.wallet_address.clone(),
        from_type: LedgerPartyType::Merchant,
        to: wallet,
        to_type: LedgerPartyType::Wallet,
        reason: "SELL".to_owned(),
    })?;

    let mut item_deltas = BTreeMap::new();
    item_deltas.insert(token_id, -i64::from(quantity));

    Ok(ActionOutcome {
        copper_delta: i64::try_from(proceeds).unwrap_or(i64::MAX),
        item_deltas,
        profession_xp: BTreeMap::new(),
        details: serde_json::json!({"merchant_id": merchant.entity_id, "unit_price": stock.current_price}),
    })
}

// ---------------------------------------------------------------------------
// trade (wraps crate::trade)
// ---------------------------------------------------------------------------

/// Apply one [`crate::trade::TradeLeg`] by moving items/copper through the
/// chain driver and gold ledger.
pub async fn apply_trade_leg(
    leg: &crate::trade::TradeLeg,
    counterparty_wallet: &str,
    wallet: &str,
    chain: &ChainDriver,
    gold_ledger: &mut GoldLedger,
    ledger: &mut ConservationLedger,
    current_tick: u64,
) -> Result<(), ActionError> {
    for (&token_id, &quantity) in &leg.gives_items {
        chain.transfer_item(wallet, counterparty_wallet, token_id, u64::from(quantity)).await?;
        ledger.record_transfer(TransferParams {
            tick: current_tick,
            entry_type: LedgerEntryType::Transfer,
            token_id: Some(token_id),
            quantity: u64::from(quantity),
            from: wallet.to_owned(),
            from_type: LedgerPartyType::Wallet,
            to: counterparty_wallet.to_owned(),
            to_type: LedgerPartyType::Wallet,
            reason: "TRADE".to_owned(),
        })?;
    }
    if leg.gives_copper > 0 {
        gold_ledger.record_spend(wallet, leg.gives_copper);
        gold_ledger.record_refund(counterparty_wallet, leg.gives_copper);
        ledger.record_transfer(TransferParams {
            tick: current_tick,
            entry_type: LedgerEntryType::Transfer,
            token_id: None,
            quantity: leg.gives_copper,
            from: wallet.to_owned(),
            from_type: LedgerPartyType::Wallet,
            to: counterparty_wallet.to_owned(),
            to_type: LedgerPartyType::Wallet,
            reason: "TRADE".to_owned(),
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// party / quest wrappers
// ---------------------------------------------------------------------------

/// Wrap [`crate::party::form_party`] as an [`ActionOutcome`].
pub fn execute_party_form(leader: &mut Entity, target: &mut Entity) -> Result<ActionOutcome, ActionError> {
    let party = crate::party::form_party(leader, target).map_err(ActionError::Rejected)?;
    Ok(ActionOutcome {
        details: serde_json::json!({"party_id": party.id}),
        ..empty_outcome()
    })
}

/// Wrap [`crate::quest::complete_quest`] as an [`ActionOutcome`], including
/// the copper/item reward deltas.
pub fn execute_quest_complete(
    entity: &mut Entity,
    quest: &shard_types::QuestDefinition,
) -> Result<ActionOutcome, ActionError> {
    crate::quest::check_eligibility(entity, quest).map_err(ActionError::Rejected)?;
    let reward = crate::quest::complete_quest(entity, quest);

    let mut item_deltas = BTreeMap::new();
    if let Some((token_id, quantity)) = reward.item_reward {
        item_deltas.insert(token_id, i64::from(quantity));
    }

    Ok(ActionOutcome {
        copper_delta: i64::try_from(reward.copper).unwrap_or(i64::MAX),
        item_deltas,
        profession_xp: BTreeMap::new(),
        details: serde_json::json!({"quest_id": quest.id, "xp": reward.xp}),
    })
}

/// The technique id a unique [`TechniqueId`] placeholder test can reuse.
#[cfg(test)]
fn test_technique_id() -> TechniqueId {
    TechniqueId::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::{ClassId, EntityId, Gender, RaceId, Stats, ZoneBounds};
    use std::collections::{BTreeMap, BTreeSet};

    fn entity() -> Entity {
        Entity {
            id: EntityId::new(),
            kind: EntityKind::Player,
            name: "A".to_owned(),
            x: 0.0,
            y: 0.0,
            hp: 100,
            max_hp: 100,
            essence: Some(50),
            max_essence: Some(50),
            wallet_address: Some("0xabc".to_owned()),
            character_token_id: None,
            level: Some(1),
            xp: Some(0),
            xp_reward: None,
            race_id: Some(RaceId::Human),
            class_id: Some(ClassId::Warrior),
            gender: Some(Gender::Male),
            kills: Some(0),
            stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            effective_stats: Stats { strength: 10, agility: 10, intellect: 10, vitality: 10 },
            equipment: BTreeMap::new(),
            learned_techniques: BTreeSet::new(),
            active_effects: Vec::new(),
            cooldowns: BTreeMap::new(),
            completed_quests: BTreeSet::new(),
            professions: BTreeMap::new(),
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
    fn move_clamps_to_bounds() {
        let mut entity = entity();
        let bounds = ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 };
        let outcome = execute_move(&mut entity, bounds, 500.0, -50.0);
        assert_eq!((entity.x, entity.y), (100.0, 0.0));
        assert_eq!(outcome.details["x"], 100.0);
    }

    #[test]
    fn attack_out_of_range_is_rejected() {
        let mut attacker = entity();
        let mut defender = entity();
        defender.x = 1000.0;
        let mut rng = rand::rng();
        let result = execute_attack(&mut attacker, &mut defender, 5.0, 10, &mut rng);
        assert!(matches!(result, Err(ActionError::Rejected(RejectionReason::OutOfRange))));
    }

    #[test]
    fn unequip_empty_slot_is_a_noop() {
        let mut entity = entity();
        let outcome = execute_unequip(&mut entity, EquipmentSlot::Weapon);
        assert_eq!(outcome.details["token_id"], serde_json::Value::Null);
    }

    #[test]
    fn repair_charges_and_restores_durability() {
        let mut entity = entity();
        entity.equipment.insert(
            EquipmentSlot::Weapon,
            EquippedItem {
                token_id: ItemTokenId::new(),
                durability: 10,
                max_durability: 100,
                broken: false,
                quality: Quality::Common,
                rolled_stats: Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 },
                bonus_affix: None,
            },
        );
        let mut gold_ledger = GoldLedger::new();
        let mut ledger = ConservationLedger::new();
        let outcome = execute_repair(&mut entity, EquipmentSlot::Weapon, &mut gold_ledger, &mut ledger, 10_000, 1)
            .expect("affordable repair");
        assert_eq!(entity.equipment.get(&EquipmentSlot::Weapon).expect("slot").durability, 100);
        assert_eq!(outcome.copper_delta, -(90 * i64::from(costs::REPAIR_COPPER_PER_DURABILITY)));
    }

    #[test]
    fn repair_rejects_when_unaffordable() {
        let mut entity = entity();
        entity.equipment.insert(
            EquipmentSlot::Weapon,
            EquippedItem {
                token_id: ItemTokenId::new(),
                durability: 0,
                max_durability: 100,
                broken: true,
                quality: Quality::Common,
                rolled_stats: Stats { strength: 0, agility: 0, intellect: 0, vitality: 0 },
                bonus_affix: None,
            },
        );
        let mut gold_ledger = GoldLedger::new();
        let mut ledger = ConservationLedger::new();
        let result = execute_repair(&mut entity, EquipmentSlot::Weapon, &mut gold_ledger, &mut ledger, 1, 1);
        assert!(matches!(result, Err(ActionError::InsufficientCopper { .. })));
    }

    #[test]
    fn quest_complete_rejects_ineligible_entity() {
        let mut entity = entity();
        entity.level = Some(1);
        let quest = shard_types::QuestDefinition {
            id: shard_types::QuestId::new(),
            name: "Test".to_owned(),
            description: String::new(),
            min_level: 10,
            xp_reward: 100,
            copper_reward: 10,
            item_reward: None,
        };
        let result = execute_quest_complete(&mut entity, &quest);
        assert!(matches!(result, Err(ActionError::Rejected(RejectionReason::InvalidInput))));
    }

    #[test]
    fn party_form_links_leader_and_target() {
        let mut leader = entity();
        let mut target = entity();
        let outcome = execute_party_form(&mut leader, &mut target).expect("forms");
        assert!(outcome.details["party_id"].is_string());
    }

    #[tokio::test]
    async fn gather_mints_output_and_decrements_charges() {
        let mut entity = entity();
        let mut node = entity.clone();
        node.kind = EntityKind::OreNode;
        node.charges = Some(3);
        node.node_tier = Some(0);
        node.professions = BTreeMap::new();
        entity.professions.insert(Profession::Mining, 0);

        let chain = ChainDriver::Stub(shard_chain::StubChainDriver::new());
        let mut ledger = ConservationLedger::new();
        let catalog = Catalog::default();
        let token_id = ItemTokenId::new();

        let outcome = execute_gather(
            &mut entity,
            &mut node,
            Profession::Mining,
            EquipmentSlot::Tool,
            token_id,
            &catalog,
            &chain,
            &mut ledger,
            1,
        )
        .await
        .expect("gathers");

        assert_eq!(node.charges, Some(2));
        assert_eq!(outcome.item_deltas.get(&token_id), Some(&1));
        assert_eq!(outcome.profession_xp.get(&Profession::Mining), Some(&costs::gather_xp(Profession::Mining)));
    }

    #[tokio::test]
    async fn sell_credits_ledger_and_burns_item() {
        let mut entity = entity();
        let catalog = Catalog::default();
        let token_id = ItemTokenId::new();
        let mut merchant = shard_economy::MerchantState::from_catalog(
            EntityId::new(),
            "0xmerchant".to_owned(),
            &catalog,
        );
        merchant.stock.insert(
            token_id,
            shard_economy::ItemStock {
                token_id,
                base_price: 10,
                target_stock: 5,
                quantity: 5,
                current_price: 10,
            },
        );

        let stub = shard_chain::StubChainDriver::new();
        stub.seed_item("0xabc", token_id, 3);
        let chain = ChainDriver::Stub(stub);
        let mut ledger = ConservationLedger::new();

        let outcome = execute_sell(&mut entity, &mut merchant, token_id, 2, &chain, &mut ledger, 1)
            .await
            .expect("sells");

        assert_eq!(outcome.copper_delta, 20);
        assert_eq!(merchant.stock.get(&token_id).expect("stock").quantity, 7);
        assert_eq!(chain.gold_balance("0xabc").await.expect("balance"), 20);
    }

    #[test]
    fn test_technique_id_is_unique() {
        assert_ne!(test_technique_id(), test_technique_id());
    }
}
