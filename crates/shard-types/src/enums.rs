//! Enumeration types for the shard simulation.
//!
//! Covers entity/action/event taxonomies (§3-4 of the data model) plus the
//! ledger entry type used by the gold ledger and conservation bookkeeping.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Entity kind
// ---------------------------------------------------------------------------

/// The kind of a zone entity.
///
/// Determines which fields of [`crate::structs::Entity`] are meaningful --
/// a resource node uses `charges`/`respawn_ticks`, a player uses
/// `wallet_address`/`level`/`equipment`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A human- or agent-controlled character.
    Player,
    /// A hostile creature with a loot table.
    Mob,
    /// A high-tier mob with a larger loot table and unique mechanics.
    Boss,
    /// An NPC that buys and sells items.
    Merchant,
    /// An NPC offering quests.
    QuestGiver,
    /// An NPC that teaches techniques or professions.
    Trainer,
    /// A crafting station for the forging profession.
    Forge,
    /// A crafting station for the alchemy profession.
    AlchemyLab,
    /// A crafting station for the cooking profession.
    Campfire,
    /// A gatherable mining resource node.
    OreNode,
    /// A gatherable herbalism resource node.
    FlowerNode,
    /// A time-limited corpse left behind by a dead mob.
    Corpse,
    /// A zone transition point.
    Portal,
}

// ---------------------------------------------------------------------------
// Equipment slot
// ---------------------------------------------------------------------------

/// A slot an [`crate::structs::EquippedItem`] can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EquipmentSlot {
    /// Main-hand weapon; determines attack range and base damage.
    Weapon,
    /// Off-hand item (shield, tome, quiver).
    OffHand,
    /// Head armor.
    Head,
    /// Chest armor.
    Chest,
    /// Hand armor.
    Hands,
    /// Leg armor.
    Legs,
    /// Foot armor.
    Feet,
    /// A ring accessory.
    Ring,
    /// An amulet accessory.
    Amulet,
    /// A gathering tool (pickaxe, sickle, skinning knife).
    Tool,
}

// ---------------------------------------------------------------------------
// Profession
// ---------------------------------------------------------------------------

/// A learnable gathering or crafting profession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Profession {
    /// Gathers ore from ore nodes.
    Mining,
    /// Gathers flowers/herbs from flower nodes.
    Herbalism,
    /// Harvests hides from skinnable corpses.
    Skinning,
    /// Crafts potions and elixirs at an alchemy lab.
    Alchemy,
    /// Prepares food at a campfire.
    Cooking,
    /// Crafts weapons and armor at a forge.
    Forging,
    /// Crafts armor from hides.
    Leatherworking,
    /// Crafts rings and amulets.
    Jewelcrafting,
}

// ---------------------------------------------------------------------------
// Quality / affixes
// ---------------------------------------------------------------------------

/// The quality tier rolled for a crafted or dropped item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Quality {
    /// No bonus affix.
    Common,
    /// A single minor affix.
    Uncommon,
    /// A single major affix.
    Rare,
    /// Two affixes, the rarest crafted/dropped tier.
    Epic,
}

/// The stat a bonus affix modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AffixStat {
    /// Strength.
    Strength,
    /// Agility.
    Agility,
    /// Intellect.
    Intellect,
    /// Vitality (max hp contribution).
    Vitality,
    /// Essence regeneration.
    EssenceRegen,
    /// Critical strike chance.
    CritChance,
}

// ---------------------------------------------------------------------------
// Race / class / gender
// ---------------------------------------------------------------------------

/// A playable race, affecting the growth curve applied on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RaceId {
    /// Balanced growth across all stats.
    Human,
    /// Agility- and intellect-leaning growth.
    Elf,
    /// Strength- and vitality-leaning growth.
    Dwarf,
    /// Strength-leaning, vitality-penalized growth.
    Orc,
}

/// A playable class, determining technique archetype weighting
/// (§4.H) and base stat growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ClassId {
    /// Strength-based melee class; attack-dominant technique archetype.
    Warrior,
    /// Intellect-based caster; attack-dominant technique archetype with
    /// a higher secondary debuff weight.
    Mage,
    /// Agility-based melee/stealth class; attack-dominant with a
    /// secondary debuff weight.
    Rogue,
    /// Intellect-based support class; healing-dominant technique archetype.
    Cleric,
    /// Agility-based ranged class; attack-dominant with a buff secondary.
    Ranger,
}

/// A character's gender, as chosen at spawn. Purely cosmetic/flavor --
/// it does not affect any game mechanic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Gender {
    /// Presented as male.
    Male,
    /// Presented as female.
    Female,
    /// No gender presentation.
    Neutral,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// The category of an [`crate::structs::ActiveEffect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EffectKind {
    /// Positive stat modifier.
    Buff,
    /// Negative stat modifier.
    Debuff,
    /// Heal-over-time.
    Hot,
    /// Damage-over-time.
    Dot,
    /// Absorbs incoming damage before hp loss.
    Shield,
}

/// The functional category of a procedurally generated or catalog technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TechniqueType {
    /// Deals instant or damage-over-time harm.
    Attack,
    /// Grants a positive stat modifier or shield.
    Buff,
    /// Applies a negative stat modifier or damage-over-time.
    Debuff,
    /// Restores hp, instantly or over time.
    Healing,
}

/// The valid target of a technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TargetType {
    /// Targets the caster.
    #[serde(rename = "self")]
    SelfTarget,
    /// Targets a friendly entity.
    Ally,
    /// Targets a hostile entity.
    Enemy,
    /// Targets an area around a primary target.
    Area,
}

// ---------------------------------------------------------------------------
// Action types
// ---------------------------------------------------------------------------

/// A command submitted through the Action Pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// Create a new entity / restore a saved character and place it in a zone.
    Spawn,
    /// Persist the character and remove it from the zone.
    Logout,
    /// Reposition within the zone.
    Move,
    /// Melee/ranged weapon attack against a target entity.
    Attack,
    /// Invoke a learned technique, optionally against a target.
    UseTechnique,
    /// Collect a charge from a resource node (mining/herbalism/skinning).
    Gather,
    /// Produce an item at a crafting station from materials.
    Craft,
    /// Put an owned item into an equipment slot.
    Equip,
    /// Remove an item from an equipment slot.
    Unequip,
    /// Pay copper to restore an equipped item's durability.
    Repair,
    /// Purchase an item from a merchant.
    Buy,
    /// Sell an item to a merchant.
    Sell,
    /// Propose a direct item trade with another player.
    TradeOffer,
    /// Accept a pending trade offer.
    TradeAccept,
    /// Reject a pending trade offer.
    TradeReject,
    /// Form or join a party.
    PartyForm,
    /// Leave the current party.
    PartyLeave,
    /// Mark a quest as accepted.
    QuestAccept,
    /// Mark a quest as completed and collect its reward.
    QuestComplete,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A type of domain event emitted by the simulation (§9 typed event channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// Beginning of a tick.
    TickStart,
    /// End of a tick.
    TickEnd,
    /// A player entity was created or restored.
    EntitySpawned,
    /// A player entity logged out and was persisted.
    EntityLoggedOut,
    /// An entity died (mob removed, or player sent to respawn).
    EntityDied,
    /// An action was submitted.
    ActionSubmitted,
    /// An action completed successfully.
    ActionSucceeded,
    /// An action failed validation.
    ActionRejected,
    /// A resource node was depleted by a gather action.
    NodeDepleted,
    /// A resource node respawned to full charges.
    NodeRespawned,
    /// A technique was used.
    TechniqueUsed,
    /// A technique's cooldown expired (informational, not user-visible).
    CooldownExpired,
    /// An active effect was applied to an entity.
    EffectApplied,
    /// An active effect expired and was removed.
    EffectExpired,
    /// An entity leveled up.
    LevelUp,
    /// A signature or ultimate technique was generated and learned.
    SignatureTechniqueUnlocked,
    /// An item was crafted.
    ItemCrafted,
    /// Crafting burned materials but the output mint failed ("stuck").
    CraftStuck,
    /// A trade completed between two players.
    TradeCompleted,
    /// A trade was rejected or expired.
    TradeFailed,
    /// A merchant's dynamic price changed.
    MerchantPriceUpdated,
    /// A merchant restocked inventory.
    MerchantRestocked,
    /// A merchant emitted an announcement.
    MerchantAnnouncement,
    /// The gold ledger's reserved amount was truncated during reconciliation.
    LedgerReconciled,
    /// A conservation check failed -- critical ledger alert.
    LedgerAnomaly,
    /// An auction house listing was created, filled, or cancelled.
    AuctionHouseEvent,
}

// ---------------------------------------------------------------------------
// Rejection reasons
// ---------------------------------------------------------------------------

/// The reason an action was rejected by the Action Pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RejectionReason {
    /// Malformed or missing request fields.
    InvalidInput,
    /// No bearer token, or token wallet does not match the entity owner.
    Unauthorized,
    /// Zone, entity, recipe, item, or technique not found.
    NotFound,
    /// Profession not learned.
    ProfessionMissing,
    /// Equipped tool's tier is below the node's required tier.
    ToolTierTooLow,
    /// Equipped tool is broken (durability 0).
    ToolBroken,
    /// Target is out of the action's range.
    OutOfRange,
    /// Target resource node has no charges remaining.
    NodeDepleted,
    /// Not enough of a required material/item/currency.
    InsufficientResources,
    /// Technique is still on cooldown.
    OnCooldown,
    /// Not enough essence to use the technique.
    InsufficientEssence,
    /// Technique has not been learned.
    TechniqueNotLearned,
    /// Merchant is out of stock for the requested item.
    StockOut,
    /// The chain write failed or timed out.
    LedgerFailure,
}

// ---------------------------------------------------------------------------
// Ledger entry type
// ---------------------------------------------------------------------------

/// The category of a transfer recorded in the conservation ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LedgerEntryType {
    /// Currency or item minted from the chain into an entity's balance.
    Mint,
    /// Currency or item burned from an entity's balance on the chain.
    Burn,
    /// Currency or item transferred between two entities.
    Transfer,
    /// Gathered output minted to the gathering entity.
    Gather,
    /// Crafted output minted, materials burned.
    Craft,
    /// Loot minted to a killer on mob death.
    Loot,
    /// Copper spent on a repair.
    Repair,
    /// Copper paid to or received from a merchant transaction.
    Trade,
}

// ---------------------------------------------------------------------------
// Entity type for ledger from/to fields
// ---------------------------------------------------------------------------

/// The type of party participating in a ledger transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LedgerPartyType {
    /// A player wallet.
    Wallet,
    /// A merchant's custodial wallet.
    Merchant,
    /// The chain itself (mint source / burn sink).
    Chain,
}
