//! Core domain structs for the shard simulation.
//!
//! Covers the `Entity`, `ActiveEffect`, `Zone`, `CharacterSave`, `GoldLedger`,
//! and `AgentConfig` shapes from the data model, plus the supporting structs
//! (`Stats`, `EquippedItem`, `Technique`, `LedgerEntry`, diary entries, party
//! and quest state) those reference.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::enums::{
    AffixStat, ClassId, EffectKind, EntityKind, EquipmentSlot, Gender, LedgerEntryType,
    LedgerPartyType, Profession, Quality, RaceId, RejectionReason, TargetType, TechniqueType,
};
use crate::ids::{
    ChainTxId, EffectId, EntityId, ItemTokenId, LedgerEntryId, PartyId, QuestId, TechniqueId,
    ZoneId,
};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// A character's base or effective attribute set.
///
/// Base stats come from race/class/level. Effective stats add equipment
/// bonuses (broken items excluded) and active buff/debuff modifiers, and
/// are recomputed whenever equipment, effects, or level change (§4.E
/// vital recalculation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Stats {
    /// Physical power; scales weapon damage and carry capacity.
    pub strength: i32,
    /// Speed and precision; scales crit/dodge chance.
    pub agility: i32,
    /// Magical power; scales technique damage/healing.
    pub intellect: i32,
    /// Fortitude; scales max hp.
    pub vitality: i32,
}

impl Stats {
    /// Elementwise sum, used to layer equipment and effect modifiers onto
    /// a base stat block.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            strength: self.strength.saturating_add(other.strength),
            agility: self.agility.saturating_add(other.agility),
            intellect: self.intellect.saturating_add(other.intellect),
            vitality: self.vitality.saturating_add(other.vitality),
        }
    }
}

/// A signed stat delta applied by a buff/debuff effect or an equipment
/// bonus affix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatModifier {
    /// The stat being modified.
    pub stat: AffixStat,
    /// The signed amount (negative for a debuff).
    pub amount: i32,
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

/// A rolled bonus affix on a crafted or looted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BonusAffix {
    /// The stat this affix bonuses.
    pub stat: AffixStat,
    /// The bonus amount.
    pub amount: i32,
}

/// An item equipped into one of an entity's [`EquipmentSlot`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EquippedItem {
    /// The on-chain token id of the equipped item.
    pub token_id: ItemTokenId,
    /// Current durability.
    pub durability: u32,
    /// Durability when new / after a full repair.
    pub max_durability: u32,
    /// Set once `durability` reaches 0. A broken item confers no stat bonus.
    pub broken: bool,
    /// Quality tier rolled when the item was crafted or dropped.
    pub quality: Quality,
    /// Stats rolled at craft/drop time (scaled by `quality`).
    pub rolled_stats: Stats,
    /// An optional bonus affix (present for `Rare`/`Epic` quality).
    pub bonus_affix: Option<BonusAffix>,
}

impl EquippedItem {
    /// The stat contribution of this item, or the zero vector if broken.
    #[must_use]
    pub fn effective_stats(&self) -> Stats {
        if self.broken {
            return Stats {
                strength: 0,
                agility: 0,
                intellect: 0,
                vitality: 0,
            };
        }
        self.rolled_stats
    }

    /// Reduce durability by one point (a gather or combat tick), breaking
    /// the item at zero. Returns `true` if this call broke the item.
    pub fn apply_durability_loss(&mut self, amount: u32) -> bool {
        self.durability = self.durability.saturating_sub(amount);
        if self.durability == 0 {
            self.broken = true;
            return true;
        }
        false
    }

    /// Restore durability to `max_durability` and clear `broken`.
    pub fn repair(&mut self) {
        self.durability = self.max_durability;
        self.broken = false;
    }
}

// ---------------------------------------------------------------------------
// Active effects
// ---------------------------------------------------------------------------

/// A live instantiation of a technique's outcome on an entity, with a
/// remaining duration (§3 `ActiveEffect`, §4.G effect ticking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActiveEffect {
    /// Unique id for this effect instance.
    pub id: EffectId,
    /// The technique that produced this effect.
    pub technique_id: TechniqueId,
    /// Display name (copied from the technique at apply time).
    pub name: String,
    /// The effect category.
    pub effect_type: EffectKind,
    /// The entity that cast the originating technique.
    pub caster_id: EntityId,
    /// The tick this effect was applied.
    pub applied_at_tick: u64,
    /// Total duration in ticks.
    pub duration_ticks: u32,
    /// Ticks remaining before removal. Always `> 0` while the effect is
    /// present; an effect at `0` is removed on the next tick boundary.
    pub remaining_ticks: u32,
    /// Stat modifiers applied while this buff/debuff is active.
    pub stat_modifiers: Vec<StatModifier>,
    /// Heal applied to the target each tick (hot only).
    pub hot_heal_per_tick: Option<u32>,
    /// Damage applied to the target each tick (dot only).
    pub dot_damage: Option<u32>,
    /// Remaining shield hp (shield only); absorbs damage before hp loss.
    pub shield_hp: Option<u32>,
    /// Shield hp when first applied (shield only).
    pub shield_max_hp: Option<u32>,
}

impl ActiveEffect {
    /// Decrement the remaining duration by one tick. Returns `true` if the
    /// effect has now expired and should be removed.
    pub fn tick_down(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

// ---------------------------------------------------------------------------
// Resource node state
// ---------------------------------------------------------------------------

/// The type of raw material a resource node yields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum NodeMaterial {
    /// An ore variant, gathered by the mining profession.
    Ore {
        /// Catalog key identifying the specific ore (e.g. "iron", "mithril").
        ore_kind: String,
    },
    /// A flower/herb variant, gathered by the herbalism profession.
    Flower {
        /// Catalog key identifying the specific flower.
        flower_kind: String,
    },
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// The universal in-zone object: player, mob, merchant, resource node,
/// corpse, or portal (§3 `Entity`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Entity {
    /// Unique within the owning zone.
    pub id: EntityId,
    /// What kind of entity this is.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current essence, for entities that use techniques.
    pub essence: Option<u32>,
    /// Maximum essence.
    pub max_essence: Option<u32>,

    /// Owning wallet, for players and merchant custodial wallets.
    pub wallet_address: Option<String>,
    /// On-chain character token id, for players.
    pub character_token_id: Option<Uuid>,
    /// Character level, for players and leveled mobs.
    pub level: Option<u32>,
    /// Accumulated experience toward the next level.
    pub xp: Option<u64>,
    /// XP awarded to the killer on death (mobs/bosses).
    pub xp_reward: Option<u64>,
    /// Race, for players.
    pub race_id: Option<RaceId>,
    /// Class, for players (and used for technique archetype weighting).
    pub class_id: Option<ClassId>,
    /// Cosmetic gender, for players.
    pub gender: Option<Gender>,
    /// Kill count, for players.
    pub kills: Option<u32>,

    /// Base stats before equipment/effects.
    pub stats: Stats,
    /// Stats after equipment bonuses and active effect modifiers.
    pub effective_stats: Stats,
    /// Equipped items by slot.
    pub equipment: BTreeMap<EquipmentSlot, EquippedItem>,
    /// Techniques this entity has learned.
    pub learned_techniques: BTreeSet<TechniqueId>,
    /// Active effects currently applied.
    pub active_effects: Vec<ActiveEffect>,
    /// Technique id -> tick when its cooldown expires.
    pub cooldowns: BTreeMap<TechniqueId, u64>,
    /// Quests completed by this entity.
    pub completed_quests: BTreeSet<QuestId>,
    /// Professions learned, each with its own skill level.
    pub professions: BTreeMap<Profession, u32>,
    /// The deterministically generated signature technique, unlocked at
    /// level 15.
    pub signature_technique_id: Option<TechniqueId>,
    /// The deterministically generated ultimate technique, unlocked at
    /// level 30.
    pub ultimate_technique_id: Option<TechniqueId>,
    /// The party this entity currently belongs to, if any.
    pub party_id: Option<PartyId>,

    /// Remaining charges, for resource nodes.
    pub charges: Option<u32>,
    /// Maximum charges, for resource nodes.
    pub max_charges: Option<u32>,
    /// The material this node yields, for resource nodes.
    pub node_material: Option<NodeMaterial>,
    /// Node tier; a gathering tool must be of this tier or higher.
    pub node_tier: Option<u32>,
    /// The tick the node was fully depleted, for respawn scheduling.
    pub depleted_at_tick: Option<u64>,
    /// Ticks between depletion and automatic respawn.
    pub respawn_ticks: Option<u64>,

    /// Whether a dead mob's corpse can be skinned.
    pub skinned: Option<bool>,
    /// The tick after which a corpse decays and is removed.
    pub skinnable_until: Option<u64>,
    /// The display name of the mob this corpse belonged to.
    pub mob_name: Option<String>,
}

impl Entity {
    /// Set `hp`, clamping to `[0, max_hp]`.
    pub fn set_hp(&mut self, value: i64) {
        let clamped = value.clamp(0, i64::from(self.max_hp)).max(0);
        self.hp = u32::try_from(clamped).unwrap_or(self.max_hp);
    }

    /// Whether this entity has died (hp reached zero).
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Whether a gathering tool of the given tier can harvest this node.
    #[must_use]
    pub fn tool_tier_sufficient(&self, tool_tier: u32) -> bool {
        self.node_tier.is_none_or(|required| tool_tier >= required)
    }
}

// ---------------------------------------------------------------------------
// Zone
// ---------------------------------------------------------------------------

/// The rectangular walkable bounds of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ZoneBounds {
    /// Minimum x.
    pub min_x: f64,
    /// Minimum y.
    pub min_y: f64,
    /// Maximum x.
    pub max_x: f64,
    /// Maximum y.
    pub max_y: f64,
}

impl ZoneBounds {
    /// Clamp a point into these bounds.
    #[must_use]
    pub fn clamp_point(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }
}

// ---------------------------------------------------------------------------
// Technique
// ---------------------------------------------------------------------------

/// A combo secondary effect bundled with a technique's primary effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SecondaryEffect {
    /// Adds a damage-over-time tick to the primary effect.
    Dot {
        /// Damage dealt per tick.
        damage_per_tick: u32,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Grants a shield absorbing incoming damage.
    Shield {
        /// Shield hit points granted.
        shield_hp: u32,
    },
    /// Adds a heal-over-time tick to the primary effect.
    Heal {
        /// Heal applied per tick.
        heal_per_tick: u32,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Adds a stat buff.
    StatBuff {
        /// The modifier granted.
        modifier: StatModifier,
        /// Duration in ticks.
        duration_ticks: u32,
    },
    /// Adds a stat debuff.
    StatDebuff {
        /// The modifier applied.
        modifier: StatModifier,
        /// Duration in ticks.
        duration_ticks: u32,
    },
}

/// A skill with a target type, cost, cooldown, and structured effects
/// (§4.H, §GLOSSARY `Technique`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Technique {
    /// Unique identifier. For procedurally generated techniques this is
    /// `essence_{tier}_{hex8(wallet)}_{classId}`.
    pub id: TechniqueId,
    /// Display name.
    pub name: String,
    /// The functional category.
    pub technique_type: TechniqueType,
    /// The valid target.
    pub target_type: TargetType,
    /// Essence cost to invoke.
    pub essence_cost: u32,
    /// Cooldown in ticks after use.
    pub cooldown_ticks: u32,
    /// Damage or healing multiplier applied to the caster's relevant stat.
    #[ts(as = "String")]
    pub power_multiplier: rust_decimal::Decimal,
    /// Duration in ticks for hot/dot/buff/debuff/shield effects; `0` for
    /// instant-only techniques.
    pub duration_ticks: u32,
    /// Maximum targets for an area technique (`1` for single-target).
    pub max_targets: u32,
    /// Area radius for an area technique (`0` for single-target).
    pub area_radius: f64,
    /// An optional secondary combo effect layered on the primary effect.
    pub secondary_effect: Option<SecondaryEffect>,
    /// Quality tier assigned at generation (`Rare` for signature,
    /// `Epic` for ultimate; catalog techniques use any tier).
    pub quality_tier: Quality,
    /// Minimum character level required to learn this technique.
    pub level_required: u32,
}

// ---------------------------------------------------------------------------
// Character save / persistence
// ---------------------------------------------------------------------------

/// The persisted snapshot of a player character (§3 `CharacterSave`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterSave {
    /// Character name (unique per wallet).
    pub name: String,
    /// Character level.
    pub level: u32,
    /// Accumulated XP.
    pub xp: u64,
    /// Race.
    pub race_id: RaceId,
    /// Class.
    pub class_id: ClassId,
    /// Cosmetic gender.
    pub gender: Gender,
    /// Last zone occupied.
    pub zone: ZoneId,
    /// Last x position.
    pub x: f64,
    /// Last y position.
    pub y: f64,
    /// Kill count.
    pub kills: u32,
    /// Completed quests.
    pub completed_quests: BTreeSet<QuestId>,
    /// Learned techniques.
    pub learned_techniques: BTreeSet<TechniqueId>,
    /// Professions and their skill levels.
    pub professions: BTreeMap<Profession, u32>,
    /// Deterministically generated signature technique, if unlocked.
    pub signature_technique_id: Option<TechniqueId>,
    /// Deterministically generated ultimate technique, if unlocked.
    pub ultimate_technique_id: Option<TechniqueId>,
}

/// A single append-only diary entry (§6 persisted layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DiaryEntry {
    /// Unique id for this entry.
    pub id: Uuid,
    /// Real-world timestamp.
    pub timestamp: DateTime<Utc>,
    /// The zone the action occurred in.
    pub zone_id: ZoneId,
    /// Position x at the time of the action.
    pub x: f64,
    /// Position y at the time of the action.
    pub y: f64,
    /// The action category (e.g. `"spawn"`, `"death"`).
    pub action: String,
    /// A short one-line summary.
    pub headline: String,
    /// A longer narrative description.
    pub narrative: String,
    /// Structured details specific to the action.
    pub details: serde_json::Value,
}

/// Maximum number of diary/chat-history entries retained per wallet (§4.D).
pub const BOUNDED_LIST_CAP: usize = 200;

// ---------------------------------------------------------------------------
// Gold ledger
// ---------------------------------------------------------------------------

/// Per-wallet pending-spend reservation against the on-chain gold balance
/// (§3/§4.C `GoldLedger`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WalletReservation {
    /// Copper reserved (spent in-memory, not yet confirmed on-chain).
    pub reserved_copper: u64,
    /// The last time this wallet's reservation was reconciled against chain.
    pub last_reconciled_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Ledger entry (conservation bookkeeping)
// ---------------------------------------------------------------------------

/// One entry in the append-only conservation ledger recording a currency or
/// item movement between two parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Unique id.
    pub id: LedgerEntryId,
    /// The tick this entry was recorded on.
    pub tick: u64,
    /// The category of transfer.
    pub entry_type: LedgerEntryType,
    /// `None` for a copper transfer; `Some` for an item transfer.
    pub token_id: Option<ItemTokenId>,
    /// Quantity transferred (copper amount, or item count).
    pub quantity: u64,
    /// Source party identifier (wallet address, merchant id, or chain).
    pub from: String,
    /// Source party type.
    pub from_type: LedgerPartyType,
    /// Destination party identifier.
    pub to: String,
    /// Destination party type.
    pub to_type: LedgerPartyType,
    /// Human-readable reason (e.g. `"CRAFT"`, `"LOOT"`).
    pub reason: String,
    /// The chain transaction this entry corresponds to, once confirmed.
    pub chain_tx: Option<ChainTxId>,
}

// ---------------------------------------------------------------------------
// Agent config
// ---------------------------------------------------------------------------

/// The autonomous behavior focus an Agent Runner pursues (§3 `AgentConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AgentFocus {
    /// Pursue and complete quests.
    Questing,
    /// Seek out and fight hostile entities.
    Combat,
    /// Craft enchantments (jewelcrafting affix rolls).
    Enchanting,
    /// Craft items at forges/leatherworking/jewelcrafting stations.
    Crafting,
    /// Gather from resource nodes.
    Gathering,
    /// Brew potions at an alchemy lab.
    Alchemy,
    /// Cook food at a campfire.
    Cooking,
    /// Buy low, sell high across merchants.
    Trading,
    /// Take no proactive action beyond survival upkeep.
    Idle,
}

/// The risk posture an Agent Runner applies when choosing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AgentStrategy {
    /// Seeks out fights and high-risk opportunities.
    Aggressive,
    /// Weighs risk against reward evenly.
    Balanced,
    /// Avoids combat and low-probability gambles.
    Defensive,
}

/// A single turn of the agent's chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatTurn {
    /// `"user"` or `"assistant"`.
    pub role: String,
    /// The message content.
    pub content: String,
    /// Real-world timestamp.
    pub timestamp: DateTime<Utc>,
}

/// A reference to the zone entity a wallet's autonomous character controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EntityRef {
    /// The zone the entity currently lives in.
    pub zone_id: ZoneId,
    /// The entity id within that zone.
    pub entity_id: EntityId,
}

/// Per-wallet configuration driving the Agent Runner (§3 `AgentConfig`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentConfig {
    /// Whether the autonomous loop should run for this wallet.
    pub enabled: bool,
    /// The current behavior focus.
    pub focus: AgentFocus,
    /// The current risk posture.
    pub strategy: AgentStrategy,
    /// If set, the agent should travel toward this zone before acting.
    pub target_zone: Option<ZoneId>,
    /// Bounded chat transcript (capped at [`BOUNDED_LIST_CAP`]).
    pub chat_history: Vec<ChatTurn>,
    /// The custodial wallet address this agent acts as.
    pub custodial_wallet: String,
    /// The entity this agent currently controls.
    pub entity_ref: Option<EntityRef>,
    /// Last time this config was updated.
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Party
// ---------------------------------------------------------------------------

/// Maximum number of entities a single party may hold (§4.F `party`).
pub const PARTY_MAX_SIZE: usize = 5;

/// A standing party of entities who share XP on a kill (§4.G XP split).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Party {
    /// Unique within the owning zone.
    pub id: PartyId,
    /// The entity that formed the party; the only member who can disband it.
    pub leader_id: EntityId,
    /// Current members, including the leader. Bounded by [`PARTY_MAX_SIZE`].
    pub members: BTreeSet<EntityId>,
}

// ---------------------------------------------------------------------------
// Quest
// ---------------------------------------------------------------------------

/// A static, read-only quest record (backs `Entity::completed_quests`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuestDefinition {
    /// The quest's id.
    pub id: QuestId,
    /// Display name.
    pub name: String,
    /// Narrative description shown to the decision loop.
    pub description: String,
    /// Minimum character level required to accept this quest.
    pub min_level: u32,
    /// XP awarded on completion.
    pub xp_reward: u64,
    /// Copper awarded on completion.
    pub copper_reward: u64,
    /// An item minted to the completer's wallet on completion, if any.
    pub item_reward: Option<(ItemTokenId, u32)>,
}

// ---------------------------------------------------------------------------
// Rejection details
// ---------------------------------------------------------------------------

/// Structured details returned when an action is rejected (§7 taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RejectionDetails {
    /// The categorical reason.
    pub reason: RejectionReason,
    /// A human-readable explanation.
    pub message: String,
    /// Ticks remaining, for [`RejectionReason::OnCooldown`].
    pub remaining_ticks: Option<u64>,
}
