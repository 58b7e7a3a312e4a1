//! Outcomes reported by a zone tick, for translation into the durable
//! event log (`shard-db`) and the `/ws` push channel by the caller.
//! `shard-world` stays decoupled from both; it only reports what
//! happened.

use shard_types::{EntityId, TechniqueId};

/// A notable occurrence during a single zone tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldEvent {
    /// An active effect's duration reached zero and was removed.
    EffectExpired {
        /// The entity the effect was removed from.
        entity: EntityId,
        /// The effect's display name.
        name: String,
    },
    /// An entity's hp reached zero during effect ticking or regen.
    EntityDied {
        /// The entity that died.
        entity: EntityId,
    },
    /// A technique's cooldown expired.
    CooldownExpired {
        /// The entity whose cooldown expired.
        entity: EntityId,
        /// The technique that is now usable again.
        technique: TechniqueId,
    },
    /// A resource node was fully depleted.
    NodeDepleted {
        /// The depleted node.
        entity: EntityId,
    },
    /// A resource node regenerated to full charges.
    NodeRespawned {
        /// The respawned node.
        entity: EntityId,
    },
    /// A corpse's decay window elapsed and it was removed.
    CorpseDecayed {
        /// The removed corpse.
        entity: EntityId,
    },
}
