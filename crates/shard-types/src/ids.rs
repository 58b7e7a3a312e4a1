//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity, item, technique, and transaction in the simulation has a
//! strongly-typed ID to prevent accidental mixing of identifiers at compile
//! time. All IDs use UUID v7 (time-ordered) for efficient database indexing.
//!
//! `PostgreSQL` generates UUIDs via native `DEFAULT uuidv7()` for inserts.
//! The `new()` constructors here exist for cases where app-side generation
//! is needed (e.g. tests, seed data, zones created at startup).

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an entity within a zone (player, mob, merchant, node, …).
    EntityId
}

define_id! {
    /// Unique identifier for a zone.
    ZoneId
}

define_id! {
    /// Unique identifier for an active effect instance applied to an entity.
    EffectId
}

define_id! {
    /// Unique identifier for a technique (catalog or procedurally generated).
    TechniqueId
}

define_id! {
    /// Unique identifier for a crafting/gathering recipe.
    RecipeId
}

define_id! {
    /// Unique identifier for an item definition (on-chain token id namespace).
    ItemTokenId
}

define_id! {
    /// Unique identifier for a pending trade between two entities.
    TradeId
}

define_id! {
    /// Unique identifier for a party of players sharing XP.
    PartyId
}

define_id! {
    /// Unique identifier for a quest definition.
    QuestId
}

define_id! {
    /// Unique identifier for a ledger entry (resource/currency transfer record).
    LedgerEntryId
}

define_id! {
    /// Unique identifier for a domain event.
    EventId
}

define_id! {
    /// Unique identifier for a chain transaction returned by the Chain Driver.
    ChainTxId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let entity = EntityId::new();
        let zone = ZoneId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(entity.into_inner(), Uuid::nil());
        assert_ne!(zone.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = EntityId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<EntityId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = EntityId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
