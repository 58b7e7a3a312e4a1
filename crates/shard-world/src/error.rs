//! Error types for the `shard-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use shard_types::{EntityId, ZoneId};

/// Errors that can occur during zone runtime operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A zone was not found in the runtime.
    #[error("zone not found: {0}")]
    ZoneNotFound(ZoneId),

    /// An entity was not found in the zone.
    #[error("entity {entity} not found in zone {zone}")]
    EntityNotFound {
        /// The missing entity.
        entity: EntityId,
        /// The zone searched.
        zone: ZoneId,
    },

    /// A duplicate zone was inserted where uniqueness is required.
    #[error("duplicate zone id: {0}")]
    DuplicateZone(ZoneId),

    /// A duplicate entity was inserted where uniqueness is required.
    #[error("duplicate entity id: {0}")]
    DuplicateEntity(EntityId),

    /// A position lies outside the zone's walkable bounds even after
    /// clamping (non-finite coordinates).
    #[error("non-finite position submitted for entity {0}")]
    NonFinitePosition(EntityId),
}
