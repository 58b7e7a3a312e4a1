//! Per-zone runtime state, tick orchestration, and spatial queries for the
//! shard server (§4.E Zone Runtime).
//!
//! # Modules
//!
//! - [`zone`] -- [`Zone`], a single zone's live entity table, bounds, and
//!   spatial grid; instantiated from a [`shard_catalog::ZoneLayout`].
//! - [`spatial_grid`] -- [`SpatialGrid`], a cell-bucketed index backing
//!   sub-linear radius queries.
//! - [`aoi`] -- [`AreaOfInterest`], per-subscriber visible-entity sets
//!   recomputed from the same grid each tick.
//! - [`vitals`] -- effect ticking, cooldown expiry, regen, and effective
//!   stat recalculation (tick steps 1-3).
//! - [`ai`] -- mob aggro/attack/wander behavior (tick step 4).
//! - [`nodes`] -- resource node respawn check (tick step 5).
//! - [`corpses`] -- corpse decay (tick step 6).
//! - [`runtime`] -- [`ZoneRuntime`], owning every live zone and driving its
//!   per-tick advance in the fixed order above.
//! - [`events`] -- [`WorldEvent`], the outcomes a tick reports upward.
//! - [`error`] -- [`WorldError`].

pub mod ai;
pub mod aoi;
pub mod corpses;
pub mod error;
pub mod events;
pub mod nodes;
pub mod runtime;
pub mod spatial_grid;
pub mod vitals;
pub mod zone;

pub use aoi::AreaOfInterest;
pub use error::WorldError;
pub use events::WorldEvent;
pub use runtime::{TickReport, ZoneRuntime};
pub use spatial_grid::SpatialGrid;
pub use vitals::recalculate_entity_vitals;
pub use zone::Zone;
