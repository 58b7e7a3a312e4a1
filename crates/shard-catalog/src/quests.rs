//! Static quest definitions (§4.F `quest` accept/complete handlers).
//!
//! [`shard_types::QuestDefinition`] is defined in `shard-types` rather than
//! here because the action pipeline and the perception payload both need it
//! independently of catalog loading; this module just re-exports it so
//! callers can reach it alongside the rest of the catalog tables.

pub use shard_types::QuestDefinition;
