//! Errors for technique lookup (§4.H).

use shard_types::TechniqueId;

/// Errors raised resolving a technique id against the merged catalog.
#[derive(Debug, thiserror::Error)]
pub enum TechniqueError {
    /// Neither the static catalog nor the generated registry has this id.
    #[error("unknown technique {0}")]
    UnknownTechnique(TechniqueId),
}
