//! Error types for the shard-actions crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! This module defines the error hierarchy used across action validation,
//! execution, combat resolution, and leveling.

use shard_types::{ItemTokenId, RejectionReason, TechniqueId};

/// One material quantity burned by a craft attempt, carried on
/// [`ActionError::CraftStuck`] so the caller can log exactly what was lost.
#[derive(Debug, Clone, Copy)]
pub struct BurnedMaterial {
    /// The item that was burned.
    pub token_id: ItemTokenId,
    /// The quantity burned.
    pub quantity: u64,
}

/// Errors that can occur while executing an action handler.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// A validation check failed; carries the client-facing rejection
    /// reason returned in the action's [`shard_types::RejectionDetails`].
    #[error("rejected: {0:?}")]
    Rejected(RejectionReason),

    /// An arithmetic operation would have overflowed or underflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// The entity does not hold enough of a required item.
    #[error("insufficient item {token_id}: needs {needed}, has {available}")]
    InsufficientItem {
        /// The item in question.
        token_id: ItemTokenId,
        /// Quantity needed.
        needed: u64,
        /// Quantity actually available.
        available: u64,
    },

    /// The entity does not have enough copper.
    #[error("insufficient copper: needs {needed}, has {available}")]
    InsufficientCopper {
        /// Amount needed.
        needed: u64,
        /// Amount actually available.
        available: u64,
    },

    /// A technique id could not be resolved against the catalog or the
    /// generated registry.
    #[error("unknown technique {0}")]
    UnknownTechnique(TechniqueId),

    /// A lookup against the static catalog failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] shard_catalog::CatalogError),

    /// A zone runtime operation failed.
    #[error("world error: {0}")]
    World(#[from] shard_world::WorldError),

    /// Recording a ledger entry failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] shard_ledger::LedgerError),

    /// A chain driver call failed.
    #[error("chain error: {0}")]
    Chain(#[from] shard_chain::ChainError),

    /// A technique registry lookup failed.
    #[error("technique error: {0}")]
    Technique(#[from] shard_techniques::TechniqueError),

    /// A merchant phase/stock operation failed.
    #[error("economy error: {0}")]
    Economy(#[from] shard_economy::EconomyError),

    /// Crafting materials were burned but minting the crafted output then
    /// failed: the wallet is out the materials with nothing to show for it.
    /// Carries what was burned so the caller can log a compensating event.
    #[error("craft stuck for {wallet}: materials burned but mint failed: {source}")]
    CraftStuck {
        /// The wallet whose materials were burned.
        wallet: String,
        /// The materials burned before the mint failure.
        materials: Vec<BurnedMaterial>,
        /// The chain error that caused the mint to fail.
        source: shard_chain::ChainError,
    },
}

impl ActionError {
    /// Collapse this error to the client-facing taxonomy carried in
    /// [`shard_types::RejectionDetails`]. Infra failures (chain/ledger/world)
    /// all surface as [`RejectionReason::LedgerFailure`] since the client
    /// has no actionable distinction between them.
    #[must_use]
    pub const fn rejection_reason(&self) -> RejectionReason {
        match self {
            Self::Rejected(reason) => *reason,
            Self::InsufficientItem { .. } | Self::InsufficientCopper { .. } => {
                RejectionReason::InsufficientResources
            }
            Self::UnknownTechnique(_) | Self::Catalog(_) | Self::Technique(_) => {
                RejectionReason::NotFound
            }
            Self::Economy(_) => RejectionReason::StockOut,
            Self::ArithmeticOverflow { .. }
            | Self::World(_)
            | Self::Ledger(_)
            | Self::Chain(_)
            | Self::CraftStuck { .. } => RejectionReason::LedgerFailure,
        }
    }
}
