//! Errors for merchant phase execution (§4.I).

use shard_types::ItemTokenId;

/// Errors that can occur running a merchant phase.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// The chain driver rejected a read or write.
    #[error("chain error: {0}")]
    Chain(#[from] shard_chain::ChainError),

    /// The merchant does not stock this item.
    #[error("merchant does not stock item {0}")]
    UnknownStock(ItemTokenId),
}
