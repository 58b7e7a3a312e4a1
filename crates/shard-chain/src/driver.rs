//! The chain driver contract (§4.B): a narrow adapter to the external
//! ledger for balances, mint/burn/transfer, and event-log rebuilds.
//!
//! Uses enum dispatch rather than a `dyn` trait object, since the
//! operations are async and async trait methods are not dyn-compatible
//! without boxing every call.

use shard_types::{ChainTxId, ItemTokenId};

use crate::error::ChainError;
use crate::http::HttpChainDriver;
use crate::stub::StubChainDriver;

/// The named on-chain contract an operation addresses (§6 config env vars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContractKind {
    /// The fungible gold token contract.
    Gold,
    /// The non-fungible/semi-fungible item contract.
    Item,
    /// The character identity contract.
    Character,
    /// The reputation contract.
    Reputation,
    /// The auction house contract.
    AuctionHouse,
}

/// A narrow adapter to the external ledger. Economically meaningful writes
/// must be serialized by the caller (§5 ordering guarantees); this driver
/// makes no attempt at distributed locking.
pub enum ChainDriver {
    /// Talks to a live chain endpoint over HTTP.
    Http(HttpChainDriver),
    /// Maintains only a local in-memory projection, for tests and
    /// environments without a live ledger.
    Stub(StubChainDriver),
}

impl ChainDriver {
    /// Human-readable name for logging.
    #[must_use]
    pub const fn name(&self) -> &str {
        match self {
            Self::Http(_) => "http",
            Self::Stub(_) => "stub",
        }
    }

    /// Read a wallet's gold balance, in copper.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn gold_balance(&self, address: &str) -> Result<u64, ChainError> {
        match self {
            Self::Http(d) => d.gold_balance(address).await,
            Self::Stub(d) => Ok(d.gold_balance(address)),
        }
    }

    /// Read a wallet's balance of a specific item token.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn item_balance(
        &self,
        address: &str,
        token_id: ItemTokenId,
    ) -> Result<u64, ChainError> {
        match self {
            Self::Http(d) => d.item_balance(address, token_id).await,
            Self::Stub(d) => Ok(d.item_balance(address, token_id)),
        }
    }

    /// Mint copper to a wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn mint_gold(&self, address: &str, copper: u64) -> Result<ChainTxId, ChainError> {
        match self {
            Self::Http(d) => d.mint_gold(address, copper).await,
            Self::Stub(d) => Ok(d.mint_gold(address, copper)),
        }
    }

    /// Mint a quantity of an item token to a wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn mint_item(
        &self,
        address: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        match self {
            Self::Http(d) => d.mint_item(address, token_id, quantity).await,
            Self::Stub(d) => Ok(d.mint_item(address, token_id, quantity)),
        }
    }

    /// Burn a quantity of an item token held by a wallet.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InsufficientBalance`] if the wallet does not
    /// hold enough, or [`ChainError`] on request failure/timeout.
    pub async fn burn_item(
        &self,
        address: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        match self {
            Self::Http(d) => d.burn_item(address, token_id, quantity).await,
            Self::Stub(d) => d.burn_item(address, token_id, quantity),
        }
    }

    /// Transfer a quantity of an item token from one wallet to another.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InsufficientBalance`] if `from` does not hold
    /// enough, or [`ChainError`] on request failure/timeout.
    pub async fn transfer_item(
        &self,
        from: &str,
        to: &str,
        token_id: ItemTokenId,
        quantity: u64,
    ) -> Result<ChainTxId, ChainError> {
        match self {
            Self::Http(d) => d.transfer_item(from, to, token_id, quantity).await,
            Self::Stub(d) => d.transfer_item(from, to, token_id, quantity),
        }
    }

    /// The next unused sequence id the given contract would assign
    /// (e.g. the next character token id).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn next_id(&self, contract: ContractKind) -> Result<u64, ChainError> {
        match self {
            Self::Http(d) => d.next_id(contract).await,
            Self::Stub(d) => Ok(d.next_id(contract)),
        }
    }

    /// Rebuild the in-memory balance projection for `contract` by scanning
    /// historical events in bounded block windows. Used when the chain's
    /// direct balance read is unreliable or unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on request failure, bad status, or timeout.
    pub async fn rebuild_cache(&self, contract: ContractKind) -> Result<(), ChainError> {
        match self {
            Self::Http(d) => d.rebuild_cache(contract).await,
            Self::Stub(_) => Ok(()),
        }
    }
}
