//! Narrow adapter to the external ledger (§4.B Chain Driver).
//!
//! Exposes balance reads, mint/burn/transfer writes, and an event-scan
//! cache rebuild behind [`ChainDriver`], an enum dispatching to either a
//! live [`HttpChainDriver`] or an in-memory [`StubChainDriver`] for
//! testing without a live chain.
//!
//! # Modules
//!
//! - [`driver`] -- the [`driver::ChainDriver`] enum and [`driver::ContractKind`]
//! - [`http`] -- [`http::HttpChainDriver`] and its configuration
//! - [`stub`] -- [`stub::StubChainDriver`], the in-memory projection
//! - [`error`] -- [`error::ChainError`]

pub mod driver;
pub mod error;
pub mod http;
pub mod stub;

pub use driver::{ChainDriver, ContractKind};
pub use error::ChainError;
pub use http::{HttpChainConfig, HttpChainDriver};
pub use stub::StubChainDriver;
