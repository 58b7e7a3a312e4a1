//! The shard's HTTP Surface (`spec.md` §4.K): an Axum server exposing the
//! player-facing action API, wallet-signature auth, the operator control
//! plane, and a `/ws` tick stream.
//!
//! - **Player actions**: `/spawn`, `/logout`, `/command` (and its
//!   profession/equipment/shop aliases), `/party/…`, `/state`,
//!   `/transition/auto`, `/character`, `/diary`, `/agent/…`.
//! - **Read-only catalog**: `/items/catalog`, `/techniques/catalog`,
//!   `/leaderboard`, `/portals`, `/auctionhouse`, `/guild/:id`.
//! - **Auth**: `/auth/challenge`, `/auth/verify` (wallet-signature
//!   challenge/response, §6).
//! - **Operator control plane**: `/operator/pause|resume|speed|status|stop`
//!   (§9), driving [`shard_core::OperatorState`].
//! - **`/ws`**: a broadcast stream of each tick's per-zone event reports.
//!
//! [`AppState`] is the single piece of shared state threaded through
//! every handler; it owns the live zone runtime, catalog, ledgers, chain
//! driver, persistence store, and operator control plane.

pub mod agent_manager;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::{AppState, TickBroadcast};
