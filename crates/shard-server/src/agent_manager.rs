//! The `/agent/*` route surface's binding to the autonomous-play engine.
//!
//! `shard-agent-runner` defines [`AgentLoop`](shard_agent_runner::AgentLoop)
//! but spawning one requires live implementations of
//! [`PerceptionSource`](shard_agent_runner::PerceptionSource) and
//! [`ActionPipeline`](shard_agent_runner::ActionPipeline) against the zone
//! runtime -- wiring only the host process (`shard-engine`) can provide.
//! [`AgentManager`] is the narrow seam this crate depends on instead,
//! following the same hand-rolled-async-trait convention used for
//! [`TickObserver`](shard_core::TickObserver): dyn-compatible by boxing
//! each call's future rather than pulling in `async-trait`.

use std::future::Future;
use std::pin::Pin;

use shard_types::AgentConfig;

use crate::error::ShardError;

/// A snapshot of one wallet's autonomous-play deployment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentStatus {
    /// Whether an [`shard_agent_runner::AgentLoop`] is currently running.
    pub running: bool,
    /// The wallet's current agent configuration.
    pub config: AgentConfig,
    /// Total LLM spend recorded for this wallet's loop, in USD.
    pub cost_usd: f64,
}

/// Future type returned by every [`AgentManager`] method.
pub type AgentFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ShardError>> + Send + 'a>>;

/// Deploys, stops, and chats with per-wallet autonomous agent loops.
///
/// Implemented by the host application; `shard-server` only calls through
/// this trait and never touches `shard-agent-runner` concurrency primitives
/// directly.
pub trait AgentManager: Send + Sync {
    /// Start an [`shard_agent_runner::AgentLoop`] for `wallet`, or update its
    /// configuration if one is already running.
    fn deploy(&self, wallet: String, config: AgentConfig) -> AgentFuture<'_, ()>;

    /// Stop the running loop for `wallet`, if any.
    fn stop(&self, wallet: String) -> AgentFuture<'_, ()>;

    /// Read the current deployment status for `wallet`.
    fn status(&self, wallet: String) -> AgentFuture<'_, AgentStatus>;

    /// Append a user chat turn and return the agent's reply.
    ///
    /// Falls back to a canned response if the LLM backend is unavailable
    /// (`spec.md` §7: "chat falls back to canned response").
    fn chat(&self, wallet: String, message: String) -> AgentFuture<'_, String>;
}
