//! Autonomous-character decision loop: perception to action.
//!
//! Every wallet that opts an entity into autonomous play gets one
//! [`AgentLoop`](runner::AgentLoop) task. Each cycle it asks the host
//! application (through [`PerceptionSource`](runner::PerceptionSource))
//! for a perception payload, resolves a deterministic focus action when
//! one is obvious, otherwise scores decision complexity and calls an LLM
//! backend for a structured `update_focus`/`take_action` response, then
//! submits whatever it decided through the same
//! [`ActionPipeline`](runner::ActionPipeline) human clients use.
//!
//! This crate is a library, not a binary: it has no network listener and
//! no process of its own. The host application (the zone engine) owns
//! the event loop, implements [`PerceptionSource`] and [`ActionPipeline`]
//! against its live state, and spawns one [`AgentLoop`](runner::AgentLoop)
//! per wallet with autonomous play enabled.

pub mod complexity;
pub mod config;
pub mod containment;
pub mod cost;
pub mod costs;
pub mod error;
pub mod focus;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod runner;

pub use config::{BackendType, LlmBackendConfig, RunnerConfig};
pub use cost::{CostSummary, CostTracker};
pub use error::RunnerError;
pub use focus::ResolvedAction;
pub use llm::{create_backend, LlmBackend};
pub use parse::{AgentDecision, ParsedDecision};
pub use prompt::{PromptEngine, RenderedPrompt};
pub use runner::{build_action_request, ActionPipeline, AgentLoop, AgentRunner, PerceptionSource};
