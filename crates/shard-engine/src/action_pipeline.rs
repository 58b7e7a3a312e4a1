//! The live [`ActionPipeline`](shard_agent_runner::ActionPipeline)
//! implementation: submits an autonomous agent's resolved action through
//! the exact same [`shard_server::handlers::command::dispatch`] path
//! `POST /command` uses for human clients.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use shard_agent_runner::{ActionPipeline, RunnerError};
use shard_server::handlers::command::dispatch;
use shard_server::AppState;
use shard_types::actions::{ActionRequest, ActionResult};

/// Routes [`ActionRequest`]s from `shard-agent-runner` into the live zone
/// state, identically to a human client's `POST /command`.
pub struct CommandActionPipeline {
    state: Arc<AppState>,
}

impl CommandActionPipeline {
    /// Build a pipeline over the given shared application state.
    #[must_use]
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl ActionPipeline for CommandActionPipeline {
    fn submit(
        &self,
        request: ActionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ActionResult, RunnerError>> + Send + '_>> {
        Box::pin(async move {
            let wallet = request.wallet_address.clone();
            dispatch(&self.state, &wallet, request)
                .await
                .map_err(|e| RunnerError::Config(format!("{e}")))
        })
    }
}
