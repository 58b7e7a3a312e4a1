//! The live [`AgentManager`](shard_server::agent_manager::AgentManager)
//! implementation: a per-wallet registry of [`AgentLoop`]s, backed by the
//! concrete [`ZoneAwarePerceptionSource`](crate::perception::ZoneAwarePerceptionSource)
//! and [`CommandActionPipeline`](crate::action_pipeline::CommandActionPipeline).

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use shard_agent_runner::{build_action_request, ActionPipeline, AgentLoop, AgentRunner, PerceptionSource};
use shard_server::agent_manager::{AgentFuture, AgentManager, AgentStatus};
use shard_server::error::ShardError;
use shard_types::AgentConfig;
use tokio::sync::Mutex;
use tracing::warn;

/// Canned reply sent when the LLM pipeline produced no assistant turn for
/// a chat message (timeout, parse failure, or backend error). `spec.md`
/// §7: "chat falls back to canned response".
const CHAT_FALLBACK: &str = "I'm weighing my options right now. Ask me again in a moment.";

/// Extra margin added to `poll_interval + poll_jitter` when waiting for a
/// freshly deployed agent's first tick, to absorb scheduling jitter on a
/// busy host (`spec.md` §4.J: "wait for first tick confirmation or fail").
const FIRST_TICK_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

struct DeployedAgent {
    handle: AgentLoop,
    config: Arc<Mutex<AgentConfig>>,
}

/// Manages one [`AgentLoop`] per deployed wallet, all sharing a single
/// stateless [`AgentRunner`] and the live perception/action implementations.
pub struct LiveAgentManager {
    runner: Arc<AgentRunner>,
    perception_source: Arc<dyn PerceptionSource>,
    action_pipeline: Arc<dyn ActionPipeline>,
    poll_interval: Duration,
    poll_jitter: Duration,
    max_backoff: Duration,
    agents: Mutex<BTreeMap<String, DeployedAgent>>,
}

impl LiveAgentManager {
    /// Build an agent manager around the given runner and live pipelines.
    #[must_use]
    pub fn new(
        runner: Arc<AgentRunner>,
        perception_source: Arc<dyn PerceptionSource>,
        action_pipeline: Arc<dyn ActionPipeline>,
        poll_interval: Duration,
        poll_jitter: Duration,
        max_backoff: Duration,
    ) -> Self {
        Self {
            runner,
            perception_source,
            action_pipeline,
            poll_interval,
            poll_jitter,
            max_backoff,
            agents: Mutex::new(BTreeMap::new()),
        }
    }
}

impl AgentManager for LiveAgentManager {
    fn deploy(&self, wallet: String, config: AgentConfig) -> AgentFuture<'_, ()> {
        Box::pin(async move {
            let mut agents = self.agents.lock().await;
            if let Some(existing) = agents.get(&wallet) {
                *existing.config.lock().await = config;
                return Ok(());
            }

            let shared_config = Arc::new(Mutex::new(config));
            let handle = AgentLoop::spawn(
                self.runner.clone(),
                self.perception_source.clone(),
                self.action_pipeline.clone(),
                shared_config.clone(),
                self.poll_interval,
                self.poll_jitter,
                self.max_backoff,
            );

            // Holds the registry lock for the confirmation wait too, so a
            // second deploy for the same wallet can't race the insert below
            // (§5: "one in-flight loop per wallet").
            let confirm_timeout = self.poll_interval.saturating_add(self.poll_jitter).saturating_add(FIRST_TICK_TIMEOUT_MARGIN);
            if !handle.wait_for_first_cycle(confirm_timeout).await {
                handle.stop().await;
                return Err(ShardError::ExternalUnavailable(format!(
                    "agent for wallet {wallet} did not produce a first tick within {confirm_timeout:?}"
                )));
            }

            agents.insert(wallet, DeployedAgent { handle, config: shared_config });
            Ok(())
        })
    }

    fn stop(&self, wallet: String) -> AgentFuture<'_, ()> {
        Box::pin(async move {
            let removed = self.agents.lock().await.remove(&wallet);
            if let Some(agent) = removed {
                agent.handle.stop().await;
            }
            Ok(())
        })
    }

    fn status(&self, wallet: String) -> AgentFuture<'_, AgentStatus> {
        Box::pin(async move {
            let agents = self.agents.lock().await;
            let agent = agents.get(&wallet).ok_or_else(|| ShardError::NotFound(format!("no agent deployed for wallet {wallet}")))?;
            let config = agent.config.lock().await.clone();
            let cost_usd = self.runner.cost_summary().total_estimated_cost.to_string().parse::<f64>().unwrap_or(0.0);
            Ok(AgentStatus { running: true, config, cost_usd })
        })
    }

    fn chat(&self, wallet: String, message: String) -> AgentFuture<'_, String> {
        Box::pin(async move {
            let agents = self.agents.lock().await;
            let agent = agents.get(&wallet).ok_or_else(|| ShardError::NotFound(format!("no agent deployed for wallet {wallet}")))?;
            let mut config = agent.config.lock().await;
            let entity_ref = config
                .entity_ref
                .ok_or_else(|| ShardError::Validation(format!("wallet {wallet} has no controlled entity")))?;

            let perception = match self.perception_source.perceive(entity_ref).await {
                Ok(perception) => perception,
                Err(e) => {
                    warn!(wallet = wallet.as_str(), error = %e, "perception unavailable for chat");
                    return Ok(CHAT_FALLBACK.to_owned());
                }
            };

            let decision = match self.runner.chat(&mut config, &perception, &message).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(wallet = wallet.as_str(), error = %e, "chat decision pipeline failed");
                    return Ok(CHAT_FALLBACK.to_owned());
                }
            };

            if let Some(action) = decision {
                if let Some(request) = build_action_request(entity_ref, wallet.clone(), action) {
                    if let Err(e) = self.action_pipeline.submit(request).await {
                        warn!(wallet = wallet.as_str(), error = %e, "chat-triggered action failed to submit");
                    }
                }
            }

            let reply = config
                .chat_history
                .iter()
                .rev()
                .find(|turn| turn.role == "assistant")
                .map(|turn| turn.content.clone())
                .unwrap_or_else(|| CHAT_FALLBACK.to_owned());
            Ok(reply)
        })
    }
}
