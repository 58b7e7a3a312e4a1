//! Agent decision runner: the core pipeline from perception to action.
//!
//! Orchestrates the per-wallet decision loop:
//! 1. Fetch perception (own entity, nearby entities, inventory summary)
//!    through the [`PerceptionSource`] the host application provides.
//! 2. Consult `AgentConfig.focus`/`strategy`; try the deterministic
//!    focus-action bypass before paying for an LLM call.
//! 3. If the fast path has nothing obvious to do, score decision
//!    complexity and call an LLM backend with the `update_focus`/
//!    `take_action` tool schema.
//! 4. Resolve whatever the LLM (or the fast path) chose into a concrete,
//!    targeted [`ResolvedAction`] and submit it through the
//!    [`ActionPipeline`] -- the same pipeline human clients use.
//! 5. [`AgentLoop`] sleeps a bounded, jittered interval between cycles,
//!    backing off on repeated failures, until told to stop.
//!
//! A decision deadline is always enforced: if the LLM call does not return
//! in time, the cycle submits no action and tries again next cycle rather
//! than blocking the loop.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use shard_types::actions::{ActionParameters, ActionRequest, ActionResult};
use shard_types::enums::ActionType;
use shard_types::perception::AgentPerception;
use shard_types::structs::{AgentConfig, ChatTurn, EntityRef};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::complexity::{score_complexity, ComplexityLevel};
use crate::containment;
use crate::error::RunnerError;
use crate::focus::{self, ResolvedAction};
use crate::llm::LlmBackend;
use crate::parse::{parse_llm_response, AgentDecision};
use crate::prompt::{PromptEngine, RenderedPrompt};

/// A source of perception payloads, implemented by whatever owns the live
/// zone state (the host application's zone runtime).
///
/// Defined as a hand-rolled `Pin<Box<dyn Future>>` trait rather than with
/// `#[async_trait]` so it stays dyn-compatible without an extra macro
/// dependency; callers box their implementation once at startup.
pub trait PerceptionSource: Send + Sync {
    /// Build the current perception payload for the entity an agent controls.
    fn perceive(
        &self,
        entity_ref: EntityRef,
    ) -> Pin<Box<dyn Future<Output = Result<AgentPerception, RunnerError>> + Send + '_>>;
}

/// The authenticated action pipeline, shared with human HTTP clients.
pub trait ActionPipeline: Send + Sync {
    /// Submit an action request and await its resolution.
    fn submit(
        &self,
        request: ActionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ActionResult, RunnerError>> + Send + '_>>;
}

/// Estimate a token count from a string's byte length for cost tracking.
///
/// No backend in `llm.rs` exposes actual usage counts (both APIs' usage
/// fields are ignored by [`crate::llm::extract_openai_content`] /
/// [`crate::llm::extract_anthropic_content`]), so costs are approximated
/// at roughly four bytes per token, a commonly used rule of thumb for
/// English-plus-JSON prompts.
fn estimate_tokens(text: &str) -> u64 {
    let len = u64::try_from(text.len()).unwrap_or(u64::MAX);
    len.checked_div(4).unwrap_or(len).max(1)
}

/// The agent decision runner.
///
/// Holds the components needed to turn one perception payload into a
/// resolved action: the prompt engine, LLM backends (primary + optional
/// escalation), a cost tracker, and routing/bypass configuration flags.
/// Stateless with respect to any one wallet -- all per-wallet state lives
/// in the caller's [`AgentConfig`].
pub struct AgentRunner {
    prompt_engine: PromptEngine,
    primary_backend: LlmBackend,
    escalation_backend: Option<LlmBackend>,
    cost_tracker: crate::cost::CostTracker,
    decision_timeout: Duration,
    /// When true, try [`focus::default_action_for_focus`] before calling
    /// the LLM at all (§4.J step 3's fast path).
    focus_action_bypass: bool,
    /// When true, high-complexity decisions are routed to the escalation
    /// backend first instead of the primary backend.
    complexity_routing_enabled: bool,
    /// Maximum number of chat turns retained per wallet.
    chat_history_cap: usize,
}

impl AgentRunner {
    /// Create a new agent runner with all required components.
    pub fn new(
        prompt_engine: PromptEngine,
        primary_backend: LlmBackend,
        escalation_backend: Option<LlmBackend>,
        cost_tracker: crate::cost::CostTracker,
        decision_timeout: Duration,
        focus_action_bypass: bool,
        complexity_routing_enabled: bool,
        chat_history_cap: usize,
    ) -> Self {
        Self {
            prompt_engine,
            primary_backend,
            escalation_backend,
            cost_tracker,
            decision_timeout,
            focus_action_bypass,
            complexity_routing_enabled,
            chat_history_cap,
        }
    }

    /// Cost tracking accumulated across every LLM call this runner made.
    pub fn cost_summary(&self) -> crate::cost::CostSummary {
        self.cost_tracker.summary()
    }

    /// Run one decision cycle for a single wallet's agent.
    ///
    /// Tries the deterministic fast path first (if enabled), then falls
    /// through to the full LLM pipeline under a timeout. Mutates `config`
    /// in place when the decision changes focus/strategy/target zone.
    /// Returns the action to submit this cycle, or `None` if nothing
    /// should be submitted (fast path had nothing to do, the LLM chose to
    /// update focus only, parsing failed, or the deadline was exceeded).
    pub async fn decide(
        &self,
        config: &mut AgentConfig,
        perception: &AgentPerception,
    ) -> Option<ResolvedAction> {
        let wallet = config.custodial_wallet.clone();

        if self.focus_action_bypass {
            let action = focus::default_action_for_focus(config.focus, perception);
            if action != ResolvedAction::Idle {
                debug!(wallet = wallet.as_str(), ?action, "decision resolved by focus bypass, skipping LLM");
                return Some(action);
            }
        }

        match tokio::time::timeout(self.decision_timeout, self.decide_inner(config, perception, None)).await {
            Ok(Ok(action)) => action,
            Ok(Err(e)) => {
                warn!(wallet = wallet.as_str(), error = %e, "decision pipeline failed, taking no action this cycle");
                None
            }
            Err(_) => {
                warn!(
                    wallet = wallet.as_str(),
                    timeout_ms = self.decision_timeout.as_millis(),
                    "decision deadline exceeded, taking no action this cycle"
                );
                None
            }
        }
    }

    /// Handle one chat turn (`spec.md` §4.J chat endpoint).
    ///
    /// Appends the user message to `config.chat_history`, asks the LLM
    /// with a conversation-shaped prompt, applies whatever tool call comes
    /// back, and appends an assistant turn summarizing the reasoning.
    /// Trims the transcript to [`Self::chat_history_cap`] turns.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the LLM call or prompt rendering fails,
    /// or if the deadline is exceeded. A parse failure is not an error --
    /// it simply yields no action.
    pub async fn chat(
        &self,
        config: &mut AgentConfig,
        perception: &AgentPerception,
        user_message: &str,
    ) -> Result<Option<ResolvedAction>, RunnerError> {
        push_chat_turn(config, "user", user_message.to_owned(), self.chat_history_cap);

        tokio::time::timeout(
            self.decision_timeout,
            self.decide_inner(config, perception, Some(user_message)),
        )
        .await
        .map_err(|_| RunnerError::LlmBackend("chat response deadline exceeded".to_owned()))?
    }

    /// Inner decision logic (without the timeout wrapper), shared by
    /// [`Self::decide`] and [`Self::chat`].
    async fn decide_inner(
        &self,
        config: &mut AgentConfig,
        perception: &AgentPerception,
        chat_message: Option<&str>,
    ) -> Result<Option<ResolvedAction>, RunnerError> {
        let wallet = config.custodial_wallet.clone();
        let complexity = score_complexity(perception, config.chat_history.len());

        debug!(wallet = wallet.as_str(), %complexity, "decision complexity scored");

        let context = build_context(config, perception)?;
        let prompt = self.prompt_engine.render(&context)?;

        let start = Instant::now();
        let (raw_response, backend_label) = self.call_with_routing(&wallet, complexity, &prompt).await?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        self.cost_tracker.record_call(
            &backend_label,
            estimate_tokens(&prompt.system) + estimate_tokens(&prompt.user),
            estimate_tokens(&raw_response),
        );

        let containment_result = containment::scan_response(&raw_response);
        if containment_result.threats_detected {
            warn!(
                wallet = wallet.as_str(),
                threat_count = containment_result.findings.len(),
                "containment: threats detected in LLM response"
            );
        }

        if let Some(message) = chat_message {
            let scan = containment::scan_message(message);
            if scan.threats_detected {
                warn!(
                    wallet = wallet.as_str(),
                    threat_count = scan.findings.len(),
                    "containment: threats detected in chat message"
                );
            }
        }

        let parsed = parse_llm_response(&raw_response);

        info!(
            wallet = wallet.as_str(),
            %complexity,
            backend = backend_label.as_str(),
            latency_ms,
            decision = ?parsed.decision,
            reasoning = ?parsed.reasoning,
            "decision parsed"
        );

        if let Some(reasoning) = parsed.reasoning.clone() {
            push_chat_turn(config, "assistant", reasoning, self.chat_history_cap);
        }

        let Some(decision) = parsed.decision else {
            return Ok(None);
        };

        Ok(apply_decision(config, perception, decision))
    }

    /// Call the LLM with complexity-aware backend routing and fallback.
    ///
    /// High complexity (with routing enabled and an escalation backend
    /// configured) tries escalation first; everything else tries the
    /// primary backend first. Either way, the other backend is tried once
    /// as a fallback before giving up.
    ///
    /// Returns the raw response text and the backend label (`"primary"`
    /// or `"escalation"`) used for cost-tier pricing.
    async fn call_with_routing(
        &self,
        wallet: &str,
        complexity: ComplexityLevel,
        prompt: &RenderedPrompt,
    ) -> Result<(String, String), RunnerError> {
        let escalation_first = self.complexity_routing_enabled
            && complexity == ComplexityLevel::High
            && self.escalation_backend.is_some();

        if escalation_first {
            if let Some(escalation) = &self.escalation_backend {
                match escalation.complete(prompt).await {
                    Ok(response) => return Ok((response, "escalation".to_owned())),
                    Err(e) => warn!(wallet, error = %e, "escalation backend failed, falling back to primary"),
                }
            }
            let response = self.primary_backend.complete(prompt).await?;
            return Ok((response, "primary".to_owned()));
        }

        match self.primary_backend.complete(prompt).await {
            Ok(response) => Ok((response, "primary".to_owned())),
            Err(primary_err) => {
                warn!(wallet, error = %primary_err, "primary backend failed, trying escalation fallback");
                let Some(escalation) = &self.escalation_backend else {
                    return Err(primary_err);
                };
                let response = escalation.complete(prompt).await?;
                Ok((response, "escalation".to_owned()))
            }
        }
    }
}

/// Apply a parsed decision to `config` (for focus updates) or resolve it
/// into a concrete action (for `take_action`).
fn apply_decision(
    config: &mut AgentConfig,
    perception: &AgentPerception,
    decision: AgentDecision,
) -> Option<ResolvedAction> {
    match decision {
        AgentDecision::UpdateFocus {
            focus,
            strategy,
            target_zone,
        } => {
            if let Some(focus) = focus {
                config.focus = focus;
            }
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if target_zone.is_some() {
                config.target_zone = target_zone;
            }
            config.last_updated = chrono::Utc::now();
            None
        }
        AgentDecision::TakeAction {
            action_type,
            profession,
        } => {
            let action = focus::resolve_action(action_type, profession, perception);
            (action != ResolvedAction::Idle).then_some(action)
        }
    }
}

/// Append a chat turn, trimming the oldest entries down to `cap`.
fn push_chat_turn(config: &mut AgentConfig, role: &str, content: String, cap: usize) {
    config.chat_history.push(ChatTurn {
        role: role.to_owned(),
        content,
        timestamp: chrono::Utc::now(),
    });
    let overflow = config.chat_history.len().saturating_sub(cap);
    if overflow > 0 {
        config.chat_history.drain(..overflow);
    }
}

/// Build the combined perception/focus/chat JSON context handed to the
/// prompt templates.
fn build_context(
    config: &AgentConfig,
    perception: &AgentPerception,
) -> Result<serde_json::Value, RunnerError> {
    let mut context = serde_json::to_value(perception)?;
    let Some(obj) = context.as_object_mut() else {
        return Err(RunnerError::Parse(
            "perception did not serialize to a JSON object".to_owned(),
        ));
    };
    obj.insert("focus".to_owned(), serde_json::to_value(config.focus)?);
    obj.insert("strategy".to_owned(), serde_json::to_value(config.strategy)?);
    obj.insert("target_zone".to_owned(), serde_json::to_value(config.target_zone)?);
    obj.insert(
        "chat_history".to_owned(),
        serde_json::to_value(&config.chat_history)?,
    );
    Ok(context)
}

/// Turn a [`ResolvedAction`] into the [`ActionRequest`] envelope the
/// action pipeline expects. Returns `None` for [`ResolvedAction::Idle`],
/// which never gets this far in practice since every call site filters
/// it out beforehand -- kept here so the match stays exhaustive.
///
/// Exposed publicly so a chat-triggered action (which bypasses
/// [`AgentLoop`]'s own cycle) can be resolved to an `ActionRequest` the
/// same way.
pub fn build_action_request(
    entity_ref: EntityRef,
    wallet_address: String,
    action: ResolvedAction,
) -> Option<ActionRequest> {
    let (action_type, parameters) = match action {
        ResolvedAction::Move { x, y } => (ActionType::Move, ActionParameters::Move { x, y }),
        ResolvedAction::Attack { target } => (
            ActionType::Attack,
            ActionParameters::Attack { target_id: target },
        ),
        ResolvedAction::UseTechnique { technique, target } => (
            ActionType::UseTechnique,
            ActionParameters::UseTechnique {
                technique_id: technique,
                target_id: target,
            },
        ),
        ResolvedAction::Gather { node, profession } => (
            ActionType::Gather,
            ActionParameters::Gather {
                profession,
                node_id: node,
            },
        ),
        ResolvedAction::Craft {
            station,
            recipe,
            profession,
        } => (
            ActionType::Craft,
            ActionParameters::Craft {
                profession,
                station_id: station,
                recipe_id: recipe,
            },
        ),
        // No recipe chosen yet; the caller (the zone-aware host
        // application, which holds the catalog) is expected to pick one
        // and submit `ResolvedAction::Craft` directly rather than route
        // through this fallback. Treated as nothing-to-submit here.
        ResolvedAction::ReadyToCraft { .. } => return None,
        ResolvedAction::QuestComplete { quest } => (
            ActionType::QuestComplete,
            ActionParameters::QuestComplete { quest_id: quest },
        ),
        ResolvedAction::Idle => return None,
    };

    Some(ActionRequest {
        zone_id: entity_ref.zone_id,
        entity_id: entity_ref.entity_id,
        wallet_address,
        action_type,
        parameters,
    })
}

/// Long-lived per-wallet driver task: `stopped -> starting -> running ->
/// stopping` (`spec.md` §4.J).
///
/// Mirrors the economy crate's `MerchantLoop` shape: an `mpsc` stop
/// channel plus a `JoinHandle`, so `stop` can observe the loop actually
/// exiting before returning (§5's "one in-flight loop per wallet").
pub struct AgentLoop {
    handle: JoinHandle<()>,
    stop: mpsc::Sender<()>,
    first_cycle: Arc<tokio::sync::Notify>,
}

impl AgentLoop {
    /// Spawn the decision loop for one wallet's agent.
    ///
    /// `config` is shared with whatever else can mutate it (e.g. the chat
    /// HTTP handler), so both the loop and outside callers always see the
    /// latest focus/strategy/chat history.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        runner: Arc<AgentRunner>,
        perception_source: Arc<dyn PerceptionSource>,
        action_pipeline: Arc<dyn ActionPipeline>,
        config: Arc<Mutex<AgentConfig>>,
        poll_interval: Duration,
        poll_jitter: Duration,
        max_backoff: Duration,
    ) -> Self {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);
        let first_cycle = Arc::new(tokio::sync::Notify::new());
        let first_cycle_task = first_cycle.clone();

        let handle = tokio::spawn(async move {
            let mut backoff = poll_interval;
            let mut confirmed_first_cycle = false;

            loop {
                let sleep_for = poll_interval.saturating_add(jitter(poll_jitter));
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    () = tokio::time::sleep(sleep_for) => {}
                }

                let entity_ref = {
                    let guard = config.lock().await;
                    guard.entity_ref
                };
                let Some(entity_ref) = entity_ref else {
                    continue;
                };

                let cycle_result = run_one_cycle(
                    &runner,
                    perception_source.as_ref(),
                    action_pipeline.as_ref(),
                    &config,
                    entity_ref,
                )
                .await;

                if !confirmed_first_cycle {
                    confirmed_first_cycle = true;
                    first_cycle_task.notify_one();
                }

                match cycle_result {
                    Ok(()) => backoff = poll_interval,
                    Err(e) => {
                        warn!(error = %e, "agent cycle failed, backing off");
                        backoff = std::cmp::min(backoff.saturating_mul(2), max_backoff);
                        tokio::select! {
                            _ = stop_rx.recv() => break,
                            () = tokio::time::sleep(backoff) => {}
                        }
                    }
                }
            }
        });

        Self { handle, stop: stop_tx, first_cycle }
    }

    /// Wait until the loop has completed its first fetch-decide-submit
    /// cycle (regardless of whether that cycle's action succeeded), or
    /// until `timeout` elapses.
    ///
    /// Used by the deploy flow to confirm the loop is actually alive
    /// before reporting success (`spec.md` §4.J: "wait for first tick
    /// confirmation or fail").
    pub async fn wait_for_first_cycle(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.first_cycle.notified()).await.is_ok()
    }

    /// Signal the loop to stop and wait for it to actually exit.
    pub async fn stop(self) {
        let _ = self.stop.send(()).await;
        let _ = self.handle.await;
    }
}

/// Random jitter in `[0, max]`, added to the base poll interval so many
/// agents waking on the same cadence don't all hit their backends at once.
fn jitter(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    let millis = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    let picked = rand::rng().random_range(0..=millis);
    Duration::from_millis(picked)
}

/// One full fetch-decide-submit cycle for a wallet's agent.
async fn run_one_cycle(
    runner: &AgentRunner,
    perception_source: &dyn PerceptionSource,
    action_pipeline: &dyn ActionPipeline,
    config: &Mutex<AgentConfig>,
    entity_ref: EntityRef,
) -> Result<(), RunnerError> {
    let perception = perception_source.perceive(entity_ref).await?;

    let mut guard = config.lock().await;
    let action = runner.decide(&mut guard, &perception).await;
    let wallet_address = guard.custodial_wallet.clone();
    drop(guard);

    let Some(action) = action else {
        return Ok(());
    };

    let Some(request) = build_action_request(entity_ref, wallet_address, action) else {
        return Ok(());
    };

    let result = action_pipeline.submit(request).await?;
    if !result.success {
        debug!(rejection = ?result.rejection, "agent action rejected");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shard_types::enums::{ClassId, Profession, RaceId};
    use shard_types::ids::{EntityId, ZoneId};
    use shard_types::perception::SelfState;
    use shard_types::structs::{AgentFocus, AgentStrategy, Stats};

    fn test_config() -> AgentConfig {
        AgentConfig {
            enabled: true,
            focus: AgentFocus::Idle,
            strategy: AgentStrategy::Balanced,
            target_zone: None,
            chat_history: Vec::new(),
            custodial_wallet: "0xAGENT".to_owned(),
            entity_ref: Some(EntityRef {
                zone_id: ZoneId::new(),
                entity_id: EntityId::new(),
            }),
            last_updated: chrono::Utc::now(),
        }
    }

    fn test_perception() -> AgentPerception {
        AgentPerception {
            tick: 1,
            zone_id: ZoneId::new(),
            self_state: SelfState {
                id: EntityId::new(),
                name: "Test".to_owned(),
                level: 1,
                xp: 0,
                race_id: RaceId::Human,
                class_id: ClassId::Warrior,
                hp: 100,
                max_hp: 100,
                essence: 10,
                max_essence: 10,
                x: 0.0,
                y: 0.0,
                effective_stats: Stats {
                    strength: 0,
                    agility: 0,
                    intellect: 0,
                    vitality: 0,
                },
                equipment: Default::default(),
                learned_techniques: Vec::new(),
                on_cooldown: Default::default(),
                active_effects: Vec::new(),
                gold_balance: "0g".to_owned(),
                copper_balance: 0,
            },
            nearby_entities: Vec::new(),
            available_quests: Vec::new(),
            party: None,
            pending_trades: Vec::new(),
            notifications: Vec::new(),
        }
    }

    #[test]
    fn estimate_tokens_nonzero_for_short_strings() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens(&"a".repeat(400)), 100);
    }

    #[test]
    fn apply_update_focus_mutates_config_and_returns_no_action() {
        let mut config = test_config();
        let perception = test_perception();
        let decision = AgentDecision::UpdateFocus {
            focus: Some(AgentFocus::Combat),
            strategy: Some(AgentStrategy::Aggressive),
            target_zone: None,
        };
        let action = apply_decision(&mut config, &perception, decision);
        assert!(action.is_none());
        assert_eq!(config.focus, AgentFocus::Combat);
        assert_eq!(config.strategy, AgentStrategy::Aggressive);
    }

    #[test]
    fn apply_take_action_idle_yields_no_action() {
        let mut config = test_config();
        let perception = test_perception();
        let decision = AgentDecision::TakeAction {
            action_type: ActionType::Attack,
            profession: None,
        };
        // No hostiles nearby: resolve_action -> Idle -> filtered to None.
        assert!(apply_decision(&mut config, &perception, decision).is_none());
    }

    #[test]
    fn push_chat_turn_trims_to_cap() {
        let mut config = test_config();
        for i in 0..5 {
            push_chat_turn(&mut config, "user", format!("msg {i}"), 3);
        }
        assert_eq!(config.chat_history.len(), 3);
        assert_eq!(config.chat_history[0].content, "msg 2");
    }

    #[test]
    fn build_context_includes_focus_and_chat_history() {
        let config = test_config();
        let perception = test_perception();
        let context = build_context(&config, &perception).unwrap_or_else(|_| serde_json::json!({}));
        assert!(context.get("focus").is_some());
        assert!(context.get("chat_history").is_some());
        assert!(context.get("tick").is_some());
    }

    #[test]
    fn build_action_request_gather_carries_profession() {
        let entity_ref = EntityRef {
            zone_id: ZoneId::new(),
            entity_id: EntityId::new(),
        };
        let node = EntityId::new();
        let request = build_action_request(
            entity_ref,
            "0xAGENT".to_owned(),
            ResolvedAction::Gather {
                node,
                profession: Profession::Mining,
            },
        )
        .expect("gather resolves to a request");
        assert_eq!(request.action_type, ActionType::Gather);
        assert!(matches!(
            request.parameters,
            ActionParameters::Gather {
                profession: Profession::Mining,
                node_id,
            } if node_id == node
        ));
    }

    #[test]
    fn build_action_request_idle_is_none() {
        let entity_ref = EntityRef {
            zone_id: ZoneId::new(),
            entity_id: EntityId::new(),
        };
        assert!(build_action_request(entity_ref, "0xAGENT".to_owned(), ResolvedAction::Idle).is_none());
    }

    #[test]
    fn jitter_never_exceeds_max() {
        let max = Duration::from_millis(50);
        for _ in 0..20 {
            assert!(jitter(max) <= max);
        }
    }
}
