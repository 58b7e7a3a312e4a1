//! Configuration types for the agent runner.
//!
//! All configuration is loaded from environment variables. The runner
//! needs to know which LLM backends to use (with their URLs, API keys,
//! and model names) and how aggressively to skip calling them.

use std::time::Duration;

use crate::error::RunnerError;

/// Complete runner configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Primary LLM backend configuration.
    pub primary_backend: LlmBackendConfig,
    /// Secondary (escalation) LLM backend configuration.
    pub secondary_backend: Option<LlmBackendConfig>,
    /// Maximum time allowed for an agent to decide (LLM call + parsing).
    pub decision_timeout: Duration,
    /// Path to the templates directory.
    pub templates_dir: String,
    /// Whether to route LLM calls based on decision complexity scoring.
    ///
    /// When enabled, high-complexity decisions are sent to the escalation
    /// backend first, while low/medium complexity decisions use the
    /// primary (cheap/fast) backend. When disabled, all decisions use
    /// the primary backend with the escalation backend as fallback only.
    pub complexity_routing_enabled: bool,
    /// When true, bypass the LLM entirely for a focus/perception pair the
    /// deterministic focus engine can resolve on its own (§4.J step 3).
    pub focus_action_bypass: bool,
    /// Baseline interval between decision cycles for one agent.
    pub poll_interval: Duration,
    /// Maximum random jitter added to `poll_interval` to avoid thundering
    /// herds across many agents waking on the same cadence.
    pub poll_jitter: Duration,
    /// Upper bound for the exponential backoff applied after consecutive
    /// decision failures.
    pub max_backoff: Duration,
    /// Maximum number of turns kept in an agent's chat transcript.
    pub chat_history_cap: usize,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type (openai-compatible or anthropic).
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Price per million input tokens, for cost tracking.
    pub cost_per_m_input: Option<rust_decimal::Decimal>,
    /// Price per million output tokens, for cost tracking.
    pub cost_per_m_output: Option<rust_decimal::Decimal>,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions API.
    OpenAi,
    /// Anthropic Messages API (different request/response shape).
    Anthropic,
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `LLM_DEFAULT_BACKEND`, `LLM_DEFAULT_API_URL`,
    /// `LLM_DEFAULT_API_KEY`, `LLM_DEFAULT_MODEL`.
    ///
    /// Optional: the same four keys prefixed `LLM_ESCALATION_` for a
    /// second backend; `DECISION_TIMEOUT_MS` (default 7000);
    /// `TEMPLATES_DIR` (default `templates`); `COMPLEXITY_ROUTING_ENABLED`
    /// (default `true`); `FOCUS_ACTION_BYPASS` (default `true`);
    /// `POLL_INTERVAL_MS` (default 3000); `POLL_JITTER_MS` (default 500);
    /// `MAX_BACKOFF_MS` (default 60000).
    pub fn from_env() -> Result<Self, RunnerError> {
        let primary_backend = load_backend_config("LLM_DEFAULT")?;
        let secondary_backend = load_backend_config("LLM_ESCALATION").ok();

        let decision_timeout_ms = env_parse("DECISION_TIMEOUT_MS", 7_000)?;
        let templates_dir =
            std::env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_owned());
        let complexity_routing_enabled = env_parse("COMPLEXITY_ROUTING_ENABLED", true)?;
        let focus_action_bypass = env_parse("FOCUS_ACTION_BYPASS", true)?;
        let poll_interval_ms = env_parse("POLL_INTERVAL_MS", 3_000)?;
        let poll_jitter_ms = env_parse("POLL_JITTER_MS", 500)?;
        let max_backoff_ms = env_parse("MAX_BACKOFF_MS", 60_000)?;

        Ok(Self {
            primary_backend,
            secondary_backend,
            decision_timeout: Duration::from_millis(decision_timeout_ms),
            templates_dir,
            complexity_routing_enabled,
            focus_action_bypass,
            poll_interval: Duration::from_millis(poll_interval_ms),
            poll_jitter: Duration::from_millis(poll_jitter_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
            chat_history_cap: shard_types::BOUNDED_LIST_CAP,
        })
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, RunnerError> {
    std::env::var(name)
        .map_err(|e| RunnerError::Config(format!("missing required env var {name}: {e}")))
}

/// Parse an optional environment variable, falling back to `default`.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T, RunnerError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| RunnerError::Config(format!("invalid {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Load an LLM backend config from a set of prefixed environment variables.
fn load_backend_config(prefix: &str) -> Result<LlmBackendConfig, RunnerError> {
    let backend_str = env_var(&format!("{prefix}_BACKEND"))?;
    let api_url = env_var(&format!("{prefix}_API_URL"))?;
    let api_key = env_var(&format!("{prefix}_API_KEY"))?;
    let model = env_var(&format!("{prefix}_MODEL"))?;

    let backend_type = match backend_str.to_lowercase().as_str() {
        "openai" | "deepseek" | "ollama" => BackendType::OpenAi,
        "anthropic" | "claude" => BackendType::Anthropic,
        other => {
            return Err(RunnerError::Config(format!(
                "unknown backend type: {other}"
            )))
        }
    };

    let cost_per_m_input = std::env::var(format!("{prefix}_COST_PER_M_INPUT"))
        .ok()
        .and_then(|v| v.parse().ok());
    let cost_per_m_output = std::env::var(format!("{prefix}_COST_PER_M_OUTPUT"))
        .ok()
        .and_then(|v| v.parse().ok());

    Ok(LlmBackendConfig {
        backend_type,
        api_url,
        api_key,
        model,
        cost_per_m_input,
        cost_per_m_output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_parsing() {
        let config = LlmBackendConfig {
            backend_type: BackendType::OpenAi,
            api_url: "https://api.openai.com/v1".to_owned(),
            api_key: "test-key".to_owned(),
            model: "gpt-5-nano".to_owned(),
            cost_per_m_input: None,
            cost_per_m_output: None,
        };
        assert_eq!(config.backend_type, BackendType::OpenAi);

        let anthropic = LlmBackendConfig {
            backend_type: BackendType::Anthropic,
            api_url: "https://api.anthropic.com/v1".to_owned(),
            api_key: "test-key".to_owned(),
            model: "claude-haiku-4-5".to_owned(),
            cost_per_m_input: None,
            cost_per_m_output: None,
        };
        assert_eq!(anthropic.backend_type, BackendType::Anthropic);
    }

    #[test]
    fn env_parse_uses_default_when_unset() {
        std::env::remove_var("SHARD_AGENT_RUNNER_TEST_VALUE");
        let value: u64 = env_parse("SHARD_AGENT_RUNNER_TEST_VALUE", 42).unwrap_or(0);
        assert_eq!(value, 42);
    }
}
