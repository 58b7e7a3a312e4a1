//! Configuration loading for the tick scheduler and operator control plane.
//!
//! The canonical configuration lives in a YAML file at the deployment root
//! (`shard-config.yaml`); a handful of infrastructure values can be
//! overridden by environment variables so deployments never need to edit
//! the file just to point at a different database or RPC endpoint.
//!
//! Per-crate configuration owned elsewhere (the chain driver's RPC/contract
//! settings, the persistence store's connection URLs, the agent runner's
//! LLM backend settings, the HTTP surface's port/auth) is loaded directly
//! by those crates from their own env vars at startup (`shard-engine`
//! wires them together); this module only covers what the scheduler and
//! operator control plane need themselves.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level scheduler configuration.
///
/// Mirrors the structure of `shard-config.yaml`. All fields have sensible
/// defaults so an empty or partial file still produces a usable config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShardConfig {
    /// World tick scheduling settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Operator control-plane settings.
    #[serde(default)]
    pub operator: OperatorConfig,
}

impl ShardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `ZONE_TICK_INTERVAL_MS` overrides `world.tick_interval_ms` when set
    /// (`spec.md` §6's config env var list, extended per `SPEC_FULL.md`
    /// §6 with this shard's own tick-cadence knob).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        if let Ok(val) = std::env::var("ZONE_TICK_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                config.world.tick_interval_ms = ms;
            }
        }
        Ok(config)
    }
}

/// World tick scheduling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed driving the tick scheduler's RNG (mob AI rolls, node
    /// respawn jitter), for reproducible test runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds between zone ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Operator control-plane configuration.
///
/// Settings for the operator surface that controls the tick scheduler at
/// runtime (pause, resume, speed, clean shutdown).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OperatorConfig {
    /// Whether the operator control surface is enabled.
    #[serde(default = "default_true")]
    pub api_enabled: bool,

    /// Bearer token for authenticating operator requests (empty = no auth).
    #[serde(default)]
    pub api_auth_token: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            api_enabled: true,
            api_auth_token: String::new(),
        }
    }
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ShardConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.tick_interval_ms, 1_000);
        assert!(config.operator.api_enabled);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  seed: 123
  tick_interval_ms: 500

operator:
  api_enabled: true
  api_auth_token: "secret"
"#;
        let config = ShardConfig::parse(yaml).expect("valid yaml");
        assert_eq!(config.world.seed, 123);
        assert_eq!(config.world.tick_interval_ms, 500);
        assert_eq!(config.operator.api_auth_token, "secret");
    }

    #[test]
    fn parse_minimal_yaml_uses_defaults() {
        let yaml = "world:\n  seed: 7\n";
        let config = ShardConfig::parse(yaml).expect("valid yaml");
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.tick_interval_ms, 1_000);
    }

    #[test]
    fn parse_empty_yaml_is_all_defaults() {
        let config = ShardConfig::parse("").expect("empty yaml is valid");
        assert_eq!(config, ShardConfig::default());
    }
}
