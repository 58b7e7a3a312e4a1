//! Shard engine binary: wires every crate together, loads configuration,
//! and runs the tick loop plus the HTTP surface.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing).
//! 2. Load [`ShardConfig`] from `shard-config.yaml` (falling back to
//!    defaults if the file is absent).
//! 3. Load the static [`Catalog`] from `CATALOG_DIR` (default `catalog`).
//! 4. Build the chain driver, persistence store, and auth state from
//!    their own env vars.
//! 5. Assemble [`AppState`] around the live zone runtime.
//! 6. If `RunnerConfig::from_env` succeeds, build a [`LiveAgentManager`]
//!    and attach it -- autonomous play is opt-in infrastructure, not a
//!    hard startup requirement.
//! 7. Spawn the [`TickScheduler`], broadcasting every tick over `/ws`.
//! 8. Run the HTTP server until terminated.

mod action_pipeline;
mod agent_manager;
mod error;
mod perception;
mod tick_observer;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use shard_agent_runner::{create_backend, AgentRunner, CostTracker, PromptEngine, RunnerConfig};
use shard_catalog::Catalog;
use shard_chain::{ChainDriver, ContractKind, HttpChainConfig, HttpChainDriver, StubChainDriver};
use shard_core::{OperatorState, ShardConfig, TickScheduler};
use shard_db::PersistenceStore;
use shard_server::auth::{AuthState, StubSignatureVerifier};
use shard_server::{AppState, ServerConfig};
use shard_techniques::TechniqueCatalog;
use shard_world::runtime::ZoneRuntime;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::action_pipeline::CommandActionPipeline;
use crate::agent_manager::LiveAgentManager;
use crate::error::EngineError;
use crate::perception::ZoneAwarePerceptionSource;
use crate::tick_observer::BroadcastTickObserver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("shard-engine starting");

    let config = load_config()?;
    info!(seed = config.world.seed, tick_interval_ms = config.world.tick_interval_ms, "configuration loaded");

    let catalog_dir = std::env::var("CATALOG_DIR").unwrap_or_else(|_| "catalog".to_owned());
    let catalog = Arc::new(Catalog::load(Path::new(&catalog_dir))?);
    info!(dir = catalog_dir.as_str(), zones = catalog.all_zones().count(), "catalog loaded");

    let chain = Arc::new(build_chain_driver());
    let persistence = Arc::new(build_persistence_store().await);
    let auth = Arc::new(AuthState::new(Arc::new(StubSignatureVerifier)));
    let operator = Arc::new(OperatorState::new(config.world.tick_interval_ms));

    let world = Arc::new(Mutex::new(ZoneRuntime::new()));
    let techniques = Arc::new(Mutex::new(TechniqueCatalog::new()));

    let mut state = AppState::new(
        Arc::clone(&world),
        Arc::clone(&catalog),
        Arc::clone(&techniques),
        Arc::clone(&chain),
        persistence,
        Arc::clone(&operator),
        auth,
    );

    match build_agent_manager(Arc::new(state.clone())) {
        Some(agents) => {
            info!("autonomous play enabled: LLM backend configured");
            state = state.with_agent_manager(agents);
        }
        None => {
            info!("autonomous play disabled: no LLM backend configured (set LLM_DEFAULT_BACKEND/API_URL/API_KEY/MODEL to enable)");
        }
    }

    let state = Arc::new(state);

    let observer = Arc::new(BroadcastTickObserver::new(Arc::clone(&state)));
    let scheduler = TickScheduler::spawn(world, operator, observer, config.world.seed);

    let server_config = ServerConfig {
        host: std::env::var("SHARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_owned()),
        port: std::env::var("SHARD_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080),
    };

    info!(host = server_config.host.as_str(), port = server_config.port, "starting HTTP server");
    let result = shard_server::start_server(&server_config, state).await;

    scheduler.stop().await;
    result.map_err(EngineError::from)?;

    info!("shard-engine shutdown complete");
    Ok(())
}

/// Load [`ShardConfig`] from `shard-config.yaml`, or defaults if absent.
fn load_config() -> Result<ShardConfig, EngineError> {
    let config_path = Path::new("shard-config.yaml");
    if config_path.exists() {
        Ok(ShardConfig::from_file(config_path)?)
    } else {
        info!("config file not found, using defaults");
        Ok(ShardConfig::default())
    }
}

/// Build the chain driver from `CHAIN_RPC_URL`/`CHAIN_ID`/`CHAIN_CONTRACT_*`
/// env vars, falling back to an in-memory stub for local runs and tests.
fn build_chain_driver() -> ChainDriver {
    let Ok(rpc_url) = std::env::var("CHAIN_RPC_URL") else {
        info!("CHAIN_RPC_URL not set, using in-memory stub chain driver");
        return ChainDriver::Stub(StubChainDriver::new());
    };
    let chain_id: u64 = std::env::var("CHAIN_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(1);
    let mut config = HttpChainConfig::new(rpc_url, chain_id);
    for (kind, env_var) in [
        (ContractKind::Gold, "CHAIN_CONTRACT_GOLD"),
        (ContractKind::Item, "CHAIN_CONTRACT_ITEM"),
        (ContractKind::Character, "CHAIN_CONTRACT_CHARACTER"),
        (ContractKind::Reputation, "CHAIN_CONTRACT_REPUTATION"),
        (ContractKind::AuctionHouse, "CHAIN_CONTRACT_AUCTIONHOUSE"),
    ] {
        if let Ok(address) = std::env::var(env_var) {
            config = config.with_contract(kind, address);
        }
    }
    ChainDriver::Http(HttpChainDriver::new(config))
}

/// Connect to Redis via `REDIS_URL`, falling back to an in-memory store.
async fn build_persistence_store() -> PersistenceStore {
    let Ok(url) = std::env::var("REDIS_URL") else {
        info!("REDIS_URL not set, using in-memory persistence store");
        return PersistenceStore::in_memory();
    };
    match PersistenceStore::connect_redis(&url).await {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "failed to connect to Redis, falling back to in-memory persistence store");
            PersistenceStore::in_memory()
        }
    }
}

/// Build the live autonomous-agent manager if `RunnerConfig::from_env`
/// succeeds, wiring it against the zone-aware perception source and
/// action pipeline. Returns `None` when no LLM backend is configured --
/// autonomous play is opt-in, not a startup requirement.
fn build_agent_manager(state: Arc<AppState>) -> Option<Arc<dyn shard_server::agent_manager::AgentManager>> {
    let runner_config = match RunnerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            info!(error = %e, "no agent runner configuration found");
            return None;
        }
    };

    let prompt_engine = match PromptEngine::new(&runner_config.templates_dir) {
        Ok(engine) => engine,
        Err(e) => {
            warn!(error = %e, "failed to load prompt templates, autonomous play disabled");
            return None;
        }
    };

    let primary_backend = create_backend(&runner_config.primary_backend);
    let escalation_backend = runner_config.secondary_backend.as_ref().map(create_backend);

    let cost_tracker = CostTracker::new(
        runner_config.primary_backend.cost_per_m_input.unwrap_or(Decimal::ZERO),
        runner_config.primary_backend.cost_per_m_output.unwrap_or(Decimal::ZERO),
        runner_config.secondary_backend.as_ref().and_then(|b| b.cost_per_m_input).unwrap_or(Decimal::ZERO),
        runner_config.secondary_backend.as_ref().and_then(|b| b.cost_per_m_output).unwrap_or(Decimal::ZERO),
    );

    let runner = Arc::new(AgentRunner::new(
        prompt_engine,
        primary_backend,
        escalation_backend,
        cost_tracker,
        runner_config.decision_timeout,
        runner_config.focus_action_bypass,
        runner_config.complexity_routing_enabled,
        runner_config.chat_history_cap,
    ));

    let perception_source = Arc::new(ZoneAwarePerceptionSource::new(Arc::clone(&state)));
    let action_pipeline = Arc::new(CommandActionPipeline::new(state));

    Some(Arc::new(LiveAgentManager::new(
        runner,
        perception_source,
        action_pipeline,
        runner_config.poll_interval,
        runner_config.poll_jitter,
        runner_config.max_backoff,
    )))
}
