//! Shared application state for the shard HTTP server.
//!
//! [`AppState`] is the single `Arc`-wrapped handle threaded through every
//! handler via Axum's `State` extractor. It never holds a module-level
//! global (`spec.md` §9): every handler reaches the zone runtime, ledgers,
//! chain driver, persistence store, and catalog only through this struct.

use std::collections::BTreeMap;
use std::sync::Arc;

use shard_catalog::Catalog;
use shard_chain::ChainDriver;
use shard_core::OperatorState;
use shard_db::PersistenceStore;
use shard_economy::MerchantState;
use shard_ledger::{ConservationLedger, GoldLedger};
use shard_techniques::TechniqueCatalog;
use shard_types::{EntityId, PartyId, TradeId, ZoneId};
use shard_world::runtime::TickReport;
use shard_world::runtime::ZoneRuntime;
use tokio::sync::{broadcast, Mutex};

use shard_actions::trade::PendingTrade;
use shard_types::Party;

use crate::agent_manager::AgentManager;
use crate::auth::AuthState;

/// Capacity of the `/ws` broadcast channel.
///
/// A subscriber that falls behind by more than this many ticks receives a
/// [`broadcast::error::RecvError::Lagged`] and resumes from the newest
/// message rather than blocking the tick loop.
const BROADCAST_CAPACITY: usize = 256;

/// One zone's worth of events, pushed to `/ws` subscribers each tick.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TickBroadcast {
    /// The scheduler tick this broadcast corresponds to.
    pub tick: u64,
    /// Per-zone event reports produced by that tick, keyed by zone.
    pub zones: BTreeMap<ZoneId, Vec<String>>,
}

/// Shared state for the shard HTTP server.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. Every
/// field is itself independently lockable/shareable so one slow handler
/// never blocks another resource's readers.
#[derive(Clone)]
pub struct AppState {
    /// The live zone runtime (§4.E), shared with the tick scheduler.
    pub world: Arc<Mutex<ZoneRuntime>>,
    /// The immutable static catalog (items, recipes, zones, quests, loot).
    pub catalog: Arc<Catalog>,
    /// Registry of procedurally generated and catalog techniques.
    pub techniques: Arc<Mutex<TechniqueCatalog>>,
    /// Adapter to the external ledger (§4.B).
    pub chain: Arc<ChainDriver>,
    /// Per-wallet pending-spend reservation against on-chain gold (§3).
    pub gold_ledger: Arc<Mutex<GoldLedger>>,
    /// Append-only conservation bookkeeping log (§4.C).
    pub ledger: Arc<Mutex<ConservationLedger>>,
    /// Hot + cold persistence (§4.D): character saves, diaries, events.
    pub persistence: Arc<PersistenceStore>,
    /// Live merchant agent state, keyed by the merchant's entity id (§4.I).
    pub merchants: Arc<Mutex<BTreeMap<EntityId, MerchantState>>>,
    /// Pending player-to-player trade offers, keyed by trade id (§4.F
    /// `trade_offer`/`trade_accept`/`trade_reject`).
    pub pending_trades: Arc<Mutex<BTreeMap<TradeId, PendingTrade>>>,
    /// Live parties, keyed by party id (§4.F `party_form`/`party_leave`).
    pub parties: Arc<Mutex<BTreeMap<PartyId, Party>>>,
    /// Shared pause/resume/speed/stop control plane (§9).
    pub operator: Arc<OperatorState>,
    /// Challenge/token bookkeeping for the wallet-signature auth flow (§6).
    pub auth: Arc<AuthState>,
    /// The host application's agent-deployment surface, if autonomous play
    /// is enabled for this deployment. `None` disables `/agent/*` routes.
    pub agents: Option<Arc<dyn AgentManager>>,
    /// Broadcast sender feeding `/ws` subscribers.
    pub ticks: broadcast::Sender<TickBroadcast>,
}

impl AppState {
    /// Construct state around the given core resources, with no agent
    /// manager attached (`/agent/*` routes respond `503`).
    #[must_use]
    pub fn new(
        world: Arc<Mutex<ZoneRuntime>>,
        catalog: Arc<Catalog>,
        techniques: Arc<Mutex<TechniqueCatalog>>,
        chain: Arc<ChainDriver>,
        persistence: Arc<PersistenceStore>,
        operator: Arc<OperatorState>,
        auth: Arc<AuthState>,
    ) -> Self {
        let (ticks, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            world,
            catalog,
            techniques,
            chain,
            gold_ledger: Arc::new(Mutex::new(GoldLedger::new())),
            ledger: Arc::new(Mutex::new(ConservationLedger::new())),
            persistence,
            merchants: Arc::new(Mutex::new(BTreeMap::new())),
            pending_trades: Arc::new(Mutex::new(BTreeMap::new())),
            parties: Arc::new(Mutex::new(BTreeMap::new())),
            operator,
            auth,
            agents: None,
            ticks,
        }
    }

    /// Attach an agent manager, enabling the `/agent/*` routes.
    #[must_use]
    pub fn with_agent_manager(mut self, agents: Arc<dyn AgentManager>) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Subscribe to the `/ws` tick broadcast.
    #[must_use]
    pub fn subscribe_ticks(&self) -> broadcast::Receiver<TickBroadcast> {
        self.ticks.subscribe()
    }

    /// Publish a tick's zone reports to connected `/ws` clients.
    ///
    /// Returns the number of receivers the message reached. Zero is not an
    /// error; it just means no client is currently connected.
    pub fn broadcast_tick(&self, tick: u64, reports: &BTreeMap<ZoneId, TickReport>) -> usize {
        let zones = reports
            .iter()
            .map(|(zone_id, report)| (*zone_id, report.events.iter().map(|event| format!("{event:?}")).collect()))
            .collect();
        self.ticks.send(TickBroadcast { tick, zones }).unwrap_or(0)
    }
}
