//! [`TickObserver`] implementation that forwards each tick's zone reports
//! to `/ws` subscribers via [`AppState::broadcast_tick`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use shard_core::TickObserver;
use shard_server::AppState;
use shard_types::ZoneId;
use shard_world::runtime::TickReport;

/// Broadcasts each scheduler tick's reports over `/ws`.
///
/// `TickReport` carries no tick number of its own (each zone keeps its own
/// independent tick counter), so this observer maintains its own
/// monotonic sequence number purely for the broadcast envelope.
pub struct BroadcastTickObserver {
    state: Arc<AppState>,
    sequence: AtomicU64,
}

impl BroadcastTickObserver {
    /// Build an observer that broadcasts through the given shared state.
    #[must_use]
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state, sequence: AtomicU64::new(0) }
    }
}

impl TickObserver for BroadcastTickObserver {
    fn on_tick(&self, reports: &BTreeMap<ZoneId, TickReport>) {
        let tick = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.state.broadcast_tick(tick, reports);
    }
}
