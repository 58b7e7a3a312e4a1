//! Tick scheduler: the top-level loop that advances every live zone.
//!
//! Mirrors the `MerchantLoop`/`AgentLoop` background-task shape used
//! elsewhere in this workspace: a `stop` channel, a `tokio::spawn`'d task,
//! and a `tokio::select!` between the stop signal and a tick timer. Unlike
//! those loops, the scheduler drives a single shared [`ZoneRuntime`] rather
//! than one entity's state, and reports each tick's results to a
//! [`TickObserver`] instead of submitting an action.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use shard_world::runtime::{TickReport, ZoneRuntime};
use shard_types::ZoneId;
use std::collections::BTreeMap;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

use crate::operator::OperatorState;

/// Receives the result of each scheduler tick.
///
/// Implemented by the host application (`shard-engine`) to translate
/// [`TickReport`]s into durable events and `/ws` broadcasts. The trait is
/// hand-rolled rather than using `async-trait` so the scheduler stays
/// dependency-light, matching the convention used for
/// `PerceptionSource`/`ActionPipeline` in `shard-agent-runner`.
pub trait TickObserver: Send + Sync {
    /// Called once per scheduler tick with every zone's report.
    fn on_tick(&self, reports: &BTreeMap<ZoneId, TickReport>);
}

/// A [`TickObserver`] that does nothing, for tests and standalone runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&self, _reports: &BTreeMap<ZoneId, TickReport>) {}
}

/// Owns the shared [`ZoneRuntime`] and the background task that advances
/// it on a fixed cadence.
pub struct TickScheduler {
    stop_tx: mpsc::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl TickScheduler {
    /// Spawn the scheduler loop.
    ///
    /// `seed` seeds the scheduler's RNG (mob AI rolls, node respawn
    /// jitter) for reproducible test runs. The loop checks
    /// [`OperatorState::is_stop_requested`] and
    /// [`OperatorState::wait_if_paused`] each cycle, then advances every
    /// instantiated zone and hands the resulting reports to `observer`.
    pub fn spawn(
        world: Arc<Mutex<ZoneRuntime>>,
        operator: Arc<OperatorState>,
        observer: Arc<dyn TickObserver>,
        seed: u64,
    ) -> Self {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ticker = interval(Duration::from_millis(operator.tick_interval_ms()));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!("tick scheduler started");
            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        info!("tick scheduler stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        if operator.is_stop_requested() {
                            info!("tick scheduler stopping (operator request)");
                            break;
                        }
                        operator.wait_if_paused().await;
                        if operator.is_stop_requested() {
                            break;
                        }

                        let current_interval = Duration::from_millis(operator.tick_interval_ms());
                        if current_interval != ticker.period() {
                            ticker = interval(current_interval);
                            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        }

                        let reports = {
                            let mut world = world.lock().await;
                            world.tick(&mut rng)
                        };
                        debug!(zones = reports.len(), "tick complete");
                        observer.on_tick(&reports);
                    }
                }
            }
        });

        Self { stop_tx, handle }
    }

    /// Signal the scheduler to stop and wait for it to finish its current
    /// tick.
    pub async fn stop(self) {
        drop(self.stop_tx);
        if let Err(error) = self.handle.await {
            tracing::error!(%error, "tick scheduler task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shard_catalog::{Catalog, MobSpawn, ZoneLayout};
    use shard_types::ZoneBounds;

    use super::*;

    fn catalog_with_zone() -> (Catalog, ZoneId) {
        let zone_id = ZoneId::new();
        let layout = ZoneLayout {
            id: zone_id,
            name: String::from("wild-meadow"),
            bounds: ZoneBounds { min_x: 0.0, min_y: 0.0, max_x: 100.0, max_y: 100.0 },
            mob_spawns: vec![MobSpawn {
                mob_name: String::from("Goblin"),
                x: 10.0,
                y: 10.0,
                level: 1,
                max_hp: 20,
                xp_reward: 5,
                loot_table: String::from("goblin"),
                skinnable: false,
            }],
            resource_nodes: Vec::new(),
            portals: Vec::new(),
        };
        let dir = std::env::temp_dir().join(format!("shard-core-scheduler-test-{zone_id}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join("items.yaml"), "[]").expect("write items");
        std::fs::write(dir.join("recipes.yaml"), "[]").expect("write recipes");
        std::fs::write(dir.join("techniques.yaml"), "[]").expect("write techniques");
        std::fs::write(dir.join("zones.yaml"), serde_yml::to_string(&vec![layout]).expect("serialize")).expect("write zones");
        std::fs::write(dir.join("loot_tables.yaml"), "{}").expect("write loot tables");
        let catalog = Catalog::load(&dir).expect("catalog loads");
        (catalog, zone_id)
    }

    struct CountingObserver {
        count: AtomicUsize,
    }

    impl TickObserver for CountingObserver {
        fn on_tick(&self, _reports: &BTreeMap<ZoneId, TickReport>) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn scheduler_ticks_instantiated_zones() {
        let (catalog, zone_id) = catalog_with_zone();
        let mut runtime = ZoneRuntime::new();
        runtime.get_or_create_zone(&catalog, zone_id).expect("zone layout exists");
        let world = Arc::new(Mutex::new(runtime));

        let operator = Arc::new(OperatorState::new(20));
        let observer = Arc::new(CountingObserver { count: AtomicUsize::new(0) });

        let scheduler = TickScheduler::spawn(world.clone(), operator.clone(), observer.clone(), 7);
        tokio::time::sleep(Duration::from_millis(80)).await;
        operator.request_stop();
        scheduler.stop().await;

        assert!(observer.count.load(Ordering::SeqCst) >= 1);
        let world = world.lock().await;
        assert!(world.zone(zone_id).expect("zone exists").tick >= 1);
    }

    #[tokio::test]
    async fn scheduler_respects_pause() {
        let world = Arc::new(Mutex::new(ZoneRuntime::new()));
        let operator = Arc::new(OperatorState::new(20));
        operator.pause();
        let observer = Arc::new(CountingObserver { count: AtomicUsize::new(0) });

        let scheduler = TickScheduler::spawn(world, operator.clone(), observer.clone(), 1);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(observer.count.load(Ordering::SeqCst), 0);

        operator.request_stop();
        scheduler.stop().await;
    }
}
