//! `MerchantLoop`: one background Tokio task per merchant entity, running
//! the four phases on their own independent intervals (§4.I).
//!
//! Grounded in the teacher's `spawn_observer` convention (`tokio::spawn`
//! wrapping a fallible async body, logging and returning rather than
//! propagating into the caller) applied once per merchant rather than
//! once globally.

use std::sync::Arc;
use std::time::Duration;

use shard_chain::ChainDriver;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::phases::{self, Announcement};
use crate::state::MerchantState;

const INVENTORY_SYNC_INTERVAL: Duration = Duration::from_secs(60);
const PRICE_UPDATE_INTERVAL: Duration = Duration::from_secs(30);
const RESTOCK_INTERVAL: Duration = Duration::from_secs(120);
const ANNOUNCEMENT_INTERVAL: Duration = Duration::from_secs(300);

/// Sent to the caller so the zone event channel can broadcast merchant
/// activity without this crate depending on the event type itself.
#[derive(Debug, Clone)]
pub enum MerchantLoopEvent {
    /// A price update completed for this item.
    PriceUpdated { token_id: shard_types::ItemTokenId, price: u64 },
    /// A restock minted units of this item.
    Restocked { token_id: shard_types::ItemTokenId, quantity: u32 },
    /// The periodic announcement phase produced this.
    Announced(Announcement),
}

/// A running merchant's phase scheduler.
pub struct MerchantLoop {
    handle: JoinHandle<()>,
    stop: mpsc::Sender<()>,
}

impl MerchantLoop {
    /// Spawn the four phases as one background task driving
    /// `state` (shared with whatever reads current prices for `buy`/`sell`
    /// handling), emitting [`MerchantLoopEvent`]s on `events`.
    pub fn spawn(
        state: Arc<Mutex<MerchantState>>,
        chain: Arc<ChainDriver>,
        events: mpsc::Sender<MerchantLoopEvent>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            let mut sync_tick = interval(INVENTORY_SYNC_INTERVAL);
            let mut price_tick = interval(PRICE_UPDATE_INTERVAL);
            let mut restock_tick = interval(RESTOCK_INTERVAL);
            let mut announce_tick = interval(ANNOUNCEMENT_INTERVAL);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        tracing::info!("merchant loop stopping");
                        break;
                    }
                    _ = sync_tick.tick() => {
                        let mut guard = state.lock().await;
                        if let Err(error) = phases::sync_inventory(&mut guard, &chain).await {
                            tracing::warn!(%error, "merchant inventory sync failed");
                        }
                    }
                    _ = price_tick.tick() => {
                        let mut guard = state.lock().await;
                        let updates: Vec<_> = guard
                            .stock
                            .values()
                            .map(|s| (s.token_id, phases::update_price(s)))
                            .collect();
                        for (token_id, price) in updates {
                            if let Ok(stock) = guard.stock_mut(token_id) {
                                stock.current_price = price;
                            }
                            let _ = events.send(MerchantLoopEvent::PriceUpdated { token_id, price }).await;
                        }
                    }
                    _ = restock_tick.tick() => {
                        let mut guard = state.lock().await;
                        let due: Vec<_> = guard
                            .stock
                            .values()
                            .filter_map(|s| {
                                let amount = phases::restock_amount(s);
                                (amount > 0).then_some((s.token_id, amount))
                            })
                            .collect();
                        for (token_id, amount) in due {
                            match chain.mint_item(&guard.wallet_address, token_id, u64::from(amount)).await {
                                Ok(_) => {
                                    if let Ok(stock) = guard.stock_mut(token_id) {
                                        stock.quantity = stock.quantity.saturating_add(amount);
                                    }
                                    let _ = events.send(MerchantLoopEvent::Restocked { token_id, quantity: amount }).await;
                                }
                                Err(error) => tracing::warn!(%error, %token_id, "merchant restock mint failed"),
                            }
                        }
                    }
                    _ = announce_tick.tick() => {
                        let guard = state.lock().await;
                        let announcement = phases::announce(&guard);
                        let _ = events.send(MerchantLoopEvent::Announced(announcement)).await;
                    }
                }
            }
        });

        Self { handle, stop: stop_tx }
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.stop.send(()).await;
        let _ = self.handle.await;
    }
}
