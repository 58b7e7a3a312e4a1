//! Per-wallet reputation tracking (`spec.md` §4.F `spawn`: "Initialize
//! reputation").
//!
//! The full data model has no per-observer reputation -- only a single
//! scalar per wallet, adjusted by the actions a wallet takes (completing
//! quests, killing other players, defaulting on trades). Kept to that scope
//! rather than the subjective per-observer tracker a full social simulation
//! would need.

use std::collections::BTreeMap;

/// A wallet's reputation score, clamped to `[0.0, 1.0]`. `0.5` is neutral.
pub const DEFAULT_REPUTATION: f64 = 0.5;

/// Reputation scores for every wallet with a recorded character.
#[derive(Debug, Clone, Default)]
pub struct ReputationStore {
    scores: BTreeMap<String, f64>,
}

impl ReputationStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { scores: BTreeMap::new() }
    }

    /// Initialize `wallet`'s reputation to [`DEFAULT_REPUTATION`] if it has
    /// no existing score. A no-op if the wallet is already tracked.
    pub fn init(&mut self, wallet: &str) {
        self.scores.entry(wallet.to_owned()).or_insert(DEFAULT_REPUTATION);
    }

    /// Current reputation for `wallet`, or [`DEFAULT_REPUTATION`] if untracked.
    #[must_use]
    pub fn get(&self, wallet: &str) -> f64 {
        self.scores.get(wallet).copied().unwrap_or(DEFAULT_REPUTATION)
    }

    /// Apply a signed `delta` to `wallet`'s reputation, clamping the result
    /// to `[0.0, 1.0]`. Initializes the wallet first if untracked.
    pub fn adjust(&mut self, wallet: &str, delta: f64) {
        let current = self.get(wallet);
        self.scores.insert(wallet.to_owned(), (current + delta).clamp(0.0, 1.0));
    }
}

/// Reputation delta for completing a quest.
pub const QUEST_COMPLETE_DELTA: f64 = 0.02;

/// Reputation delta for killing another player.
pub const PLAYER_KILL_DELTA: f64 = -0.05;

/// Reputation delta for defaulting on an accepted trade.
pub const TRADE_DEFAULT_DELTA: f64 = -0.1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked_wallet_reads_default() {
        let store = ReputationStore::new();
        assert_eq!(store.get("0xabc"), DEFAULT_REPUTATION);
    }

    #[test]
    fn adjust_clamps_to_unit_interval() {
        let mut store = ReputationStore::new();
        store.init("0xabc");
        for _ in 0..50 {
            store.adjust("0xabc", -0.1);
        }
        assert_eq!(store.get("0xabc"), 0.0);
        for _ in 0..50 {
            store.adjust("0xabc", 0.5);
        }
        assert_eq!(store.get("0xabc"), 1.0);
    }

    #[test]
    fn init_is_idempotent() {
        let mut store = ReputationStore::new();
        store.init("0xabc");
        store.adjust("0xabc", 0.1);
        store.init("0xabc");
        assert_eq!(store.get("0xabc"), 0.6);
    }
}
