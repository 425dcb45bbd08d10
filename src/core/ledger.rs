use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals of every item movement in the chain
#[derive(Debug, Default)]
pub struct StockLedger {
    produced: AtomicU64,
    produced_spoiled: AtomicU64,
    delivered: AtomicU64,
    withdrawn: AtomicU64,
    placed: AtomicU64,
    dropped: AtomicU64,
    purged: AtomicU64,
    consumed: AtomicU64,
    discarded: AtomicU64,
}

/// Plain copy of the ledger counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Items manufactured by the supplier
    pub produced: u64,
    pub produced_spoiled: u64,
    /// Items handed to the depot
    pub delivered: u64,
    /// Items the restocker pulled out of the depot
    pub withdrawn: u64,
    /// Items stored into a unit
    pub placed: u64,
    /// Items discarded because their unit had no room
    pub dropped: u64,
    /// Spoiled items removed by the restocker's purge
    pub purged: u64,
    /// Good items consumed
    pub consumed: u64,
    /// Spoiled items drawn and thrown away by consumers
    pub discarded: u64,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_produced(&self, count: usize, spoiled: usize) {
        self.produced.fetch_add(count as u64, Ordering::Relaxed);
        self.produced_spoiled.fetch_add(spoiled as u64, Ordering::Relaxed);
    }

    pub fn record_delivered(&self, count: usize) {
        self.delivered.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_withdrawn(&self) {
        self.withdrawn.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_placed(&self) {
        self.placed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_purged(&self, count: usize) {
        self.purged.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_consumed(&self) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discarded(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            produced: self.produced.load(Ordering::Relaxed),
            produced_spoiled: self.produced_spoiled.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            withdrawn: self.withdrawn.load(Ordering::Relaxed),
            placed: self.placed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            purged: self.purged.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_records() {
        let ledger = StockLedger::new();
        ledger.record_produced(7, 2);
        ledger.record_delivered(7);
        ledger.record_withdrawn();
        ledger.record_placed();
        ledger.record_purged(3);
        ledger.record_consumed();
        ledger.record_discarded();

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.produced, 7);
        assert_eq!(snapshot.produced_spoiled, 2);
        assert_eq!(snapshot.delivered, 7);
        assert_eq!(snapshot.withdrawn, 1);
        assert_eq!(snapshot.placed, 1);
        assert_eq!(snapshot.dropped, 0);
        assert_eq!(snapshot.purged, 3);
        assert_eq!(snapshot.consumed, 1);
        assert_eq!(snapshot.discarded, 1);
    }
}
