use super::open_flag::OpenFlag;
use super::types::{Batch, Item, ItemKind};
use log::{debug, info};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Result of a blocking withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Withdrawal {
    Taken(Item),
    /// The run closed while the requested kind was out of stock.
    Closed,
}

impl Withdrawal {
    pub fn into_item(self) -> Option<Item> {
        match self {
            Withdrawal::Taken(item) => Some(item),
            Withdrawal::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Withdrawal::Closed)
    }
}

/// Result of a single-item insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Stored,
    /// No room for the item's kind; the item was discarded.
    Dropped,
}

/// Behaviour shared by the depot and the storage units
pub trait Inventory {
    fn insert(&self, item: Item) -> Placement;

    /// Removes one item of `kind`, blocking while none is present and the
    /// run is still open.
    fn withdraw(&self, kind: ItemKind, open: &OpenFlag) -> Withdrawal;

    fn count(&self, kind: ItemKind) -> usize;

    fn total(&self) -> usize;

    /// Wakes every thread blocked in `withdraw` so it re-checks its condition.
    fn wake_all(&self);
}

/// Per-kind contents of a container. Only reachable through a `Stockpile` lock.
#[derive(Debug, Default)]
pub struct Shelves {
    by_kind: [Vec<Item>; 2],
}

impl Shelves {
    pub fn count(&self, kind: ItemKind) -> usize {
        self.by_kind[kind.index()].len()
    }

    pub fn total(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }

    pub fn push(&mut self, item: Item) {
        self.by_kind[item.kind().index()].push(item);
    }

    pub fn pop(&mut self, kind: ItemKind) -> Option<Item> {
        self.by_kind[kind.index()].pop()
    }

    pub fn spoiled(&self) -> usize {
        self.iter().filter(|item| item.is_spoiled()).count()
    }

    /// Keeps only the non-spoiled items, returning how many were removed.
    pub fn retain_fresh(&mut self) -> usize {
        let before = self.total();
        for items in self.by_kind.iter_mut() {
            items.retain(|item| !item.is_spoiled());
        }
        before - self.total()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.by_kind.iter().flat_map(|items| items.iter())
    }
}

/// Mutex + condition variable pair guarding one container's shelves.
#[derive(Debug, Default)]
pub struct Stockpile {
    shelves: Mutex<Shelves>,
    restocked: Condvar,
}

impl Stockpile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A panicking holder cannot leave `Shelves` half-updated, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Shelves> {
        self.shelves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes one item of `kind`, waiting on the condition variable while the
    /// shelf is empty and the run is open. `on_empty` runs before every wait.
    pub fn take_blocking(
        &self,
        kind: ItemKind,
        open: &OpenFlag,
        mut on_empty: impl FnMut(),
    ) -> Withdrawal {
        let mut shelves = self.lock();
        loop {
            if let Some(item) = shelves.pop(kind) {
                return Withdrawal::Taken(item);
            }
            if !open.is_open() {
                return Withdrawal::Closed;
            }
            on_empty();
            shelves = self
                .restocked
                .wait(shelves)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Notifies every waiter while holding the lock, so a waiter that has
    /// checked its condition but not yet parked cannot miss the wake.
    pub fn notify_all(&self) {
        let _shelves = self.lock();
        self.restocked.notify_all();
    }

    pub(crate) fn condvar(&self) -> &Condvar {
        &self.restocked
    }
}

/// Unbounded shared depot between the supplier and the restocker
#[derive(Debug, Default)]
pub struct Depot {
    stock: Stockpile,
}

impl Depot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves every item of `batch` into the depot and wakes one waiter.
    /// Returns the number of items delivered.
    pub fn deposit(&self, batch: &mut Batch) -> usize {
        let mut shelves = self.stock.lock();
        let delivered = batch.len();
        for item in batch.drain() {
            shelves.push(item);
        }
        self.stock.condvar().notify_one();
        debug!(
            "Depot now holds {} cans and {} bottles",
            shelves.count(ItemKind::Can),
            shelves.count(ItemKind::Bottle)
        );
        delivered
    }
}

impl Inventory for Depot {
    fn insert(&self, item: Item) -> Placement {
        let mut shelves = self.stock.lock();
        shelves.push(item);
        self.stock.condvar().notify_one();
        Placement::Stored
    }

    fn withdraw(&self, kind: ItemKind, open: &OpenFlag) -> Withdrawal {
        self.stock.take_blocking(kind, open, || {
            info!(
                "RESTOCKER > No {} in the depot to restock with, waiting for supplier...",
                kind.plural()
            );
        })
    }

    fn count(&self, kind: ItemKind) -> usize {
        self.stock.lock().count(kind)
    }

    fn total(&self) -> usize {
        self.stock.lock().total()
    }

    fn wake_all(&self) {
        self.stock.notify_all();
    }
}
