use super::inventory::{Inventory, Placement, Stockpile, Withdrawal};
use super::open_flag::OpenFlag;
use super::types::{Item, ItemKind};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-kind capacity of a storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub cans: usize,
    pub bottles: usize,
}

impl Capacity {
    pub fn new(cans: usize, bottles: usize) -> Self {
        Self { cans, bottles }
    }

    pub fn of(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::Can => self.cans,
            ItemKind::Bottle => self.bottles,
        }
    }

    pub fn total(&self) -> usize {
        self.cans + self.bottles
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            cans: 15,
            bottles: 10,
        }
    }
}

/// Point-in-time view of a unit, taken under its lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSnapshot {
    pub id: usize,
    pub cans: usize,
    pub bottles: usize,
    pub spoiled: usize,
    pub capacity: Capacity,
    pub plugged: bool,
    pub fast_cooled: bool,
}

/// Capacity-bounded inventory consumers draw from directly.
///
/// For every kind `count(kind) <= capacity.of(kind)` holds at all times:
/// insertion is checked under the same lock that guards removal.
#[derive(Debug)]
pub struct StorageUnit {
    id: usize,
    capacity: Capacity,
    stock: Stockpile,
    plugged: AtomicBool,
    fast_cooled: AtomicBool,
}

impl StorageUnit {
    pub fn new(id: usize, capacity: Capacity) -> Self {
        Self {
            id,
            capacity,
            stock: Stockpile::new(),
            plugged: AtomicBool::new(false),
            fast_cooled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Inserts `item` only if its kind still has room; otherwise it is dropped.
    pub fn place(&self, item: Item) -> Placement {
        let mut shelves = self.stock.lock();
        let kind = item.kind();
        if shelves.count(kind) < self.capacity.of(kind) {
            shelves.push(item);
            Placement::Stored
        } else {
            debug!("Unit[{}] has no room for another {}, dropping it", self.id, kind);
            Placement::Dropped
        }
    }

    pub fn space_for(&self, kind: ItemKind) -> usize {
        self.capacity.of(kind).saturating_sub(self.stock.lock().count(kind))
    }

    pub fn has_space_for(&self, kind: ItemKind) -> bool {
        self.space_for(kind) > 0
    }

    pub fn is_full(&self) -> bool {
        self.stock.lock().total() == self.capacity.total()
    }

    /// Replaces the contents with their non-spoiled subset in one critical
    /// section. Returns the number of items removed.
    pub fn purge_spoiled(&self) -> usize {
        self.stock.lock().retain_fresh()
    }

    pub fn plug_in(&self) {
        self.plugged.store(true, Ordering::SeqCst);
    }

    pub fn is_plugged(&self) -> bool {
        self.plugged.load(Ordering::SeqCst)
    }

    pub fn enable_fast_cooling(&self) {
        self.fast_cooled.store(true, Ordering::SeqCst);
    }

    pub fn is_fast_cooled(&self) -> bool {
        self.fast_cooled.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> UnitSnapshot {
        let shelves = self.stock.lock();
        UnitSnapshot {
            id: self.id,
            cans: shelves.count(ItemKind::Can),
            bottles: shelves.count(ItemKind::Bottle),
            spoiled: shelves.spoiled(),
            capacity: self.capacity,
            plugged: self.is_plugged(),
            fast_cooled: self.is_fast_cooled(),
        }
    }
}

impl Inventory for StorageUnit {
    fn insert(&self, item: Item) -> Placement {
        self.place(item)
    }

    fn withdraw(&self, kind: ItemKind, open: &OpenFlag) -> Withdrawal {
        let id = self.id;
        self.stock.take_blocking(kind, open, || {
            info!(
                "No {} left in unit[{}], waiting for the restocker...",
                kind.plural(),
                id
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_place_respects_capacity() {
        let unit = StorageUnit::new(0, Capacity::new(2, 1));

        assert_eq!(unit.place(Item::fresh(ItemKind::Can)), Placement::Stored);
        assert_eq!(unit.place(Item::fresh(ItemKind::Can)), Placement::Stored);
        assert_eq!(unit.place(Item::fresh(ItemKind::Can)), Placement::Dropped);
        assert_eq!(unit.count(ItemKind::Can), 2);
        assert!(!unit.is_full());

        assert_eq!(unit.space_for(ItemKind::Bottle), 1);
        assert_eq!(unit.insert(Item::fresh(ItemKind::Bottle)), Placement::Stored);
        assert_eq!(unit.insert(Item::fresh(ItemKind::Bottle)), Placement::Dropped);
        assert!(unit.is_full());
        assert!(!unit.has_space_for(ItemKind::Bottle));
    }

    #[test]
    fn test_purge_spoiled_keeps_fresh_items() {
        let unit = StorageUnit::new(3, Capacity::new(4, 1));
        unit.place(Item::spoiled(ItemKind::Can));
        unit.place(Item::fresh(ItemKind::Can));
        unit.place(Item::spoiled(ItemKind::Can));
        unit.place(Item::fresh(ItemKind::Bottle));

        assert_eq!(unit.purge_spoiled(), 2);
        let snapshot = unit.snapshot();
        assert_eq!(snapshot.cans, 1);
        assert_eq!(snapshot.bottles, 1);
        assert_eq!(snapshot.spoiled, 0);
        assert_eq!(unit.purge_spoiled(), 0);
    }

    #[test]
    fn test_flags_start_cleared() {
        let unit = StorageUnit::new(1, Capacity::default());
        assert!(!unit.is_plugged());
        assert!(!unit.is_fast_cooled());
        unit.plug_in();
        unit.enable_fast_cooling();
        let snapshot = unit.snapshot();
        assert!(snapshot.plugged && snapshot.fast_cooled);
        assert_eq!(snapshot.capacity.total(), 25);
    }

    #[test]
    fn test_waiter_on_empty_unit_exits_on_close() {
        let unit = Arc::new(StorageUnit::new(0, Capacity::new(1, 1)));
        let open = Arc::new(OpenFlag::new());

        let waiter = {
            let unit = Arc::clone(&unit);
            let open = Arc::clone(&open);
            thread::spawn(move || unit.withdraw(ItemKind::Bottle, &open))
        };

        thread::sleep(Duration::from_millis(50));
        open.close();
        unit.wake_all();

        assert!(waiter.join().unwrap().is_closed());
    }

    #[test]
    fn test_waiter_on_empty_unit_wakes_after_refill() {
        let unit = Arc::new(StorageUnit::new(0, Capacity::new(1, 1)));
        let open = Arc::new(OpenFlag::new());

        let waiter = {
            let unit = Arc::clone(&unit);
            let open = Arc::clone(&open);
            thread::spawn(move || unit.withdraw(ItemKind::Can, &open))
        };

        thread::sleep(Duration::from_millis(50));
        unit.place(Item::fresh(ItemKind::Can));
        unit.wake_all();

        let item = waiter.join().unwrap().into_item().unwrap();
        assert_eq!(item.kind(), ItemKind::Can);
        assert_eq!(unit.total(), 0);
    }
}
