use crate::core::context::SupplyContext;
use crate::core::inventory::{Inventory, Placement, Withdrawal};
use crate::core::storage_unit::StorageUnit;
use crate::core::types::{Batch, ItemKind};
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Kinds in the order the restocker tops them up
const RESTOCK_ORDER: [ItemKind; 2] = [ItemKind::Bottle, ItemKind::Can];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestockerReport {
    /// Steady-state passes over all units
    pub passes: u64,
    /// Items still carried when the run closed
    pub surplus_left: usize,
}

/// Moves stock from the depot into the storage units.
///
/// Fills every unit once before consumers are let in, then keeps patrolling:
/// purge spoiled items, top off whatever is missing, wake the consumers.
pub struct Restocker {
    ctx: Arc<SupplyContext>,
    surplus: Batch,
    interval: Duration,
}

impl Restocker {
    pub fn new(ctx: Arc<SupplyContext>) -> Self {
        let interval = ctx.config().restocker_interval();
        Self {
            ctx,
            surplus: Batch::new(),
            interval,
        }
    }

    pub fn surplus_len(&self) -> usize {
        self.surplus.len()
    }

    /// Plugs in and fills each unit in turn, then releases the consumers.
    pub fn initial_fill(&mut self) {
        let ctx = Arc::clone(&self.ctx);
        for unit in ctx.units() {
            unit.plug_in();
            self.fill_unit(unit);
            unit.enable_fast_cooling();
        }
        ctx.fill_signal().mark_filled();
    }

    /// One steady-state pass over every unit. Returns false if the run
    /// closed part way through.
    pub fn patrol(&mut self) -> bool {
        let ctx = Arc::clone(&self.ctx);
        for unit in ctx.units() {
            if !ctx.is_open() {
                return false;
            }
            self.purge(unit);
            if !unit.is_full() {
                self.fill_unit(unit);
            }
        }
        ctx.wake_consumers();
        true
    }

    fn purge(&self, unit: &StorageUnit) -> usize {
        let removed = unit.purge_spoiled();
        if removed > 0 {
            self.ctx.ledger().record_purged(removed);
            info!(
                "RESTOCKER > Removed {} spoiled cans from unit[{}]",
                removed,
                unit.id()
            );
        }
        removed
    }

    /// Tops off every kind of `unit`. A kind the run closed on is skipped,
    /// the remaining kinds are still attempted. Returns true if the unit
    /// ended up full.
    pub fn fill_unit(&mut self, unit: &StorageUnit) -> bool {
        let mut complete = true;
        for kind in RESTOCK_ORDER {
            if !self.replenish(unit, kind) {
                debug!("RESTOCKER > Gave up on {} for unit[{}]", kind.plural(), unit.id());
                complete = false;
            }
        }
        if complete {
            info!("RESTOCKER > Unit[{}] is full", unit.id());
        } else {
            debug!("RESTOCKER > Left unit[{}] partially filled", unit.id());
        }
        complete
    }

    /// Places items of `kind` until the unit has no room left for it, using
    /// the carried surplus first and the depot after that. Returns false if
    /// the run closed while the depot was out of `kind`.
    pub fn replenish(&mut self, unit: &StorageUnit, kind: ItemKind) -> bool {
        while unit.has_space_for(kind) {
            match self.surplus.take_kind(kind) {
                Some(item) => match unit.place(item) {
                    Placement::Stored => self.ctx.ledger().record_placed(),
                    Placement::Dropped => {
                        self.ctx.ledger().record_dropped();
                        warn!("RESTOCKER > Unit[{}] had no room for a {}", unit.id(), kind);
                    }
                },
                None => {
                    if !self.fetch(kind, unit.space_for(kind)) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Pulls `wanted` items of `kind` from the depot into the surplus, one
    /// blocking withdrawal at a time.
    fn fetch(&mut self, kind: ItemKind, wanted: usize) -> bool {
        for _ in 0..wanted {
            match self.ctx.depot().withdraw(kind, self.ctx.open_flag()) {
                Withdrawal::Taken(item) => {
                    self.ctx.ledger().record_withdrawn();
                    self.surplus.push(item);
                }
                Withdrawal::Closed => return false,
            }
        }
        true
    }

    pub fn run(mut self) -> RestockerReport {
        let mut report = RestockerReport::default();
        self.initial_fill();
        while self.ctx.is_open() {
            if self.patrol() {
                report.passes += 1;
            }
            thread::sleep(self.interval);
        }
        report.surplus_left = self.surplus_len();
        report
    }
}
