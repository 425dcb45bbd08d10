use super::config::SupplyChainConfig;
use super::gate::{AdmissionGate, FillSignal};
use super::inventory::{Depot, Inventory};
use super::ledger::StockLedger;
use super::open_flag::OpenFlag;
use super::storage_unit::{StorageUnit, UnitSnapshot};
use log::info;
use std::sync::Arc;

/// Everything the supplier, restocker and consumers share.
///
/// Created once before any thread starts and dropped after all of them
/// are joined. The open flag is the only field written after startup.
#[derive(Debug)]
pub struct SupplyContext {
    open: OpenFlag,
    depot: Depot,
    units: Vec<StorageUnit>,
    fill_signal: FillSignal,
    admission: Arc<AdmissionGate>,
    ledger: StockLedger,
    config: SupplyChainConfig,
}

impl SupplyContext {
    /// # Panics
    ///
    /// Panics if the admission pool is empty; call `config.validate()` first.
    pub fn new(config: SupplyChainConfig) -> Self {
        let units = (0..config.unit_count)
            .map(|id| StorageUnit::new(id, config.unit_capacity))
            .collect();
        Self {
            open: OpenFlag::new(),
            depot: Depot::new(),
            units,
            fill_signal: FillSignal::new(),
            admission: AdmissionGate::new(config.consumers.admission_permits),
            ledger: StockLedger::new(),
            config,
        }
    }

    pub fn open_flag(&self) -> &OpenFlag {
        &self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_open()
    }

    pub fn depot(&self) -> &Depot {
        &self.depot
    }

    pub fn units(&self) -> &[StorageUnit] {
        &self.units
    }

    pub fn unit(&self, id: usize) -> Option<&StorageUnit> {
        self.units.get(id)
    }

    pub fn fill_signal(&self) -> &FillSignal {
        &self.fill_signal
    }

    pub fn admission(&self) -> &Arc<AdmissionGate> {
        &self.admission
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    pub fn config(&self) -> &SupplyChainConfig {
        &self.config
    }

    /// Wakes consumers parked on any unit so they re-check their shelf.
    pub fn wake_consumers(&self) {
        for unit in &self.units {
            unit.wake_all();
        }
    }

    /// Flips the open flag and then notifies every condition variable that
    /// may have waiters. Only the first call has any effect.
    pub fn close(&self) -> bool {
        if !self.open.close() {
            return false;
        }
        info!("LOCAL CLOSED!");
        self.depot.wake_all();
        self.wake_consumers();
        self.fill_signal.wake_all();
        self.admission.wake_all();
        true
    }

    pub fn unit_snapshots(&self) -> Vec<UnitSnapshot> {
        self.units.iter().map(StorageUnit::snapshot).collect()
    }
}
