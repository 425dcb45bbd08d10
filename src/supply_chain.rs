use crate::agents::{Consumer, ConsumerOutcome, ConsumerReport, Restocker, RestockerReport, Supplier, SupplierReport};
use crate::core::config::SupplyChainConfig;
use crate::core::context::SupplyContext;
use crate::core::errors::{SimError, SimResult};
use crate::core::inventory::Inventory;
use crate::core::ledger::LedgerSnapshot;
use crate::core::storage_unit::UnitSnapshot;
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Final state of a run, gathered after every thread has been joined
#[derive(Debug, Clone, Serialize)]
pub struct SupplyChainReport {
    pub supplier: SupplierReport,
    pub restocker: RestockerReport,
    pub consumers: Vec<ConsumerReport>,
    pub ledger: LedgerSnapshot,
    pub units: Vec<UnitSnapshot>,
    pub depot_remaining: usize,
}

impl SupplyChainReport {
    pub fn completed_consumers(&self) -> usize {
        self.consumers
            .iter()
            .filter(|c| c.outcome == ConsumerOutcome::Completed)
            .count()
    }

    fn units_remaining(&self) -> u64 {
        self.units.iter().map(|u| (u.cans + u.bottles) as u64).sum()
    }

    /// Checks that every item is accounted for at each hop of the chain.
    pub fn is_conserved(&self) -> bool {
        let l = &self.ledger;
        l.produced == l.delivered
            && l.delivered == self.depot_remaining as u64 + l.withdrawn
            && l.withdrawn == l.placed + l.dropped + self.restocker.surplus_left as u64
            && l.placed == self.units_remaining() + l.purged + l.consumed + l.discarded
    }
}

/// Threads of a launched chain
pub struct RunningSupplyChain {
    ctx: Arc<SupplyContext>,
    supplier: JoinHandle<SupplierReport>,
    restocker: JoinHandle<RestockerReport>,
    consumers: Vec<(String, JoinHandle<ConsumerReport>)>,
}

impl RunningSupplyChain {
    pub fn context(&self) -> &Arc<SupplyContext> {
        &self.ctx
    }

    pub fn close(&self) -> bool {
        self.ctx.close()
    }

    /// Closes the run (if still open) and waits for every thread to finish.
    pub fn join(self) -> SimResult<SupplyChainReport> {
        self.ctx.close();

        let supplier = join_named(self.supplier, "supplier")?;
        let restocker = join_named(self.restocker, "restocker")?;
        let mut consumers = Vec::with_capacity(self.consumers.len());
        for (name, handle) in self.consumers {
            consumers.push(join_named(handle, &name)?);
        }
        debug!("All supply chain threads joined");

        Ok(SupplyChainReport {
            supplier,
            restocker,
            consumers,
            ledger: self.ctx.ledger().snapshot(),
            units: self.ctx.unit_snapshots(),
            depot_remaining: self.ctx.depot().total(),
        })
    }
}

fn join_named<T>(handle: JoinHandle<T>, name: &str) -> SimResult<T> {
    handle
        .join()
        .map_err(|_| SimError::ThreadPanicked(name.to_string()))
}

fn spawn_named<T, F>(name: String, ctx: &SupplyContext, body: F) -> SimResult<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|_| {
            // Threads already started must not stay parked forever
            ctx.close();
            SimError::ThreadSpawn(name)
        })
}

/// Entry point that wires the supplier, restocker and consumers together.
pub struct SupplyChain;

impl SupplyChain {
    /// Opens the local and starts every thread.
    pub fn launch(config: SupplyChainConfig) -> SimResult<RunningSupplyChain> {
        config.validate()?;
        let ctx = Arc::new(SupplyContext::new(config));
        let config = ctx.config().clone();

        info!("LOCAL OPEN!");

        let supplier = Supplier::new(Arc::clone(&ctx), config.rng_for(0))?;
        let supplier = spawn_named("supplier".to_string(), &ctx, move || supplier.run())?;

        let restocker = Restocker::new(Arc::clone(&ctx));
        let restocker = spawn_named("restocker".to_string(), &ctx, move || restocker.run())?;

        let mut consumers = Vec::with_capacity(config.consumers.count);
        for id in 0..config.consumers.count {
            let consumer = Consumer::random(id, Arc::clone(&ctx), config.rng_for(id as u64 + 1));
            debug!(
                "Consumer[{}] wants {} items, preference: {}",
                id,
                consumer.limit(),
                consumer.preference()
            );
            let name = format!("consumer-{}", id);
            let handle = spawn_named(name.clone(), &ctx, move || consumer.run())?;
            consumers.push((name, handle));
        }

        Ok(RunningSupplyChain {
            ctx,
            supplier,
            restocker,
            consumers,
        })
    }

    /// Runs the chain for the configured duration, then closes and joins it.
    pub fn run(config: SupplyChainConfig) -> SimResult<SupplyChainReport> {
        let duration = config.run_duration();
        let running = Self::launch(config)?;
        thread::sleep(duration);
        running.join()
    }
}
