use crate::core::context::SupplyContext;
use crate::core::errors::SimError;
use crate::core::types::{Batch, Item, ItemKind};
use log::info;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Distribution, Uniform};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupplierReport {
    pub batches: u64,
    pub items: u64,
}

/// Producer loop: manufactures a random batch, hands it to the depot, sleeps.
pub struct Supplier {
    ctx: Arc<SupplyContext>,
    rng: StdRng,
    batch: Batch,
    batch_size: Uniform<u32>,
    can_coin: Bernoulli,
    spoil_coin: Bernoulli,
    interval: Duration,
}

impl Supplier {
    pub fn new(ctx: Arc<SupplyContext>, rng: StdRng) -> Result<Self, SimError> {
        let production = ctx.config().production.clone();
        let can_coin = Bernoulli::new(production.can_ratio)
            .map_err(|e| SimError::InvalidConfig(format!("can ratio: {}", e)))?;
        let spoil_coin = Bernoulli::new(production.can_spoil_probability)
            .map_err(|e| SimError::InvalidConfig(format!("spoil probability: {}", e)))?;
        let interval = ctx.config().supplier_interval();

        Ok(Self {
            ctx,
            rng,
            batch: Batch::new(),
            batch_size: Uniform::new_inclusive(production.min_batch_size, production.max_batch_size),
            can_coin,
            spoil_coin,
            interval,
        })
    }

    /// Fills the private batch with a random number of items. Returns the count.
    pub fn produce_batch(&mut self) -> usize {
        let count = self.batch_size.sample(&mut self.rng);
        for _ in 0..count {
            let kind = if self.can_coin.sample(&mut self.rng) {
                ItemKind::Can
            } else {
                ItemKind::Bottle
            };
            let spoiled = kind.can_spoil() && self.spoil_coin.sample(&mut self.rng);
            self.batch.push(Item::new(kind, spoiled));
        }
        self.ctx
            .ledger()
            .record_produced(count as usize, self.batch.spoiled_count());
        count as usize
    }

    /// Hands the whole batch over to the depot in one critical section.
    pub fn deliver(&mut self) -> usize {
        let delivered = self.ctx.depot().deposit(&mut self.batch);
        self.ctx.ledger().record_delivered(delivered);
        info!("SUPPLIER > Delivered a batch of {} items", delivered);
        delivered
    }

    pub fn run(mut self) -> SupplierReport {
        let mut report = SupplierReport::default();
        while self.ctx.is_open() {
            self.produce_batch();
            report.items += self.deliver() as u64;
            report.batches += 1;
            thread::sleep(self.interval);
        }
        report
    }
}
