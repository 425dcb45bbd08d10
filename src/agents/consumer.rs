use crate::core::context::SupplyContext;
use crate::core::inventory::{Inventory, Withdrawal};
use crate::core::storage_unit::StorageUnit;
use crate::core::types::{Item, ItemKind, Preference};
use log::info;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConsumerOutcome {
    /// Reached its personal limit
    Completed,
    /// The run closed first
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    pub id: usize,
    pub preference: Preference,
    pub limit: u32,
    pub consumed: u32,
    pub spoiled_discarded: u32,
    pub outcome: ConsumerOutcome,
}

/// A drinker: repeatedly picks a random unit and takes one item it likes.
pub struct Consumer {
    id: usize,
    preference: Preference,
    limit: u32,
    consumed: u32,
    spoiled_discarded: u32,
    ctx: Arc<SupplyContext>,
    rng: StdRng,
    interval: Duration,
}

impl Consumer {
    pub fn new(
        id: usize,
        preference: Preference,
        limit: u32,
        ctx: Arc<SupplyContext>,
        rng: StdRng,
    ) -> Self {
        let interval = ctx.config().consumer_interval();
        Self {
            id,
            preference,
            limit,
            consumed: 0,
            spoiled_discarded: 0,
            ctx,
            rng,
            interval,
        }
    }

    /// Draws the limit and the preference from `rng`; bottles, cans and
    /// "either" are equally likely.
    pub fn random(id: usize, ctx: Arc<SupplyContext>, mut rng: StdRng) -> Self {
        let consumers = &ctx.config().consumers;
        let limit = rng.gen_range(consumers.min_limit..=consumers.max_limit);
        let preference = match rng.gen_range(0..3) {
            0 => Preference::Only(ItemKind::Bottle),
            1 => Preference::Only(ItemKind::Can),
            _ => Preference::Either,
        };
        Self::new(id, preference, limit, ctx, rng)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn preference(&self) -> Preference {
        self.preference
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    fn choose_kind(&mut self) -> ItemKind {
        match self.preference {
            Preference::Only(kind) => kind,
            Preference::Either => {
                if self.rng.gen_bool(0.5) {
                    ItemKind::Can
                } else {
                    ItemKind::Bottle
                }
            }
        }
    }

    fn choose_unit(&mut self) -> usize {
        self.rng.gen_range(0..self.ctx.units().len())
    }

    /// Takes items from `unit` until a good one turns up. Spoiled draws are
    /// thrown away and retried at once. Returns `None` if the run closed
    /// while the unit was out of the wanted kind.
    fn drink_from(&mut self, unit: &StorageUnit) -> Option<Item> {
        loop {
            let kind = self.choose_kind();
            match unit.withdraw(kind, self.ctx.open_flag()) {
                Withdrawal::Closed => return None,
                Withdrawal::Taken(item) if item.is_spoiled() => {
                    self.spoiled_discarded += 1;
                    self.ctx.ledger().record_discarded();
                    info!(
                        "CONSUMER[{}] > Got a spoiled {} from unit[{}], grabbing another...",
                        self.id,
                        item.kind(),
                        unit.id()
                    );
                }
                Withdrawal::Taken(item) => {
                    self.ctx.ledger().record_consumed();
                    return Some(item);
                }
            }
        }
    }

    fn report(&self) -> ConsumerReport {
        ConsumerReport {
            id: self.id,
            preference: self.preference,
            limit: self.limit,
            consumed: self.consumed,
            spoiled_discarded: self.spoiled_discarded,
            outcome: if self.consumed >= self.limit {
                ConsumerOutcome::Completed
            } else {
                ConsumerOutcome::Closed
            },
        }
    }

    pub fn run(mut self) -> ConsumerReport {
        let ctx = Arc::clone(&self.ctx);
        if !ctx.fill_signal().wait(ctx.open_flag()) {
            return self.report();
        }
        let _permit = match ctx.admission().acquire(ctx.open_flag()) {
            Some(permit) => permit,
            None => return self.report(),
        };

        while self.consumed < self.limit && ctx.is_open() {
            let unit = &ctx.units()[self.choose_unit()];
            let item = match self.drink_from(unit) {
                Some(item) => item,
                None => break,
            };

            self.consumed += 1;
            info!(
                "CONSUMER[{}] > Drank a {}, {} down out of {}...",
                self.id,
                item.kind(),
                self.consumed,
                self.limit
            );
            if self.consumed == self.limit {
                info!("CONSUMER[{}] > Can't drink any more, going to sleep...", self.id);
                break;
            }
            thread::sleep(self.interval);
        }

        self.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SupplyChainConfig;
    use crate::core::storage_unit::Capacity;
    use rand::SeedableRng;
    use std::time::Instant;

    fn context(capacity: Capacity) -> Arc<SupplyContext> {
        Arc::new(SupplyContext::new(
            SupplyChainConfig::new()
                .with_units(1, capacity)
                .with_intervals(1, 1, 1),
        ))
    }

    fn consumer(ctx: &Arc<SupplyContext>, preference: Preference, limit: u32) -> Consumer {
        Consumer::new(0, preference, limit, Arc::clone(ctx), StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_spoiled_draw_is_retried_without_counting() {
        let ctx = context(Capacity::new(2, 0));
        let unit = &ctx.units()[0];
        unit.place(Item::fresh(ItemKind::Can));
        // The most recently placed can comes out first
        unit.place(Item::spoiled(ItemKind::Can));

        let mut drinker = consumer(&ctx, Preference::Only(ItemKind::Can), 3);
        let item = drinker.drink_from(unit).unwrap();

        assert!(!item.is_spoiled());
        assert_eq!(drinker.spoiled_discarded, 1);
        assert_eq!(drinker.consumed(), 0);
        assert_eq!(unit.total(), 0);
        let ledger = ctx.ledger().snapshot();
        assert_eq!((ledger.consumed, ledger.discarded), (1, 1));
    }

    #[test]
    fn test_run_stops_at_limit() {
        let ctx = context(Capacity::new(5, 0));
        for _ in 0..5 {
            ctx.units()[0].place(Item::fresh(ItemKind::Can));
        }
        ctx.fill_signal().mark_filled();

        let report = consumer(&ctx, Preference::Only(ItemKind::Can), 2).run();
        assert_eq!(report.consumed, 2);
        assert_eq!(report.outcome, ConsumerOutcome::Completed);
        assert_eq!(ctx.units()[0].count(ItemKind::Can), 3);
        assert_eq!(ctx.admission().available(), ctx.admission().total());
    }

    #[test]
    fn test_spoiled_retry_does_not_wait_out_the_interval() {
        let ctx = Arc::new(SupplyContext::new(
            SupplyChainConfig::new()
                .with_units(1, Capacity::new(2, 0))
                .with_intervals(1, 1, 5000),
        ));
        let unit = &ctx.units()[0];
        unit.place(Item::fresh(ItemKind::Can));
        unit.place(Item::spoiled(ItemKind::Can));
        ctx.fill_signal().mark_filled();

        let started = Instant::now();
        let report = consumer(&ctx, Preference::Only(ItemKind::Can), 1).run();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(report.spoiled_discarded, 1);
        assert_eq!(report.consumed, 1);
        assert_eq!(report.outcome, ConsumerOutcome::Completed);
    }

    #[test]
    fn test_either_preference_takes_any_kind() {
        let ctx = context(Capacity::new(2, 2));
        let unit = &ctx.units()[0];
        for _ in 0..2 {
            unit.place(Item::fresh(ItemKind::Can));
            unit.place(Item::fresh(ItemKind::Bottle));
        }
        ctx.fill_signal().mark_filled();

        let report = consumer(&ctx, Preference::Either, 2).run();
        assert_eq!(report.consumed, 2);
        assert_eq!(unit.total(), 2);
    }

    #[test]
    fn test_close_while_blocked_ends_without_counting() {
        let ctx = context(Capacity::new(1, 1));
        ctx.fill_signal().mark_filled();
        let drinker = consumer(&ctx, Preference::Only(ItemKind::Bottle), 4);
        let handle = thread::spawn(move || drinker.run());

        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        let closed_at = Instant::now();
        ctx.close();

        let report = handle.join().unwrap();
        assert!(closed_at.elapsed() < Duration::from_secs(1));
        assert_eq!(report.consumed, 0);
        assert_eq!(report.outcome, ConsumerOutcome::Closed);
    }

    #[test]
    fn test_waits_for_initial_fill() {
        let ctx = context(Capacity::new(1, 0));
        ctx.units()[0].place(Item::fresh(ItemKind::Can));
        let drinker = consumer(&ctx, Preference::Only(ItemKind::Can), 1);
        let handle = thread::spawn(move || drinker.run());

        thread::sleep(Duration::from_millis(50));
        assert_eq!(ctx.units()[0].total(), 1);
        ctx.fill_signal().mark_filled();

        let report = handle.join().unwrap();
        assert_eq!(report.outcome, ConsumerOutcome::Completed);
        assert_eq!(ctx.units()[0].total(), 0);
    }

    #[test]
    fn test_random_consumer_respects_limit_range() {
        let ctx = Arc::new(SupplyContext::new(
            SupplyChainConfig::new().with_consumer_limit_range(2, 4),
        ));
        for id in 0..20 {
            let drinker = Consumer::random(id, Arc::clone(&ctx), StdRng::seed_from_u64(id as u64));
            assert!((2..=4).contains(&drinker.limit()));
        }
    }
}
