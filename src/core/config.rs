use super::errors::SimError;
use super::storage_unit::Capacity;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often each stage cycles, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleIntervals {
    pub supplier_ms: u64,
    pub restocker_ms: u64,
    pub consumer_ms: u64,
}

impl Default for CycleIntervals {
    fn default() -> Self {
        Self {
            supplier_ms: 3000,
            restocker_ms: 2000,
            consumer_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionConfig {
    pub min_batch_size: u32,
    pub max_batch_size: u32,
    /// Chance a produced item is a can rather than a bottle
    pub can_ratio: f64,
    /// Chance a produced can arrives spoiled
    pub can_spoil_probability: f64,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            min_batch_size: 1,
            max_batch_size: 30,
            can_ratio: 0.5,
            can_spoil_probability: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerConfig {
    pub count: usize,
    /// Size of the admission pool; consumers beyond it wait for a free slot
    pub admission_permits: usize,
    pub min_limit: u32,
    pub max_limit: u32,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            count: 5,
            admission_permits: 5,
            min_limit: 1,
            max_limit: 10,
        }
    }
}

/// Fixed parameters of one supply chain run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyChainConfig {
    pub unit_count: usize,
    pub unit_capacity: Capacity,
    pub intervals: CycleIntervals,
    pub production: ProductionConfig,
    pub consumers: ConsumerConfig,
    pub run_duration_ms: u64,
    pub random_seed: Option<u64>,
}

impl Default for SupplyChainConfig {
    fn default() -> Self {
        Self {
            unit_count: 3,
            unit_capacity: Capacity::default(),
            intervals: CycleIntervals::default(),
            production: ProductionConfig::default(),
            consumers: ConsumerConfig::default(),
            run_duration_ms: 60_000,
            random_seed: None,
        }
    }
}

impl SupplyChainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, count: usize, capacity: Capacity) -> Self {
        self.unit_count = count;
        self.unit_capacity = capacity;
        self
    }

    pub fn with_intervals(mut self, supplier_ms: u64, restocker_ms: u64, consumer_ms: u64) -> Self {
        self.intervals = CycleIntervals {
            supplier_ms,
            restocker_ms,
            consumer_ms,
        };
        self
    }

    pub fn with_run_duration(mut self, duration: Duration) -> Self {
        self.run_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_batch_size_range(mut self, min: u32, max: u32) -> Self {
        self.production.min_batch_size = min;
        self.production.max_batch_size = max;
        self
    }

    pub fn with_can_ratio(mut self, ratio: f64) -> Self {
        self.production.can_ratio = ratio;
        self
    }

    pub fn with_spoil_probability(mut self, probability: f64) -> Self {
        self.production.can_spoil_probability = probability;
        self
    }

    pub fn with_consumers(mut self, count: usize, admission_permits: usize) -> Self {
        self.consumers.count = count;
        self.consumers.admission_permits = admission_permits;
        self
    }

    pub fn with_consumer_limit_range(mut self, min: u32, max: u32) -> Self {
        self.consumers.min_limit = min;
        self.consumers.max_limit = max;
        self
    }

    pub fn with_random_seed(mut self, seed: Option<u64>) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn supplier_interval(&self) -> Duration {
        Duration::from_millis(self.intervals.supplier_ms)
    }

    pub fn restocker_interval(&self) -> Duration {
        Duration::from_millis(self.intervals.restocker_ms)
    }

    pub fn consumer_interval(&self) -> Duration {
        Duration::from_millis(self.intervals.consumer_ms)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_millis(self.run_duration_ms)
    }

    /// Independent generator for one thread. With a seed every stream is
    /// reproducible; without one each stream is seeded from the OS.
    pub fn rng_for(&self, stream: u64) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: &str| -> Result<(), SimError> {
            Err(SimError::InvalidConfig(msg.to_string()))
        };

        if self.unit_count == 0 {
            return invalid("At least one storage unit is required");
        }
        if self.unit_capacity.total() == 0 {
            return invalid("Storage unit capacity must be greater than 0");
        }
        if self.consumers.admission_permits == 0 {
            return invalid("Admission pool must hold at least one permit");
        }
        if self.consumers.min_limit == 0 {
            return invalid("Consumer limit must be at least 1");
        }
        if self.consumers.min_limit > self.consumers.max_limit {
            return invalid("Min consumer limit cannot be greater than max limit");
        }
        if self.production.min_batch_size == 0 {
            return invalid("Batch size must be at least 1");
        }
        if self.production.min_batch_size > self.production.max_batch_size {
            return invalid("Min batch size cannot be greater than max batch size");
        }
        for (name, p) in [
            ("Can ratio", self.production.can_ratio),
            ("Spoil probability", self.production.can_spoil_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!("{} must be within [0, 1]", name)));
            }
        }
        if self.run_duration_ms == 0 {
            return invalid("Run duration must be greater than 0");
        }

        Ok(())
    }
}
