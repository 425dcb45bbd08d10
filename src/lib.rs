pub mod agents;
pub mod core;
pub mod logging;
pub mod supply_chain;

// Re-export commonly used types
pub use crate::core::config::SupplyChainConfig;
pub use crate::core::context::SupplyContext;
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::inventory::{Depot, Inventory, Placement, Withdrawal};
pub use crate::core::storage_unit::{Capacity, StorageUnit};
pub use crate::core::types::{Batch, Item, ItemKind, Preference};
pub use crate::supply_chain::{RunningSupplyChain, SupplyChain, SupplyChainReport};
