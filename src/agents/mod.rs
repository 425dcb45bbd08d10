pub mod consumer;
pub mod restocker;
pub mod supplier;

pub use consumer::{Consumer, ConsumerOutcome, ConsumerReport};
pub use restocker::{Restocker, RestockerReport};
pub use supplier::{Supplier, SupplierReport};
