pub mod config;
pub mod context;
pub mod errors;
pub mod gate;
pub mod inventory;
pub mod ledger;
pub mod open_flag;
pub mod storage_unit;
pub mod types;
