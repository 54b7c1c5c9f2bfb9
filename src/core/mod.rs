//! Core business logic abstractions

pub mod analytics;
pub mod config;
pub mod currency;
pub mod filter;
pub mod log;
pub mod model;

// Re-export main types for cleaner imports
pub use currency::{RateTable, RateTableProvider};
pub use filter::{FilterMode, FilterSelection};
pub use model::{Account, Transaction, TransactionKind};
