//! Core ingestion abstractions

pub mod config;
pub mod event;
pub mod log;
pub mod params;
pub mod rates;
pub mod store;

// Re-export main types for cleaner imports
pub use event::{Environment, InvocationEvent};
pub use params::{DateSelector, IngestParams};
pub use rates::{RateProvider, RateQuery, RateResponse, RateRow};
pub use store::{ObjectStore, PartitionKeys};
