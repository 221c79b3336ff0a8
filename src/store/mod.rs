pub mod disk;
pub mod http;
pub mod memory;

use crate::core::config::StoreConfig;
use crate::core::store::ObjectStore;
use anyhow::Result;
use disk::DiskStore;
use http::HttpStore;
use std::sync::Arc;

pub use memory::MemoryStore;

/// Builds the object store selected by config. Called once per process.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>> {
    Ok(match config {
        StoreConfig::Disk { root } => Arc::new(DiskStore::new(root)),
        StoreConfig::Http { endpoint } => Arc::new(HttpStore::new(endpoint)?),
    })
}
