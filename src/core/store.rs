//! Object store abstraction and the date-partitioned key layout

use anyhow::Result;
use async_trait::async_trait;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;
}

/// Object keys for one effective date, both under `{raw_prefix}/dt={date}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionKeys {
    pub ndjson: String,
    pub raw: String,
}

impl PartitionKeys {
    pub fn new(raw_prefix: &str, effective_date: &str) -> Self {
        let partition = format!("{raw_prefix}/dt={effective_date}");
        Self {
            ndjson: format!("{partition}/rates.ndjson"),
            raw: format!("{partition}/raw_response.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keys() {
        let keys = PartitionKeys::new("raw", "2024-01-15");
        assert_eq!(keys.ndjson, "raw/dt=2024-01-15/rates.ndjson");
        assert_eq!(keys.raw, "raw/dt=2024-01-15/raw_response.json");

        let keys = PartitionKeys::new("landing/fx", "2023-12-29");
        assert_eq!(keys.ndjson, "landing/fx/dt=2023-12-29/rates.ndjson");
    }
}
