//! The ingestion pipeline: resolve parameters, fetch, normalize, persist.

use crate::core::{
    Environment, IngestParams, InvocationEvent, ObjectStore, PartitionKeys, RateProvider,
    RateQuery, RateRow,
    rates::normalize,
    store::{JSON_CONTENT_TYPE, NDJSON_CONTENT_TYPE},
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, info};

pub const SUCCESS_MESSAGE: &str = "Ingested FX rates";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub message: String,
    pub date: String,
    pub base: String,
    pub symbols: Vec<String>,
    pub count: usize,
    pub s3_ndjson_key: String,
    pub s3_raw_key: String,
}

/// Result of a successful invocation. The body serializes as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(serialize_with = "as_json_string")]
    pub body: IngestSummary,
}

fn as_json_string<S: Serializer>(body: &IngestSummary, serializer: S) -> Result<S::Ok, S::Error> {
    let json = serde_json::to_string(body).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&json)
}

pub struct IngestionHandler {
    provider: Arc<dyn RateProvider>,
    store: Arc<dyn ObjectStore>,
}

impl IngestionHandler {
    pub fn new(provider: Arc<dyn RateProvider>, store: Arc<dyn ObjectStore>) -> Self {
        Self { provider, store }
    }

    pub async fn handle(
        &self,
        event: &InvocationEvent,
        env: &Environment,
    ) -> Result<InvocationResult> {
        self.handle_at(event, env, Utc::now()).await
    }

    /// Runs one invocation with `now` as the single clock sample.
    pub async fn handle_at(
        &self,
        event: &InvocationEvent,
        env: &Environment,
        now: DateTime<Utc>,
    ) -> Result<InvocationResult> {
        let params = IngestParams::resolve(event, env)?;
        debug!(?params, "Resolved invocation parameters");

        let query = RateQuery {
            base: params.base.clone(),
            symbols: params.symbols.clone(),
            date: params.date.clone(),
        };
        let response = self
            .provider
            .fetch_rates(&query)
            .await
            .context("Failed to fetch rates")?;

        let normalized = normalize(&response, &params.base, now)?;
        let keys = PartitionKeys::new(&params.raw_prefix, &normalized.effective_date);

        let ndjson = RateRow::to_ndjson(&normalized.rows)?;
        self.store
            .put_object(
                &params.bucket,
                &keys.ndjson,
                ndjson.into_bytes(),
                NDJSON_CONTENT_TYPE,
            )
            .await
            .with_context(|| format!("Failed to store {}", keys.ndjson))?;

        let raw = response.to_pretty_json()?;
        self.store
            .put_object(
                &params.bucket,
                &keys.raw,
                raw.into_bytes(),
                JSON_CONTENT_TYPE,
            )
            .await
            .with_context(|| format!("Failed to store {}", keys.raw))?;

        info!(
            date = %normalized.effective_date,
            base = %normalized.base,
            count = normalized.rows.len(),
            bucket = %params.bucket,
            "Ingested FX rates"
        );

        Ok(InvocationResult {
            status_code: 200,
            body: IngestSummary {
                message: SUCCESS_MESSAGE.to_string(),
                date: normalized.effective_date,
                base: normalized.base,
                symbols: params.symbols,
                count: normalized.rows.len(),
                s3_ndjson_key: keys.ndjson,
                s3_raw_key: keys.raw,
            },
        })
    }
}
