use crate::core::store::ObjectStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// Object store reached over HTTP with `PUT {endpoint}/{bucket}/{key}`.
///
/// Suits S3-compatible gateways that accept pre-authorized uploads.
pub struct HttpStore {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxingest/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }
}

#[async_trait]
impl ObjectStore for HttpStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url(bucket, key);
        debug!("HTTP PUT {} ({} bytes)", url, body.len());

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!("Upload error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} URL: {}", response.status(), url));
        }
        Ok(())
    }
}
