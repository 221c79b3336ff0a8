use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::rates::{RateProvider, RateQuery, RateResponse};

/// Rate provider backed by the Frankfurter API
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxingest/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn request_url(&self, query: &RateQuery) -> String {
        format!(
            "{}{}?base={}&symbols={}",
            self.base_url,
            query.date.path(),
            query.base,
            query.symbols.join(",")
        )
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    #[instrument(
        name = "FrankfurterFetch",
        skip(self, query),
        fields(base = %query.base, date = %query.date)
    )]
    async fn fetch_rates(&self, query: &RateQuery) -> Result<RateResponse> {
        let url = self.request_url(query);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} URL: {}", response.status(), url));
        }

        let text = response
            .text()
            .await
            .context("Failed to get response text")?;

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %text,
                    "Failed to parse rate response"
                );
                return Err(e).context("Failed to parse rate response");
            }
        };

        RateResponse::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::DateSelector;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> FrankfurterProvider {
        FrankfurterProvider::new(&server.uri(), Duration::from_secs(20)).unwrap()
    }

    fn query(date: DateSelector) -> RateQuery {
        RateQuery {
            base: "EUR".to_string(),
            symbols: vec!["USD".to_string(), "GBP".to_string()],
            date,
        }
    }

    const MOCK_JSON: &str = r#"{
        "amount": 1.0,
        "base": "EUR",
        "date": "2024-01-15",
        "rates": {"USD": 1.0945, "GBP": 0.8591}
    }"#;

    #[test]
    fn test_request_url() {
        let provider =
            FrankfurterProvider::new("https://api.frankfurter.dev/v1/", Duration::from_secs(20))
                .unwrap();
        assert_eq!(
            provider.request_url(&query(DateSelector::Latest)),
            "https://api.frankfurter.dev/v1/latest?base=EUR&symbols=USD,GBP"
        );
        assert_eq!(
            provider.request_url(&query(DateSelector::On("2024-01-15".to_string()))),
            "https://api.frankfurter.dev/v1/2024-01-15?base=EUR&symbols=USD,GBP"
        );
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("base", "EUR"))
            .and(query_param("symbols", "USD,GBP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = provider(&mock_server)
            .fetch_rates(&query(DateSelector::Latest))
            .await
            .unwrap();
        assert_eq!(response.date(), Some("2024-01-15"));
        assert_eq!(response.base(), Some("EUR"));
        assert_eq!(response.rates().unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_for_date() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2024-01-13"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MOCK_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Weekend request resolves to the previous business day upstream
        let response = provider(&mock_server)
            .fetch_rates(&query(DateSelector::On("2024-01-13".to_string())))
            .await
            .unwrap();
        assert_eq!(response.date(), Some("2024-01-15"));
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/not-a-date"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"not found"}"#))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server)
            .fetch_rates(&query(DateSelector::On("not-a-date".to_string())))
            .await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .starts_with("HTTP error: 404 Not Found")
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server)
            .fetch_rates(&query(DateSelector::Latest))
            .await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to parse rate response"
        );
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(MOCK_JSON)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let provider =
            FrankfurterProvider::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let result = provider.fetch_rates(&query(DateSelector::Latest)).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("Request error"));
    }
}
