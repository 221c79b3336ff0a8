//! Rate fetching abstractions and the normalized row model

use super::params::DateSelector;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value of the `source` column on every row.
pub const SOURCE: &str = "frankfurter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    pub base: String,
    pub symbols: Vec<String>,
    pub date: DateSelector,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, query: &RateQuery) -> Result<RateResponse>;
}

/// Upstream response body, kept whole so it can be archived verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RateResponse {
    body: Map<String, Value>,
}

impl RateResponse {
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Self { body }),
            other => Err(anyhow!(
                "Expected a JSON object in rate response, got: {other}"
            )),
        }
    }

    pub fn date(&self) -> Option<&str> {
        self.body
            .get("date")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
    }

    pub fn base(&self) -> Option<&str> {
        self.body
            .get("base")
            .and_then(Value::as_str)
            .filter(|b| !b.is_empty())
    }

    /// Rates keyed by currency code. `None` when the field is absent or null;
    /// any value other than an object is an error.
    pub fn rates(&self) -> Result<Option<&Map<String, Value>>> {
        match self.body.get("rates") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(rates)) => Ok(Some(rates)),
            Some(other) => bail!("Expected an object for rates, got: {other}"),
        }
    }

    /// Indented JSON of the full response.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.body).context("Failed to serialize raw rate response")
    }
}

/// One normalized rate observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub date: String,
    pub base: String,
    pub currency: String,
    pub rate: f64,
    pub source: String,
    pub ingested_at: String,
}

impl RateRow {
    /// Newline delimited JSON: one compact object per line plus a trailing newline.
    /// No rows yields a body of exactly `"\n"`.
    pub fn to_ndjson(rows: &[RateRow]) -> Result<String> {
        let lines = rows
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to serialize rate rows")?;
        Ok(lines.join("\n") + "\n")
    }
}

/// Rows derived from a single response together with the values they share.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRates {
    pub effective_date: String,
    pub base: String,
    pub ingested_at: String,
    pub rows: Vec<RateRow>,
}

/// Formats `now` as a second precision UTC timestamp with a `Z` suffix.
pub fn format_ingested_at(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn coerce_rate(currency: &str, value: &Value) -> Result<f64> {
    let rate = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match rate {
        Some(r) if r.is_finite() => Ok(r),
        _ => bail!("Non-numeric rate for currency {currency}: {value}"),
    }
}

/// Flattens the response's rate mapping into rows.
///
/// The effective date comes from the response, falling back to the UTC
/// calendar date of `now`. The base comes from the response, falling back to
/// `requested_base`. `now` is sampled once by the caller so every row shares
/// the same `ingested_at`.
pub fn normalize(
    response: &RateResponse,
    requested_base: &str,
    now: DateTime<Utc>,
) -> Result<NormalizedRates> {
    let effective_date = response
        .date()
        .map(str::to_string)
        .unwrap_or_else(|| now.date_naive().format("%Y-%m-%d").to_string());
    let base = response.base().unwrap_or(requested_base).to_string();
    let ingested_at = format_ingested_at(now);

    let rows = response
        .rates()?
        .into_iter()
        .flatten()
        .map(|(currency, value)| {
            Ok(RateRow {
                date: effective_date.clone(),
                base: base.clone(),
                currency: currency.clone(),
                rate: coerce_rate(currency, value)?,
                source: SOURCE.to_string(),
                ingested_at: ingested_at.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NormalizedRates {
        effective_date,
        base,
        ingested_at,
        rows,
    })
}
