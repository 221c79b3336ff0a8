//! Resolution of effective invocation parameters.
//!
//! Each parameter has its own resolver over an ordered list of candidates
//! (event, then environment, then a built-in default). The first non-empty
//! candidate wins.

use super::event::{Environment, InvocationEvent};
use anyhow::{Result, anyhow};
use std::fmt::Display;

pub const DEFAULT_BASE: &str = "EUR";
pub const DEFAULT_SYMBOLS: &str = "USD,GBP,CHF,HUF,PKR";
pub const DEFAULT_RAW_PREFIX: &str = "raw";

pub const ENV_BUCKET_NAME: &str = "BUCKET_NAME";
pub const ENV_RAW_PREFIX: &str = "RAW_PREFIX";
pub const ENV_BASE: &str = "BASE";
pub const ENV_SYMBOLS: &str = "SYMBOLS";

/// Which rates the upstream request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSelector {
    Latest,
    /// A date forwarded verbatim as a path segment. Not validated.
    On(String),
}

impl DateSelector {
    pub fn path(&self) -> String {
        match self {
            DateSelector::Latest => "/latest".to_string(),
            DateSelector::On(date) => format!("/{date}"),
        }
    }
}

impl Display for DateSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateSelector::Latest => write!(f, "latest"),
            DateSelector::On(date) => write!(f, "{date}"),
        }
    }
}

fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().flatten().find(|c| !c.is_empty())
}

pub fn resolve_base(event: &InvocationEvent, env: &Environment) -> String {
    first_non_empty([
        event.base.as_deref(),
        env.get(ENV_BASE),
        Some(DEFAULT_BASE),
    ])
    .unwrap_or(DEFAULT_BASE)
    .to_uppercase()
}

pub fn resolve_symbols(event: &InvocationEvent, env: &Environment) -> Vec<String> {
    let raw = first_non_empty([
        event.symbols.as_deref(),
        env.get(ENV_SYMBOLS),
        Some(DEFAULT_SYMBOLS),
    ])
    .unwrap_or(DEFAULT_SYMBOLS);
    parse_symbols(raw)
}

/// Splits a comma separated list, trimming and uppercasing each code.
/// Empty entries are dropped and order is kept.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

pub fn resolve_date(event: &InvocationEvent) -> DateSelector {
    match first_non_empty([event.date.as_deref()]) {
        Some(date) if !date.eq_ignore_ascii_case("latest") => DateSelector::On(date.to_string()),
        _ => DateSelector::Latest,
    }
}

pub fn resolve_bucket(env: &Environment) -> Result<String> {
    env.get(ENV_BUCKET_NAME)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Missing required environment variable: {ENV_BUCKET_NAME}"))
}

pub fn resolve_raw_prefix(env: &Environment) -> String {
    first_non_empty([env.get(ENV_RAW_PREFIX), Some(DEFAULT_RAW_PREFIX)])
        .unwrap_or(DEFAULT_RAW_PREFIX)
        .to_string()
}

/// Fully resolved parameters for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestParams {
    pub bucket: String,
    pub raw_prefix: String,
    pub base: String,
    pub symbols: Vec<String>,
    pub date: DateSelector,
}

impl IngestParams {
    /// Fails with a configuration error when no bucket is configured.
    pub fn resolve(event: &InvocationEvent, env: &Environment) -> Result<Self> {
        let bucket = resolve_bucket(env)?;
        Ok(Self {
            bucket,
            raw_prefix: resolve_raw_prefix(env),
            base: resolve_base(event, env),
            symbols: resolve_symbols(event, env),
            date: resolve_date(event),
        })
    }
}
