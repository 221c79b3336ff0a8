//! Invocation inputs: the trigger event and a snapshot of the process environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;

/// Parameters carried by a single invocation. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub base: Option<String>,
    /// Comma separated currency codes, e.g. `"USD,GBP"`
    #[serde(default)]
    pub symbols: Option<String>,
    /// Either `"latest"` or a calendar date such as `"2024-01-15"`
    #[serde(default)]
    pub date: Option<String>,
}

impl InvocationEvent {
    /// Parses an event from its JSON form. A JSON `null` is treated as an empty event.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let event: Option<Self> = serde_json::from_str(json)?;
        Ok(event.unwrap_or_default())
    }
}

/// Read-only view of environment variables consulted during resolution.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Snapshots the process environment. Variables whose name or value is
    /// not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self {
            vars: pairs
                .into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of `key` unless it is unset or empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
