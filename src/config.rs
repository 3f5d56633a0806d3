// src/config.rs

use chrono::NaiveDate;
use serde::Deserialize;
use std::{env, time::Duration};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::fetch::urls::BASE_URL;
use crate::months::parse_date;

pub const START_DATE_VAR: &str = "BRUIN_START_DATE";
pub const END_DATE_VAR: &str = "BRUIN_END_DATE";
pub const VARS_VAR: &str = "BRUIN_VARS";
pub const BASE_URL_VAR: &str = "TAXI_BASE_URL";

pub const DEFAULT_TAXI_TYPE: &str = "yellow";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Recognised keys of the `BRUIN_VARS` payload. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaxiVars {
    #[serde(default)]
    pub taxi_types: Option<Vec<String>>,
}

/// Outcome of parsing the variable payload. Parsing never fails: anything that
/// is not a JSON object with well-typed keys collapses to `Defaults`.
#[derive(Debug, Clone, PartialEq)]
pub enum VarsPayload {
    Parsed(TaxiVars),
    Defaults,
}

impl VarsPayload {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return VarsPayload::Defaults;
        };
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "{} is not valid JSON; using defaults", VARS_VAR);
                return VarsPayload::Defaults;
            }
        };
        if !value.is_object() {
            warn!("{} is not a JSON object; using defaults", VARS_VAR);
            return VarsPayload::Defaults;
        }
        match serde_json::from_value::<TaxiVars>(value) {
            Ok(vars) => VarsPayload::Parsed(vars),
            Err(e) => {
                warn!(error = %e, "{} has unexpected shape; using defaults", VARS_VAR);
                VarsPayload::Defaults
            }
        }
    }

    /// Taxi types in fetch order; `["yellow"]` when none were given.
    pub fn taxi_types(&self) -> Vec<String> {
        let types: Vec<String> = match self {
            VarsPayload::Parsed(TaxiVars {
                taxi_types: Some(list),
            }) => list
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        if types.is_empty() {
            vec![DEFAULT_TAXI_TYPE.to_string()]
        } else {
            types
        }
    }
}

/// Everything one ingestion run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Non-empty; order decides fetch order within a month.
    pub taxi_types: Vec<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl IngestConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            taxi_types: vec![DEFAULT_TAXI_TYPE.to_string()],
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_taxi_types(mut self, taxi_types: Vec<String>) -> Self {
        self.taxi_types = VarsPayload::Parsed(TaxiVars {
            taxi_types: Some(taxi_types),
        })
        .taxi_types();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the `BRUIN_*` execution context from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Start and end dates are required
    /// (absent or blank is an error); the variable payload is optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(IngestError::MissingParameter(key))
        };
        let start_raw = required(START_DATE_VAR)?;
        let end_raw = required(END_DATE_VAR)?;
        let start_date = parse_date(START_DATE_VAR, &start_raw)?;
        let end_date = parse_date(END_DATE_VAR, &end_raw)?;

        let vars = VarsPayload::parse(lookup(VARS_VAR).as_deref());
        let mut config = Self::new(start_date, end_date);
        config.taxi_types = vars.taxi_types();
        if let Some(base) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = base;
        }
        debug!(?config, "loaded ingest config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_vars_default_when_absent_or_malformed() {
        for raw in [None, Some(""), Some("{not json"), Some("[1,2]"), Some("42")] {
            let vars = VarsPayload::parse(raw);
            assert_eq!(vars, VarsPayload::Defaults, "raw = {:?}", raw);
            assert_eq!(vars.taxi_types(), vec!["yellow"]);
        }
    }

    #[test]
    fn test_vars_wrong_shape_degrades() {
        let vars = VarsPayload::parse(Some(r#"{"taxi_types": "green"}"#));
        assert_eq!(vars, VarsPayload::Defaults);
        let vars = VarsPayload::parse(Some(r#"{"taxi_types": ["green", 3]}"#));
        assert_eq!(vars.taxi_types(), vec!["yellow"]);
    }

    #[test]
    fn test_vars_keeps_order_and_ignores_other_keys() {
        let vars = VarsPayload::parse(Some(
            r#"{"taxi_types": ["green", " yellow ", ""], "other": true}"#,
        ));
        assert_eq!(vars.taxi_types(), vec!["green", "yellow"]);
    }

    #[test]
    fn test_vars_empty_list_uses_default() {
        let vars = VarsPayload::parse(Some(r#"{"taxi_types": []}"#));
        assert!(matches!(vars, VarsPayload::Parsed(_)));
        assert_eq!(vars.taxi_types(), vec!["yellow"]);
    }

    #[test]
    fn test_from_lookup_requires_dates() {
        let err = IngestConfig::from_lookup(lookup(&[(END_DATE_VAR, "2023-01-01")])).unwrap_err();
        assert!(matches!(err, IngestError::MissingParameter(START_DATE_VAR)));

        let err = IngestConfig::from_lookup(lookup(&[
            (START_DATE_VAR, "2023-01-01"),
            (END_DATE_VAR, "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, IngestError::MissingParameter(END_DATE_VAR)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_date() {
        let err = IngestConfig::from_lookup(lookup(&[
            (START_DATE_VAR, "2023-02-30"),
            (END_DATE_VAR, "2023-03-01"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidRange {
                name: START_DATE_VAR,
                ..
            }
        ));
    }

    #[test]
    fn test_from_lookup_full() {
        let config = IngestConfig::from_lookup(lookup(&[
            (START_DATE_VAR, "2023-01-15"),
            (END_DATE_VAR, "2023-03-02"),
            (VARS_VAR, r#"{"taxi_types": ["green", "yellow"]}"#),
            (BASE_URL_VAR, "http://127.0.0.1:9"),
        ]))
        .unwrap();
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
        assert_eq!(config.taxi_types, vec!["green", "yellow"]);
        assert_eq!(config.base_url, "http://127.0.0.1:9");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = IngestConfig::from_lookup(lookup(&[
            (START_DATE_VAR, "2023-01-01"),
            (END_DATE_VAR, "2023-01-01"),
            (VARS_VAR, "not json"),
        ]))
        .unwrap();
        assert_eq!(config.taxi_types, vec!["yellow"]);
        assert_eq!(config.base_url, BASE_URL);
    }
}
