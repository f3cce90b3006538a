//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, so config layering and
//! GitHub context discovery can be exercised without touching process state.

use std::collections::HashMap;

use thiserror::Error;

/// A required variable was absent or empty.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("missing environment variable: {0}")]
pub struct MissingVar(pub String);

/// Environment variable reader.
#[derive(Clone, Debug, Default)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up a variable, treating empty values as unset.
    pub fn get(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        }?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Look up a variable that must be present.
    pub fn require(&self, name: &str) -> Result<String, MissingVar> {
        self.get(name).ok_or_else(|| MissingVar(name.to_string()))
    }

    /// Parse a variable into `T`, returning `None` when unset or unparsable.
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Split a comma-separated variable into trimmed, non-empty items.
    pub fn list(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.get("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn empty_values_count_as_unset() {
        let env = Env::mock([("BLANK", "   "), ("SET", " value ")]);
        assert_eq!(env.get("BLANK"), None);
        assert_eq!(env.get("SET").as_deref(), Some("value"));
    }

    #[test]
    fn require_reports_missing_name() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let err = env.require("GITHUB_TOKEN").unwrap_err();
        assert_eq!(err.to_string(), "missing environment variable: GITHUB_TOKEN");
    }

    #[test]
    fn parse_ignores_garbage() {
        let env = Env::mock([("N", "12"), ("BAD", "twelve")]);
        assert_eq!(env.parse::<usize>("N"), Some(12));
        assert_eq!(env.parse::<usize>("BAD"), None);
    }

    #[test]
    fn list_splits_on_commas() {
        let env = Env::mock([("EXT", ".py, .rs,,")]);
        assert_eq!(env.list("EXT"), Some(vec![".py".to_string(), ".rs".to_string()]));
    }
}
