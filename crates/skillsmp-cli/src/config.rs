//! Environment-driven settings and logging setup.

use skillsmp_api::DEFAULT_BASE_URL;
use tracing_subscriber::EnvFilter;

/// Overrides the API root, mainly for staging and tests.
pub const API_URL_VAR: &str = "SKILLSMP_API_URL";
/// `tracing` filter directive for stderr diagnostics.
pub const LOG_VAR: &str = "SKILLSMP_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings read from the environment once at startup.
///
/// The API key is not part of this; it is loaded separately, after argument
/// validation, so that usage errors never touch credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            base_url: get(API_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            log_filter: get(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Install the stderr `tracing` subscriber. Stdout stays reserved for results.
pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|e| {
        eprintln!(
            "Warning: invalid {} filter {:?}: {}",
            LOG_VAR, settings.log_filter, e
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(
            settings(&[]),
            Settings {
                base_url: DEFAULT_BASE_URL.to_string(),
                log_filter: "warn".to_string(),
            }
        );
    }

    #[test]
    fn environment_overrides() {
        let s = settings(&[
            (API_URL_VAR, "http://127.0.0.1:9999/api"),
            (LOG_VAR, "skillsmp_api=debug"),
        ]);
        assert_eq!(s.base_url, "http://127.0.0.1:9999/api");
        assert_eq!(s.log_filter, "skillsmp_api=debug");
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[(API_URL_VAR, "  "), (LOG_VAR, "")]);
        assert_eq!(s, settings(&[]));
    }
}
