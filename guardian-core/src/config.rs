//! Runtime configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::schedule::{is_valid_time_scale, MAX_TIME_SCALE};

pub const ENV_LANG_FILE: &str = "GUARDIAN_LANG_FILE";
pub const ENV_TIME_SCALE: &str = "GUARDIAN_TIME_SCALE";
pub const ENV_LOG: &str = "GUARDIAN_LOG";

const SETTINGS_FILE: &str = "settings.json";
const LOG_FILE: &str = "guardian.log";
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors from reading configuration overrides.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number above 0 and at most {max}, got {value:?}", max = MAX_TIME_SCALE)]
    InvalidTimeScale { name: &'static str, value: String },
}

/// Configuration for a demo session.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardianConfig {
    /// Multiplier applied to every scripted delay.
    pub time_scale: f64,

    /// Where the language preference is stored.
    pub lang_file: PathBuf,

    /// `tracing-subscriber` filter directive.
    pub log_filter: String,

    /// Seed for the random delays and jitter. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            lang_file: default_lang_file(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: None,
        }
    }
}

impl GuardianConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `GUARDIAN_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_LANG_FILE).filter(|p| !p.trim().is_empty()) {
            config.lang_file = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TIME_SCALE) {
            config.time_scale = parse_time_scale(&raw)?;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        Ok(config)
    }

    /// Set the delay multiplier. Values outside `(0, MAX_TIME_SCALE]` are
    /// ignored.
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        if is_valid_time_scale(scale) {
            self.time_scale = scale;
        } else {
            tracing::warn!(scale, "ignoring out-of-range time scale");
        }
        self
    }

    pub fn with_lang_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lang_file = path.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Log file for the terminal front-end, next to the settings file.
    pub fn log_file(&self) -> PathBuf {
        match self.lang_file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(LOG_FILE),
            _ => PathBuf::from(LOG_FILE),
        }
    }
}

fn parse_time_scale(raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(scale) if is_valid_time_scale(scale) => Ok(scale),
        _ => Err(ConfigError::InvalidTimeScale {
            name: ENV_TIME_SCALE,
            value: raw.to_string(),
        }),
    }
}

/// The platform config directory's settings file, or one in the working
/// directory when no home directory can be found.
pub fn default_lang_file() -> PathBuf {
    ProjectDirs::from("in", "GuardianNet", "guardian")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = GuardianConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.log_filter, "info");
        assert!(config.lang_file.ends_with("settings.json"));
    }

    #[test]
    fn test_env_overrides() {
        let config = GuardianConfig::from_lookup(lookup(&[
            ("GUARDIAN_LANG_FILE", "/tmp/g/lang.json"),
            ("GUARDIAN_TIME_SCALE", "0.25"),
            ("GUARDIAN_LOG", "guardian_core=debug"),
        ]))
        .unwrap();
        assert_eq!(config.lang_file, PathBuf::from("/tmp/g/lang.json"));
        assert_eq!(config.time_scale, 0.25);
        assert_eq!(config.log_filter, "guardian_core=debug");
        assert_eq!(config.log_file(), PathBuf::from("/tmp/g/guardian.log"));
    }

    #[test]
    fn test_bad_time_scale() {
        for bad in ["fast", "0", "-2", "NaN", "inf", "1e300", "1000.5"] {
            let err = GuardianConfig::from_lookup(lookup(&[("GUARDIAN_TIME_SCALE", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTimeScale { .. }), "{bad}");
        }
    }

    #[test]
    fn test_builder() {
        let config = GuardianConfig::new()
            .with_time_scale(2.0)
            .with_lang_file("prefs.json")
            .with_log_filter("warn");
        assert_eq!(config.time_scale, 2.0);
        assert_eq!(config.log_file(), PathBuf::from("guardian.log"));
    }

    #[test]
    fn test_builder_ignores_out_of_range_scale() {
        let config = GuardianConfig::new().with_time_scale(0.5).with_time_scale(1e300);
        assert_eq!(config.time_scale, 0.5);
        let config = config.with_time_scale(MAX_TIME_SCALE);
        assert_eq!(config.time_scale, MAX_TIME_SCALE);
    }

    #[test]
    fn test_max_scale_from_env() {
        let config = GuardianConfig::from_lookup(lookup(&[("GUARDIAN_TIME_SCALE", "1000")])).unwrap();
        assert_eq!(config.time_scale, MAX_TIME_SCALE);
    }
}
