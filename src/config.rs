//! Runtime configuration from `CARDIOLENS_*` environment variables.

use std::path::PathBuf;

const DEFAULT_MODEL_PATH: &str = "models";
const DEFAULT_REPORT_DIR: &str = "reports";
const DEFAULT_LOG_FILE: &str = "cardiolens.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
    Stderr,
}

impl LogMode {
    /// Unrecognized values fall back to `Auto`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            "stderr" => Self::Stderr,
            _ => Self::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the model artifacts
    pub model_path: PathBuf,
    /// Directory reports are saved into
    pub report_dir: PathBuf,
    /// Load models without `manifest.json`
    pub allow_unverified_models: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            allow_unverified_models: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map_or(default, PathBuf::from)
        };

        Self {
            model_path: path("CARDIOLENS_MODEL_PATH", defaults.model_path),
            report_dir: path("CARDIOLENS_REPORT_DIR", defaults.report_dir),
            allow_unverified_models: lookup("CARDIOLENS_ALLOW_UNVERIFIED_MODELS")
                .is_some_and(|v| parse_bool(&v)),
            log_mode: lookup("CARDIOLENS_LOG_MODE").map_or(LogMode::Auto, |v| LogMode::parse(&v)),
            log_file: path("CARDIOLENS_LOG_FILE", defaults.log_file),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model_path, PathBuf::from("models"));
        assert_eq!(config.report_dir, PathBuf::from("reports"));
        assert!(!config.allow_unverified_models);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("CARDIOLENS_MODEL_PATH", "/opt/models"),
            ("CARDIOLENS_REPORT_DIR", "/tmp/out"),
            ("CARDIOLENS_ALLOW_UNVERIFIED_MODELS", "yes"),
            ("CARDIOLENS_LOG_MODE", "stderr"),
            ("CARDIOLENS_LOG_FILE", "/var/log/cl.log"),
        ]);
        assert_eq!(config.model_path, PathBuf::from("/opt/models"));
        assert_eq!(config.report_dir, PathBuf::from("/tmp/out"));
        assert!(config.allow_unverified_models);
        assert_eq!(config.log_mode, LogMode::Stderr);
        assert_eq!(config.log_file, PathBuf::from("/var/log/cl.log"));
    }

    #[test]
    fn test_bool_parsing() {
        for value in ["1", "true", "TRUE", "yes", "YES"] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "True", "on", ""] {
            assert!(!parse_bool(value), "{value}");
        }
    }

    #[test]
    fn test_log_mode_parse() {
        assert_eq!(LogMode::parse("FILE"), LogMode::File);
        assert_eq!(LogMode::parse("stdout"), LogMode::Stdout);
        assert_eq!(LogMode::parse("whatever"), LogMode::Auto);
    }
}
