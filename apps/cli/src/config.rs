use std::path::PathBuf;
use std::str::FromStr;

use fundread_core::errors::{Error, Result};
use fundread_core::StoreSettings;

pub const ENV_DB_PATH: &str = "FUNDREAD_DB_PATH";
pub const ENV_DATA_DIR: &str = "FUNDREAD_DATA_DIR";
pub const ENV_SCRATCH_DIR: &str = "FUNDREAD_SCRATCH_DIR";
pub const ENV_LOG_FORMAT: &str = "FUNDREAD_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::Config(format!(
                "{}='{}' (expected text or json)",
                ENV_LOG_FORMAT, other
            ))),
        }
    }
}

/// Process configuration taken from the environment and an optional `.env`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub store: StoreSettings,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = StoreSettings::default();
        let store = StoreSettings {
            db_path: get(ENV_DB_PATH).map(PathBuf::from),
            data_dir: get(ENV_DATA_DIR).map_or(defaults.data_dir, PathBuf::from),
            scratch_dir: get(ENV_SCRATCH_DIR).map(PathBuf::from),
        };

        let log_format = get(ENV_LOG_FORMAT)
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        Ok(Config { store, log_format })
    }

    /// Store settings with command line flags taking precedence.
    pub fn store_settings(&self, db: Option<PathBuf>, data_dir: Option<PathBuf>) -> StoreSettings {
        let mut settings = self.store.clone();
        if let Some(db) = db {
            settings.db_path = Some(db);
        }
        if let Some(dir) = data_dir {
            settings.data_dir = dir;
        }
        settings
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
    fn test_defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store, StoreSettings::default());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_environment_values() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DB_PATH, "/srv/aifm.db.gz"),
            (ENV_DATA_DIR, "/srv"),
            (ENV_SCRATCH_DIR, ""),
            (ENV_LOG_FORMAT, "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.store.db_path, Some(PathBuf::from("/srv/aifm.db.gz")));
        assert_eq!(config.store.data_dir, PathBuf::from("/srv"));
        assert_eq!(config.store.scratch_dir, None);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_log_format() {
        let err = Config::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_flags_override_environment() {
        let config = Config::from_lookup(lookup(&[(ENV_DB_PATH, "env.db")])).unwrap();
        let settings = config.store_settings(Some(PathBuf::from("flag.db")), Some("d".into()));
        assert_eq!(settings.db_path, Some(PathBuf::from("flag.db")));
        assert_eq!(settings.data_dir, PathBuf::from("d"));

        let untouched = config.store_settings(None, None);
        assert_eq!(untouched.db_path, Some(PathBuf::from("env.db")));
    }
}
