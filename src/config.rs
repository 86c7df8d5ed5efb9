use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SpindleConfig {
    pub general: GeneralConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub content_dir: String,
}

/// Batch scheduling and recency settings.
///
/// Values are validated when a `BatchScheduler` is built from them, so a zero
/// here surfaces as a configuration error at first use.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Max number of items returned in a batch.
    pub batch_size: usize,
    /// Views after which an item is no longer scheduled.
    pub max_views: u32,
    /// Granularity, in items, of the rotation window.
    pub refresh_rate: usize,
    /// Max number of recently viewed categories to return.
    pub recent_count: usize,
    /// Recency window, in days.
    pub recent_days: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_spindle_dir();
        Self {
            db_path: dir.join("material.db").to_string_lossy().into_owned(),
            content_dir: dir.join("content").to_string_lossy().into_owned(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            max_views: 5,
            refresh_rate: 3,
            recent_count: 5,
            recent_days: 7,
        }
    }
}

/// Returns `~/.spindle/`
pub fn default_spindle_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".spindle")
}

/// Returns the default config file path: `~/.spindle/config.toml`
pub fn default_config_path() -> PathBuf {
    default_spindle_dir().join("config.toml")
}

impl SpindleConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            SpindleConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (SPINDLE_DB, SPINDLE_CONTENT_DIR,
    /// SPINDLE_LOG_LEVEL, SPINDLE_BATCH_SIZE, SPINDLE_MAX_VIEWS, SPINDLE_REFRESH_RATE).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SPINDLE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("SPINDLE_CONTENT_DIR") {
            self.storage.content_dir = val;
        }
        if let Ok(val) = std::env::var("SPINDLE_LOG_LEVEL") {
            self.general.log_level = val;
        }
        override_number("SPINDLE_BATCH_SIZE", &mut self.schedule.batch_size);
        override_number("SPINDLE_MAX_VIEWS", &mut self.schedule.max_views);
        override_number("SPINDLE_REFRESH_RATE", &mut self.schedule.refresh_rate);
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_content_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.content_dir)
    }
}

fn override_number<T: FromStr>(key: &str, target: &mut T) {
    let Ok(val) = std::env::var(key) else {
        return;
    };
    match val.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(key, value = %val, "ignoring non-numeric override"),
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SpindleConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.schedule.batch_size, 5);
        assert_eq!(config.schedule.max_views, 5);
        assert_eq!(config.schedule.refresh_rate, 3);
        assert_eq!(config.schedule.recent_count, 5);
        assert_eq!(config.schedule.recent_days, 7);
        assert!(config.storage.db_path.ends_with("material.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[general]
log_level = "debug"

[storage]
db_path = "/tmp/test.db"

[schedule]
batch_size = 10
max_views = 3
"#;
        let config: SpindleConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.schedule.batch_size, 10);
        assert_eq!(config.schedule.max_views, 3);
        // defaults still apply for unset fields
        assert_eq!(config.schedule.refresh_rate, 3);
        assert!(config.storage.content_dir.ends_with("content"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = SpindleConfig::default();
        std::env::set_var("SPINDLE_DB", "/tmp/override.db");
        std::env::set_var("SPINDLE_LOG_LEVEL", "trace");
        std::env::set_var("SPINDLE_BATCH_SIZE", "8");
        std::env::set_var("SPINDLE_MAX_VIEWS", "not-a-number");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.general.log_level, "trace");
        assert_eq!(config.schedule.batch_size, 8);
        assert_eq!(config.schedule.max_views, 5);

        // Clean up
        std::env::remove_var("SPINDLE_DB");
        std::env::remove_var("SPINDLE_LOG_LEVEL");
        std::env::remove_var("SPINDLE_BATCH_SIZE");
        std::env::remove_var("SPINDLE_MAX_VIEWS");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/lib/x.db"), PathBuf::from("/var/lib/x.db"));
    }
}
