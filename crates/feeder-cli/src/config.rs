//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use feeder_core::{
    FeedSize, LOG_PANE, PaneId, PanelConfig, SCHEDULE_PANE, STATUS_PANE, StatusTimings,
};

/// Device URL used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Request timeout in seconds used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the configured device URL.
pub const URL_ENV: &str = "FEEDER_URL";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the feeder
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Pane shown when the control panel opens (`status`, `schedule`, `log`)
    #[serde(default)]
    pub default_pane: Option<String>,

    /// Initial feed size of the slider (`1`-`5` or a size name)
    #[serde(default)]
    pub default_feed_size: Option<String>,

    /// Animation and settle timings
    #[serde(default)]
    pub timings: TimingsConfig,
}

/// Timings in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    /// Duration of each pane animation phase
    pub transition_ms: u64,
    /// How long the gauge stays in its updating state after a refresh
    pub refresh_settle_ms: u64,
    /// How long the feed trigger stays disabled after a feed
    pub feed_settle_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            refresh_settle_ms: 1000,
            feed_settle_ms: 5000,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pet-feeder")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`. Unreadable or broken files warn and fall back
    /// to the defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Starter config written by `feeder config init`.
    pub fn starter() -> Self {
        Self {
            url: Some(DEFAULT_URL.to_string()),
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            default_pane: Some(STATUS_PANE.to_string()),
            default_feed_size: Some(FeedSize::default().code().to_string()),
            timings: TimingsConfig::default(),
        }
    }

    /// Panel settings derived from this config. Unknown panes and sizes warn
    /// and fall back to the defaults.
    pub fn panel_config(&self) -> PanelConfig {
        let defaults = PanelConfig::default();

        let default_pane = match self.default_pane.as_deref() {
            Some(pane @ (STATUS_PANE | SCHEDULE_PANE | LOG_PANE)) => PaneId::from(pane),
            Some(other) => {
                tracing::warn!("Unknown default pane '{}', using {}", other, STATUS_PANE);
                defaults.default_pane
            }
            None => defaults.default_pane,
        };

        let default_feed_size = match self.default_feed_size.as_deref() {
            Some(raw) => raw.parse::<FeedSize>().unwrap_or_else(|e| {
                tracing::warn!("{}, using {}", e, FeedSize::default());
                FeedSize::default()
            }),
            None => defaults.default_feed_size,
        };

        PanelConfig {
            transition: Duration::from_millis(self.timings.transition_ms),
            timings: StatusTimings {
                refresh_settle: Duration::from_millis(self.timings.refresh_settle_ms),
                feed_settle: Duration::from_millis(self.timings.feed_settle_ms),
            },
            default_pane,
            default_feed_size,
        }
    }
}

/// Resolve the device URL: explicit flag or env var, then config, then the
/// built-in default.
pub fn resolve_url(url: Option<&str>, config: &Config) -> String {
    url.map(str::to_string)
        .filter(|u| !u.trim().is_empty())
        .or_else(|| config.url.clone())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

/// Resolve the request timeout: explicit flag, then config, then the default.
pub fn resolve_timeout(timeout: Option<u64>, config: &Config) -> Duration {
    Duration::from_secs(
        timeout
            .or(config.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    )
}
