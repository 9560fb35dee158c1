//! Configuration file parser for ~/.config/newsdeck/config.toml.
//!
//! The config file is optional: a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged as warnings to catch typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::DEFAULT_PAGE_SIZE;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_FEED_URL: &str = "http://localhost:8000/ai_news.json";
pub const DEFAULT_CONTACT_ENDPOINT: &str = "http://localhost:5000/submit-contact";

/// Longest scheduled refresh interval (one week); larger values are clamped.
pub const MAX_REFRESH_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the feed document.
    pub feed_url: String,

    /// Articles per page.
    pub page_size: usize,

    /// Scheduled refresh interval in minutes. 0 = manual refresh only.
    pub refresh_interval_minutes: u64,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Where the contact form is POSTed.
    pub contact_endpoint: String,

    /// Delay between the last keystroke and applying the search.
    pub search_debounce_ms: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            refresh_interval_minutes: 5,
            theme: "dark".to_string(),
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            search_debounce_ms: 300,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "feed_url",
        "page_size",
        "refresh_interval_minutes",
        "theme",
        "contact_endpoint",
        "search_debounce_ms",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - File over 1 MB → `Err(ConfigError::TooLarge)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        if config.refresh_interval_minutes > MAX_REFRESH_INTERVAL_MINUTES {
            tracing::warn!(
                minutes = config.refresh_interval_minutes,
                max = MAX_REFRESH_INTERVAL_MINUTES,
                "refresh_interval_minutes too large, clamping"
            );
        }
        tracing::info!(
            path = %path.display(),
            feed_url = %config.feed_url,
            theme = %config.theme,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Scheduled refresh interval, or `None` when refresh is manual only.
    ///
    /// Capped at [`MAX_REFRESH_INTERVAL_MINUTES`].
    pub fn refresh_interval(&self) -> Option<Duration> {
        let minutes = self.refresh_interval_minutes.min(MAX_REFRESH_INTERVAL_MINUTES);
        (minutes > 0).then(|| Duration::from_secs(minutes * 60))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================
