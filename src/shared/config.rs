use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use super::language::Language;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_WINDOW_DAYS: u32 = 30;
const MAX_WINDOW_DAYS: u32 = 365;

/// Theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    Ocean,
}

impl ThemeMode {
    pub fn next(&self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Ocean,
            ThemeMode::Ocean => ThemeMode::Dark,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the analytics backend
    pub backend_url: String,
    /// Language used at startup
    pub language: Language,
    /// Days of history fetched for the dashboard
    pub window_days: u32,
    /// Per-request timeout; none means wait for the backend indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Theme mode selection
    pub theme_mode: ThemeMode,
    /// Show help overlay
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            language: Language::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            request_timeout_secs: None,
            theme_mode: ThemeMode::default(),
            show_help: false,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            Self::from_json(&content).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %config_path.display(),
                    "config unreadable, using defaults: {err}"
                );
                let default_config = Config::default();
                let _ = default_config.save();
                default_config
            })
        } else {
            let default_config = Config::default();
            let _ = default_config.save();
            default_config
        };

        Ok(config)
    }

    /// Parse a stored config, bringing hand-edited values back into range
    fn from_json(content: &str) -> serde_json::Result<Self> {
        let mut config: Config = serde_json::from_str(content)?;
        config.set_window_days(config.window_days);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?
                .join(".config")
        };

        Ok(config_dir.join("bi-assistant").join("config.json"))
    }

    /// Set the dashboard window, clamped to 1..=365 days
    pub fn set_window_days(&mut self, days: u32) {
        self.window_days = days.clamp(1, MAX_WINDOW_DAYS);
    }

    /// Set backend URL, ignoring blank input
    pub fn set_backend_url(&mut self, url: &str) {
        let url = url.trim().trim_end_matches('/');
        if !url.is_empty() {
            self.backend_url = url.to_string();
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Set theme mode
    pub fn set_theme_mode(&mut self, theme_mode: ThemeMode) {
        self.theme_mode = theme_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Get theme display string
    pub fn theme_display(&self) -> &str {
        match self.theme_mode {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
            ThemeMode::Ocean => "Ocean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.language, Language::English);
        assert_eq!(config.window_days, 30);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.theme_mode, ThemeMode::Dark);
        assert!(!config.show_help);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            backend_url: "http://analytics.internal:9000".to_string(),
            language: Language::Cantonese,
            window_days: 7,
            request_timeout_secs: Some(15),
            theme_mode: ThemeMode::Ocean,
            show_help: true,
        };

        let serialized = serde_json::to_string_pretty(&config).unwrap();
        assert!(serialized.contains("\"yue\""));
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config.backend_url, deserialized.backend_url);
        assert_eq!(config.language, deserialized.language);
        assert_eq!(config.window_days, deserialized.window_days);
        assert_eq!(config.request_timeout_secs, deserialized.request_timeout_secs);
        assert_eq!(config.theme_mode, deserialized.theme_mode);
        assert_eq!(config.show_help, deserialized.show_help);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "language": "zh" }"#).unwrap();
        assert_eq!(config.language, Language::Mandarin);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_window_days_clamped() {
        let mut config = Config::default();

        config.set_window_days(0);
        assert_eq!(config.window_days, 1);

        config.set_window_days(90);
        assert_eq!(config.window_days, 90);

        config.set_window_days(10_000);
        assert_eq!(config.window_days, 365);
    }

    #[test]
    fn test_stored_window_days_clamped_on_load() {
        let config = Config::from_json(r#"{ "window_days": 0 }"#).unwrap();
        assert_eq!(config.window_days, 1);

        let config = Config::from_json(r#"{ "window_days": 100000 }"#).unwrap();
        assert_eq!(config.window_days, 365);

        let config = Config::from_json(r#"{ "window_days": 14 }"#).unwrap();
        assert_eq!(config.window_days, 14);
    }

    #[test]
    fn test_backend_url_setter() {
        let mut config = Config::default();

        config.set_backend_url("  http://example.com:8000/ ");
        assert_eq!(config.backend_url, "http://example.com:8000");

        config.set_backend_url("   ");
        assert_eq!(config.backend_url, "http://example.com:8000");
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = Config {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_theme_cycle_and_display() {
        let mut config = Config::default();
        assert_eq!(config.theme_display(), "Dark");

        config.set_theme_mode(config.theme_mode.next());
        assert_eq!(config.theme_display(), "Light");

        config.set_theme_mode(config.theme_mode.next());
        assert_eq!(config.theme_display(), "Ocean");

        config.set_theme_mode(config.theme_mode.next());
        assert_eq!(config.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_help_toggle() {
        let mut config = Config::default();
        config.toggle_help();
        assert!(config.show_help);
        config.toggle_help();
        assert!(!config.show_help);
    }
}
