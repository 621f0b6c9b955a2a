//! Configuration management for the Railbook suite.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::FareType;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main suite configuration.
///
/// This is loaded from `~/.config/railbook/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used. The
/// defaults describe the one scenario the suite automates: a one-way
/// Madrid-Atocha to Barcelona-Sants search with a 50-60 EUR price window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Journey under test (stations, fare, site entry point)
    pub journey: JourneyConfig,
    /// Target price window for offer selection
    pub pricing: PricingConfig,
    /// Browser launch settings
    pub browser: BrowserSettings,
    /// Result-page polling behavior
    pub polling: PollingConfig,
}

impl SuiteConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `RAILBOOK_HEADLESS`: Override browser headless mode (true/false)
    /// - `RAILBOOK_MAX_ATTEMPTS`: Override result polling attempts
    /// - `RAILBOOK_BASE_URL`: Override the site entry URL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        // Override from environment
        if let Ok(val) = std::env::var("RAILBOOK_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("RAILBOOK_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                config.polling.max_attempts = attempts;
                tracing::debug!("Override polling.max_attempts from env: {}", attempts);
            }
        }

        if let Ok(val) = std::env::var("RAILBOOK_BASE_URL") {
            config.journey.base_url = val.clone();
            tracing::debug!("Override journey.base_url from env: {}", val);
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/railbook/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "railbook", "railbook").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the directory used for run artifacts (failure screenshots).
    ///
    /// Uses XDG base directories: `~/.local/share/railbook/artifacts`
    pub fn artifacts_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "railbook", "railbook").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().join("artifacts"))
    }

    /// Validate the configuration for internal consistency.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if url::Url::parse(&self.journey.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "journey.base_url".to_string(),
                reason: format!("not a valid URL: {}", self.journey.base_url),
            });
        }

        if self.journey.origin.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "journey.origin".to_string(),
                reason: "origin station cannot be empty".to_string(),
            });
        }

        if self.journey.destination.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "journey.destination".to_string(),
                reason: "destination station cannot be empty".to_string(),
            });
        }

        if self.pricing.min < 0.0 || self.pricing.max < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pricing".to_string(),
                reason: "price bounds must be non-negative".to_string(),
            });
        }

        if self.pricing.min > self.pricing.max {
            return Err(ConfigError::InvalidValue {
                field: "pricing".to_string(),
                reason: format!(
                    "min ({}) must not exceed max ({})",
                    self.pricing.min, self.pricing.max
                ),
            });
        }

        if self.polling.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.polling.container_timeout_secs == 0 || self.polling.page_load_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling".to_string(),
                reason: "wait timeouts must be positive".to_string(),
            });
        }

        Ok(())
    }
}

/// Journey under test: stations, fare, and the site entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    /// Entry URL for the booking site
    pub base_url: String,
    /// Text typed into the origin station input
    pub origin: String,
    /// Suggestion label picked from the origin dropdown
    pub origin_option: String,
    /// Text typed into the destination station input
    pub destination: String,
    /// Suggestion label picked from the destination dropdown
    pub destination_option: String,
    /// Fare tier selected after a ticket is chosen
    pub fare: FareType,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.renfe.com/es/es".to_string(),
            origin: "Madrid-Atocha Cercan\u{ed}as".to_string(),
            origin_option: "Madrid-Atocha Cercan\u{ed}as".to_string(),
            destination: "Barcelona-Sants".to_string(),
            destination_option: "Barcelona-Sants".to_string(),
            fare: FareType::Basic,
        }
    }
}

/// Target price window for offer selection, both bounds inclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Lowest acceptable ticket price in EUR
    pub min: f64,
    /// Highest acceptable ticket price in EUR
    pub max: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min: 50.0,
            max: 60.0,
        }
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run without a visible window (headed mode is useful for debugging)
    pub headless: bool,
    /// Browser window width in pixels
    pub window_width: u32,
    /// Browser window height in pixels
    pub window_height: u32,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

/// Result-page polling behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Number of attempts before giving up on the results page
    pub max_attempts: u32,
    /// Seconds to wait for the offer container to become visible
    pub container_timeout_secs: u64,
    /// Seconds to wait when probing the sold-out indicator
    pub indicator_timeout_secs: u64,
    /// Milliseconds allowed for the page to settle after a UI action
    pub settle_ms: u64,
    /// Seconds to wait for a page transition to complete
    pub page_load_timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            container_timeout_secs: 10,
            indicator_timeout_secs: 2,
            settle_ms: 1000,
            page_load_timeout_secs: 10,
        }
    }
}
