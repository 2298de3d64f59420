use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 40;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PAUSE_MS: u64 = 2_000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Tunables for one pipeline run. Every field has a default, so an empty
/// settings file (`{}`) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Root that relative product folders are resolved against. Empty means
    /// the working directory, with stored paths kept exactly as the folder.
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,
    /// Pause between two consecutive jobs.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default)]
    pub browser: BrowserSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Wait after the network went idle, for deferred client-side rendering.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Hard bound on one navigation, including the wait for network idle.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,
    /// Default CDP request timeout (covers redirects and slow servers).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Adds `--no-sandbox` / `--disable-setuid-sandbox`, needed inside most containers.
    #[serde(default = "default_true")]
    pub no_sandbox: bool,
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,
}

fn default_content_root() -> PathBuf {
    PathBuf::new()
}

fn default_pause_ms() -> u64 {
    DEFAULT_PAUSE_MS
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

fn default_navigation_timeout_secs() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            pause_ms: DEFAULT_PAUSE_MS,
            browser: BrowserSettings::default(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            headless: true,
            no_sandbox: true,
            chrome_executable: None,
        }
    }
}

impl RunSettings {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.browser.validate()
    }
}

impl BrowserSettings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.navigation_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "navigation_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "request_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.navigation_timeout_secs > self.request_timeout_secs {
            return Err(ConfigError::InvalidSetting {
                name: "navigation_timeout_secs".to_string(),
                reason: format!(
                    "must not exceed request_timeout_secs ({})",
                    self.request_timeout_secs
                ),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "user_agent".to_string(),
                reason: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
