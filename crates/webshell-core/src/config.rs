//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use webshell_navigation::HomeScope;

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_HOME_URL: &str = "https://drishyacity.netlify.app";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10; Mobile) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36 DrishyacityApp/1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// The one site this shell displays
    pub home_url: String,
    /// Connectivity poll cadence
    pub poll_interval_ms: u64,
    /// Delay before the splash screen is dismissed
    pub splash_delay_ms: u64,
    /// How long an off-domain navigation is watched for failures
    pub drift_watchdog_ms: u64,
    /// How long the refreshing indicator stays up after a retry
    pub refresh_debounce_ms: u64,
    /// Reachability probe target; the home URL when unset
    pub probe_url: Option<String>,
    pub probe_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home_url: DEFAULT_HOME_URL.to_string(),
            poll_interval_ms: 3_000,
            splash_delay_ms: 2_000,
            drift_watchdog_ms: 5_000,
            refresh_debounce_ms: 1_000,
            probe_url: None,
            probe_timeout_ms: 6_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ShellConfig {
    /// Read a TOML file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        tracing::info!(path = %path.display(), home = %config.home_url, "Loaded config");

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ShellConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        HomeScope::new(&self.home_url)?;

        let intervals = [
            ("poll_interval_ms", self.poll_interval_ms),
            ("splash_delay_ms", self.splash_delay_ms),
            ("drift_watchdog_ms", self.drift_watchdog_ms),
            ("refresh_debounce_ms", self.refresh_debounce_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(CoreError::Config(format!("{} must be greater than zero", name)));
            }
        }

        Ok(())
    }

    pub fn probe_target(&self) -> &str {
        self.probe_url.as_deref().unwrap_or(&self.home_url)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn splash_delay(&self) -> Duration {
        Duration::from_millis(self.splash_delay_ms)
    }

    pub fn drift_watchdog(&self) -> Duration {
        Duration::from_millis(self.drift_watchdog_ms)
    }

    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}
