//! Harness configuration
//!
//! Defaults match a local `mix phx.server` on port 4000. A YAML file can
//! override any field, and `FORTYMM_E2E_*` environment variables override the
//! handful of knobs CI usually needs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{Browser, PlaywrightConfig};
use crate::server::ServerConfig;

pub const ENV_BASE_URL: &str = "FORTYMM_E2E_BASE_URL";
pub const ENV_BROWSER: &str = "FORTYMM_E2E_BROWSER";
pub const ENV_HEADLESS: &str = "FORTYMM_E2E_HEADLESS";
pub const ENV_TIMEOUT_MS: &str = "FORTYMM_E2E_TIMEOUT_MS";
pub const ENV_OUTPUT_DIR: &str = "FORTYMM_E2E_OUTPUT_DIR";

/// Complete harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Browser session settings, including the application base URL
    pub playwright: PlaywrightConfig,

    /// Per-operation bounds
    pub timeouts: Timeouts,

    /// Server to spawn before the run (None = use an already running one)
    pub server: Option<ServerConfig>,

    /// Output directory for journey results
    pub output_dir: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            playwright: PlaywrightConfig::default(),
            timeouts: Timeouts::default(),
            server: None,
            output_dir: PathBuf::from("test-results"),
        }
    }
}

impl HarnessConfig {
    /// Parse a configuration from YAML
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Parse a configuration from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> E2eResult<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        &self.playwright.base_url
    }

    /// Apply `FORTYMM_E2E_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.playwright.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(browser) = lookup(ENV_BROWSER) {
            self.playwright.browser = browser.parse()?;
        }

        if let Some(headless) = lookup(ENV_HEADLESS) {
            self.playwright.headless = parse_bool(ENV_HEADLESS, &headless)?;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            let ms = timeout.parse::<u64>().map_err(|e| {
                E2eError::Config(format!("{ENV_TIMEOUT_MS}={timeout}: {e}"))
            })?;
            self.timeouts.action_ms = ms;
            self.timeouts.readiness_ms = ms;
            self.timeouts.settle_ms = ms;
        }

        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }

        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(E2eError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

/// Bounds for driver operations and the mailbox settle poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Clicks, typing and element waits
    pub action_ms: u64,

    /// LiveView connection wait
    pub readiness_ms: u64,

    /// Waiting for the selected email to change after clicking a link
    pub settle_ms: u64,

    /// Delay between settle poll attempts
    pub poll_interval_ms: u64,

    /// Page loads
    pub navigation_ms: u64,

    /// Delay between key presses when typing sequentially
    pub typing_delay_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: 5_000,
            readiness_ms: 5_000,
            settle_ms: 5_000,
            poll_interval_ms: 100,
            navigation_ms: 30_000,
            typing_delay_ms: 10,
        }
    }
}

impl Timeouts {
    pub fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    pub fn readiness(&self) -> Duration {
        Duration::from_millis(self.readiness_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("unknown browser '{other}'"))),
        }
    }
}
