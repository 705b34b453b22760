//! Browser driver abstraction
//!
//! [`Driver`] is the capability the page objects need from a browser:
//! navigate, locate, click, type, wait and read. [`Page`] pairs a shared
//! driver with the configured [`Timeouts`] so page objects never pass
//! timeouts around themselves.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Timeouts;
use crate::error::E2eResult;
use crate::locator::Locator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Load,
    DomContentLoaded,
    NetworkIdle,
}

/// Browser automation capability
///
/// Implementations must apply operations in call order; page objects rely
/// on a click being delivered before the next read.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to `path`, relative to the application base URL
    async fn goto(&self, path: &str, timeout: Duration) -> E2eResult<()>;

    async fn click(&self, locator: &Locator, timeout: Duration) -> E2eResult<()>;

    /// Type `text` one key at a time
    async fn press_sequentially(
        &self,
        locator: &Locator,
        text: &str,
        delay: Duration,
        timeout: Duration,
    ) -> E2eResult<()>;

    async fn clear(&self, locator: &Locator, timeout: Duration) -> E2eResult<()>;

    async fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration) -> E2eResult<()>;

    async fn wait_for_url(&self, path: &str, timeout: Duration) -> E2eResult<()>;

    /// Wait until the JavaScript `expression` is truthy in the page
    async fn wait_for_function(&self, expression: &str, timeout: Duration) -> E2eResult<()>;

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> E2eResult<()>;

    /// Text content of the element; `None` when it has none
    async fn text_content(&self, locator: &Locator, timeout: Duration) -> E2eResult<Option<String>>;

    async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
        timeout: Duration,
    ) -> E2eResult<Option<String>>;

    async fn input_value(&self, locator: &Locator, timeout: Duration) -> E2eResult<String>;

    /// Number of elements currently matching
    async fn count(&self, locator: &Locator) -> E2eResult<usize>;

    /// One locator per current match, in document order
    async fn all(&self, locator: &Locator) -> E2eResult<Vec<Locator>> {
        let count = self.count(locator).await?;
        Ok((0..count).map(|i| locator.nth(i)).collect())
    }
}

/// A browser tab shared by every page object of a journey
#[derive(Clone)]
pub struct Page {
    driver: Arc<dyn Driver>,
    timeouts: Timeouts,
}

impl Page {
    pub fn new(driver: Arc<dyn Driver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub async fn goto(&self, path: &str) -> E2eResult<()> {
        self.driver.goto(path, self.timeouts.navigation()).await
    }

    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.driver.click(locator, self.timeouts.action()).await
    }

    /// Clear the input then type `text` with the configured key delay
    pub async fn fill_sequentially(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.driver.clear(locator, self.timeouts.action()).await?;
        self.type_sequentially(locator, text).await
    }

    pub async fn type_sequentially(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.driver
            .press_sequentially(
                locator,
                text,
                self.timeouts.typing_delay(),
                self.timeouts.action(),
            )
            .await
    }

    pub async fn wait_visible(&self, locator: &Locator) -> E2eResult<()> {
        self.driver
            .wait_for(locator, WaitState::Visible, self.timeouts.action())
            .await
    }

    pub async fn wait_hidden(&self, locator: &Locator) -> E2eResult<()> {
        self.driver
            .wait_for(locator, WaitState::Hidden, self.timeouts.action())
            .await
    }

    pub async fn wait_for_url(&self, path: &str) -> E2eResult<()> {
        self.driver.wait_for_url(path, self.timeouts.navigation()).await
    }

    pub async fn text_content(&self, locator: &Locator) -> E2eResult<Option<String>> {
        self.driver.text_content(locator, self.timeouts.action()).await
    }

    pub async fn get_attribute(&self, locator: &Locator, name: &str) -> E2eResult<Option<String>> {
        self.driver
            .get_attribute(locator, name, self.timeouts.action())
            .await
    }

    pub async fn input_value(&self, locator: &Locator) -> E2eResult<String> {
        self.driver.input_value(locator, self.timeouts.action()).await
    }

    pub async fn all(&self, locator: &Locator) -> E2eResult<Vec<Locator>> {
        self.driver.all(locator).await
    }
}
