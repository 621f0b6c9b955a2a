use crate::engine::BrowserEngine;
use crate::error::Result;
use std::time::Duration;

/// Browser actions for automation
#[async_trait::async_trait]
pub trait BrowserActions {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Fill a form field by selector
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Wait for a selector to become visible
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Extract text from an element
    async fn extract_text(&self, selector: &str) -> Result<String>;

    /// Take a screenshot
    async fn screenshot(&self) -> Result<Vec<u8>>;
}

#[async_trait::async_trait]
impl BrowserActions for BrowserEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        BrowserEngine::navigate(self, url).await
    }

    async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        BrowserEngine::fill_field(self, selector, value).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        BrowserEngine::click(self, selector).await
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        BrowserEngine::wait_for_selector(self, selector, Duration::from_millis(timeout_ms)).await
    }

    async fn extract_text(&self, selector: &str) -> Result<String> {
        BrowserEngine::extract_text(self, selector).await
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        BrowserEngine::screenshot(self).await
    }
}
