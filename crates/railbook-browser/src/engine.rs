use crate::error::{BrowserError, Result};
use crate::handle::ElementHandle;
use crate::profile::LaunchProfile;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::stream::StreamExt;
use std::time::Duration;
use tokio::time::Instant;

/// Interval between predicate probes inside bounded waits.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser automation engine.
///
/// Owns one Chromium session and one page. All waits are bounded
/// predicate polls with an explicit timeout; nothing blocks forever.
pub struct BrowserEngine {
    browser: Browser,
    page: Page,
}

impl BrowserEngine {
    /// Launch a browser with a randomized default profile.
    pub async fn new() -> Result<Self> {
        Self::with_profile(LaunchProfile::randomized()).await
    }

    /// Launch a browser with a specific profile.
    pub async fn with_profile(profile: LaunchProfile) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(profile.window_width, profile.window_height)
            .args(profile.chrome_args());

        if !profile.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Drain CDP events for the lifetime of the session
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        Ok(Self { browser, page })
    }

    /// Navigate to a URL and wait for the navigation to complete.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
        Ok(())
    }

    /// Wait until an element matching `selector` is visible.
    ///
    /// Polls the DOM every [`POLL_INTERVAL`] until the deadline, then
    /// fails with [`BrowserError::Timeout`].
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.probe_visible(selector).await? {
                tracing::debug!("Element visible: {}", selector);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "selector `{selector}` not visible within {timeout:?}"
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Check whether an element becomes visible within `timeout`.
    ///
    /// Unlike [`wait_for_selector`](Self::wait_for_selector) this never
    /// fails: probe errors and deadline expiry both report `false`.
    pub async fn is_visible(&self, selector: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.probe_visible(selector).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!("Visibility probe for `{}` failed: {}", selector, e);
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until no element matching `selector` is visible.
    ///
    /// Returns `true` if the element disappeared (or never existed)
    /// before the deadline.
    pub async fn wait_for_hidden(&self, selector: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match self.probe_visible(selector).await {
                Ok(false) => return true,
                Ok(true) => {}
                Err(e) => {
                    tracing::debug!("Visibility probe for `{}` failed: {}", selector, e);
                    return true;
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Check whether an element matching `selector` with visible text
    /// containing `text` appears within `timeout`.
    pub async fn is_text_visible(&self, selector: &str, text: &str, timeout: Duration) -> bool {
        let probe = text_probe_script(selector, text);
        let deadline = Instant::now() + timeout;
        loop {
            match self.eval_bool(&probe).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    tracing::debug!("Text probe for `{}` failed: {}", selector, e);
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Click the first visible element matching `selector`.
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.wait_for_selector(selector, Duration::from_secs(10))
            .await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .scroll_into_view()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        tracing::debug!("Clicked element: {}", selector);
        Ok(())
    }

    /// Click the first element matching `selector` whose text contains
    /// `text`.
    ///
    /// Selector languages cannot express text matching, so the lookup
    /// and click run inside the page.
    pub async fn click_text(&self, selector: &str, text: &str) -> Result<()> {
        let script = click_text_script(selector, text);
        let clicked = self.eval_bool(&script).await?;
        if clicked {
            tracing::debug!("Clicked `{}` matching text '{}'", selector, text);
            Ok(())
        } else {
            Err(BrowserError::SelectorNotFound(format!(
                "`{selector}` with text '{text}'"
            )))
        }
    }

    /// Clear an input field and type `value` into it.
    pub async fn fill_field(&self, selector: &str, value: &str) -> Result<()> {
        self.wait_for_selector(selector, Duration::from_secs(10))
            .await?;
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;
        element
            .type_str(value)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        tracing::debug!("Filled `{}`", selector);
        Ok(())
    }

    /// Snapshot all elements currently matching `selector`.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<ElementHandle>> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(elements.into_iter().map(ElementHandle::new).collect())
    }

    /// Read the text content of the first element matching `selector`.
    pub async fn extract_text(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    /// Wait for `document.readyState` to report `complete`.
    pub async fn wait_for_page_load(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self
                .eval_string("document.readyState")
                .await
                .unwrap_or_default();
            if state == "complete" {
                tracing::debug!("Page fully loaded");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "page did not finish loading within {timeout:?}"
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Give the page a bounded window to settle after a UI action.
    ///
    /// Best-effort: an unsettled page after the deadline is not an error,
    /// the next bounded wait will surface any real problem.
    pub async fn settle(&self, timeout: Duration) {
        if self.wait_for_page_load(timeout).await.is_err() {
            tracing::debug!("Page still settling after {:?}", timeout);
        }
    }

    /// Current page URL.
    pub async fn current_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    /// Capture a full-page PNG screenshot.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    /// Shut the browser down.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed: {}", e);
        }
        let _ = self.browser.wait().await;
    }

    async fn eval_bool(&self, script: &str) -> Result<bool> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))
    }

    async fn eval_string(&self, script: &str) -> Result<String> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))?;
        result
            .into_value::<String>()
            .map_err(|e| BrowserError::EvaluationError(e.to_string()))
    }

    async fn probe_visible(&self, selector: &str) -> Result<bool> {
        self.eval_bool(&visibility_probe_script(selector)).await
    }
}

/// JS probe: is the first element matching the selector visible?
fn visibility_probe_script(selector: &str) -> String {
    format!(
        r"(function() {{
            const el = document.querySelector({sel});
            return !!(el && (el.offsetWidth || el.offsetHeight || el.getClientRects().length));
        }})()",
        sel = js_string(selector)
    )
}

/// JS probe: is an element matching the selector with matching text visible?
fn text_probe_script(selector: &str, text: &str) -> String {
    format!(
        r"(function() {{
            const needle = {needle};
            for (const el of document.querySelectorAll({sel})) {{
                if ((el.textContent || '').trim().includes(needle)) {{
                    if (el.offsetWidth || el.offsetHeight || el.getClientRects().length) {{
                        return true;
                    }}
                }}
            }}
            return false;
        }})()",
        needle = js_string(text),
        sel = js_string(selector)
    )
}

/// JS action: click the first element matching the selector whose text matches.
fn click_text_script(selector: &str, text: &str) -> String {
    format!(
        r"(function() {{
            const needle = {needle};
            for (const el of document.querySelectorAll({sel})) {{
                if ((el.textContent || '').trim().includes(needle)) {{
                    el.scrollIntoView();
                    el.click();
                    return true;
                }}
            }}
            return false;
        }})()",
        needle = js_string(text),
        sel = js_string(selector)
    )
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "''".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_probe_escapes_selector() {
        let script = visibility_probe_script(r#"button[type="submit"]"#);
        assert!(script.contains(r#""button[type=\"submit\"]""#));
        assert!(script.contains("querySelector"));
    }

    #[test]
    fn test_text_probe_carries_needle() {
        let script = text_probe_script("span", "B\u{e1}sico");
        assert!(script.contains("B\u{e1}sico"));
        assert!(script.contains("querySelectorAll"));
    }

    #[test]
    fn test_click_text_script_clicks() {
        let script = click_text_script("li[role=\"option\"]", "Barcelona-Sants");
        assert!(script.contains("el.click()"));
        assert!(script.contains("Barcelona-Sants"));
    }
}
