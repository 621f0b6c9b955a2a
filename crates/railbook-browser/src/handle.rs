use crate::error::{BrowserError, Result};
use chromiumoxide::Element;

/// Opaque handle to a DOM element snapshotted from the page.
///
/// Handles stay valid only as long as the page they were captured from;
/// a navigation or re-render invalidates them, which is why offer lists
/// are rebuilt on every polling attempt.
pub struct ElementHandle {
    inner: Element,
}

impl ElementHandle {
    pub(crate) fn new(inner: Element) -> Self {
        Self { inner }
    }

    /// Scroll the element into view and click it.
    pub async fn click(&self) -> Result<()> {
        self.inner
            .scroll_into_view()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        self.inner
            .click()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    /// Text content of the element itself.
    pub async fn text(&self) -> Result<String> {
        let text = self
            .inner
            .inner_text()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    /// Text content of the first descendant matching `selector`.
    ///
    /// Returns `Ok(None)` when no such descendant exists; the caller
    /// decides whether a missing sub-element is an error.
    pub async fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let Ok(child) = self.inner.find_element(selector).await else {
            return Ok(None);
        };
        let text = child
            .inner_text()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(Some(text.unwrap_or_default()))
    }

    /// Read an attribute of the element.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }
}
