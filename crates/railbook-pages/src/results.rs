//! Search results page: offer polling, extraction, and selection.

use crate::error::{PageError, Result};
use crate::locators::results;
use crate::offers::{self, OfferSource, PollingPolicy, TicketOffer};
use async_trait::async_trait;
use railbook_browser::{BrowserEngine, BrowserError, ElementHandle};
use std::sync::Arc;
use std::time::Duration;

const INDICATOR_PROBE: Duration = Duration::from_secs(3);

/// Page object for the search results page.
///
/// Offers may take several attempts (with an intervening date advance)
/// to appear; the retry loop itself lives in [`crate::offers`] and
/// reaches this page through the [`OfferSource`] seam.
pub struct ResultsPage {
    engine: Arc<BrowserEngine>,
    policy: PollingPolicy,
}

impl ResultsPage {
    pub fn new(engine: Arc<BrowserEngine>, policy: PollingPolicy) -> Self {
        Self { engine, policy }
    }

    /// Early check after landing: if the sold-out message is already up,
    /// advance to the next day before polling starts.
    pub async fn ensure_results_loaded(&self) {
        if self
            .engine
            .is_visible(results::NO_OFFERS, INDICATOR_PROBE)
            .await
        {
            tracing::info!("No tickets available, trying next date");
            if let Err(e) = self.engine.click(results::NEXT_DAY).await {
                tracing::debug!("Could not advance the date: {}", e);
            }
            self.settle().await;
        }
    }

    /// Poll for offers with the page's retry policy.
    pub async fn wait_for_offers(&self) -> Result<Vec<TicketOffer<ElementHandle>>> {
        offers::wait_for_offers(self, &self.policy).await
    }

    /// Number of travel option rows currently displayed.
    pub async fn available_offer_count(&self) -> usize {
        self.engine
            .find_elements(results::TRAVEL_OPTION)
            .await
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    /// Extract price and duration from one travel option row.
    ///
    /// Never fails: a missing price gets one recovery attempt (advance
    /// the date, settle, re-read), after which it degrades to `"0"`;
    /// a missing duration degrades to empty.
    pub async fn extract_offer(&self, handle: ElementHandle) -> TicketOffer<ElementHandle> {
        let raw_price = match self.read_price(&handle).await {
            Some(text) => text,
            None => {
                tracing::warn!("Price not found in offer, advancing date to load more data");
                if let Err(e) = self.engine.click(results::NEXT_DAY).await {
                    tracing::debug!("Could not advance the date: {}", e);
                }
                self.settle().await;
                self.read_price(&handle).await.unwrap_or_else(|| "0".to_string())
            }
        };

        let raw_duration = match handle.text_of(results::DURATION).await {
            Ok(Some(text)) => text.trim().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::debug!("Duration read failed: {}", e);
                String::new()
            }
        };

        let offer = TicketOffer::from_raw(raw_price, raw_duration, handle);
        tracing::debug!(
            "Offer details - price: {:.2}, duration: {}",
            offer.price,
            offer.raw_duration
        );
        offer
    }

    /// Click an offer and wait for the fare step to come up.
    pub async fn select_offer(&self, offer: &TicketOffer<ElementHandle>) -> Result<()> {
        tracing::info!("Selecting ticket priced {:.2}", offer.price);
        offer
            .handle
            .click()
            .await
            .map_err(|e| PageError::SelectionFailed {
                reason: format!("offer click failed: {e}"),
            })?;
        self.settle().await;
        self.engine
            .wait_for_page_load(self.policy.page_load_timeout)
            .await
            .map_err(|e| PageError::SelectionFailed {
                reason: format!("page did not transition after selection: {e}"),
            })?;
        Ok(())
    }

    async fn read_price(&self, handle: &ElementHandle) -> Option<String> {
        match handle.text_of(results::PRICE).await {
            Ok(Some(text)) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Price read failed: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl OfferSource for ResultsPage {
    type Handle = ElementHandle;

    async fn await_offers_visible(&self, timeout: Duration) -> bool {
        self.engine.is_visible(results::TRAVEL_OPTION, timeout).await
    }

    async fn snapshot_offers(
        &self,
    ) -> std::result::Result<Vec<TicketOffer<ElementHandle>>, BrowserError> {
        let rows = self.engine.find_elements(results::TRAVEL_OPTION).await?;
        let mut extracted = Vec::with_capacity(rows.len());
        for row in rows {
            extracted.push(self.extract_offer(row).await);
        }
        Ok(extracted)
    }

    async fn sold_out_visible(&self, timeout: Duration) -> bool {
        self.engine.is_visible(results::NO_OFFERS, timeout).await
    }

    async fn advance_day(&self) -> std::result::Result<(), BrowserError> {
        self.engine.click(results::NEXT_DAY).await
    }

    async fn settle(&self) {
        // The results pane shows a spinner while reloading; waiting for
        // it to clear is the real settle condition.
        self.engine
            .wait_for_hidden(results::LOADING_INDICATOR, self.policy.settle)
            .await;
        self.engine.settle(self.policy.settle).await;
    }
}
