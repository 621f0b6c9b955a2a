//! Fare selection step: tier choice, confirmation, upgrade promo.

use crate::error::Result;
use crate::locators::fare;
use railbook_browser::BrowserEngine;
use railbook_core::FareType;
use std::sync::Arc;
use std::time::Duration;

const FARE_TIMEOUT: Duration = Duration::from_secs(5);
const PROMO_TIMEOUT: Duration = Duration::from_secs(3);
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE: Duration = Duration::from_millis(500);

/// Page object for the fare selection step shown after picking a ticket.
pub struct FareSelectionPage {
    engine: Arc<BrowserEngine>,
}

impl FareSelectionPage {
    pub fn new(engine: Arc<BrowserEngine>) -> Self {
        Self { engine }
    }

    /// Is the given fare tier visible?
    pub async fn fare_visible(&self, fare: FareType) -> bool {
        self.engine
            .is_text_visible(fare::FARE_LABEL, fare.site_label(), FARE_TIMEOUT)
            .await
    }

    /// Click the given fare tier.
    pub async fn choose_fare(&self, fare: FareType) -> Result<()> {
        tracing::info!("Clicking {} fare", fare);
        self.engine
            .click_text(fare::FARE_LABEL, fare.site_label())
            .await?;
        self.engine.settle(SETTLE).await;
        self.engine.wait_for_page_load(PAGE_TIMEOUT).await?;
        Ok(())
    }

    /// Confirm the fare and move on to passenger details.
    pub async fn confirm_selection(&self) -> Result<()> {
        tracing::info!("Clicking continue button");
        self.engine.click(fare::CONFIRM_BUTTON).await?;
        self.engine.settle(SETTLE).await;
        self.engine.wait_for_page_load(PAGE_TIMEOUT).await?;
        Ok(())
    }

    /// Accept the fare-upgrade promo modal if it appears.
    ///
    /// The modal is optional; absence or a failed click never aborts
    /// the scenario.
    pub async fn dismiss_fare_upgrade(&self) -> bool {
        if !self
            .engine
            .is_visible(fare::UPGRADE_ACCEPT, PROMO_TIMEOUT)
            .await
        {
            tracing::debug!("No fare upgrade popup");
            return false;
        }

        tracing::info!("Fare upgrade popup detected, clicking accept");
        match self.engine.click(fare::UPGRADE_ACCEPT).await {
            Ok(()) => {
                self.engine.settle(SETTLE).await;
                true
            }
            Err(e) => {
                tracing::debug!("Fare upgrade accept failed: {}", e);
                false
            }
        }
    }
}
