//! Home/search page: journey type, stations, and search submission.

use crate::error::Result;
use crate::locators::home;
use railbook_browser::BrowserEngine;
use railbook_core::JourneyConfig;
use std::sync::Arc;
use std::time::Duration;

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const PICKER_TIMEOUT: Duration = Duration::from_secs(7);
const DROPDOWN_TIMEOUT: Duration = Duration::from_secs(5);
const SETTLE: Duration = Duration::from_millis(500);

/// Page object for the booking site's home/search page.
pub struct HomePage {
    engine: Arc<BrowserEngine>,
}

impl HomePage {
    pub fn new(engine: Arc<BrowserEngine>) -> Self {
        Self { engine }
    }

    /// Navigate to the site entry point and wait for the initial load.
    pub async fn open(&self, base_url: &str) -> Result<()> {
        self.engine.navigate(base_url).await?;
        self.engine.wait_for_page_load(PAGE_TIMEOUT).await?;
        Ok(())
    }

    /// Accept the cookie consent banner if present.
    ///
    /// The banner is optional; a missing banner or a failed click never
    /// aborts the scenario.
    pub async fn accept_cookies(&self) -> bool {
        if !self
            .engine
            .is_visible(home::ACCEPT_COOKIES, PAGE_TIMEOUT)
            .await
        {
            tracing::info!("Cookie banner not present or already accepted");
            return false;
        }

        tracing::info!("Cookie banner found, accepting cookies");
        match self.engine.click(home::ACCEPT_COOKIES).await {
            Ok(()) => {
                self.engine.settle(SETTLE).await;
                tracing::info!("Cookies accepted");
                true
            }
            Err(e) => {
                tracing::debug!("Cookie banner click failed: {}", e);
                false
            }
        }
    }

    /// Wait until the search form is fully usable.
    pub async fn wait_until_ready(&self) -> Result<()> {
        self.engine
            .wait_for_selector(home::DATE_INPUT, PAGE_TIMEOUT)
            .await?;
        self.engine
            .wait_for_selector(home::ORIGIN_INPUT, PAGE_TIMEOUT)
            .await?;
        self.engine
            .wait_for_selector(home::DESTINATION_INPUT, PAGE_TIMEOUT)
            .await?;
        self.engine
            .wait_for_selector(home::SEARCH_BUTTON, PAGE_TIMEOUT)
            .await?;
        tracing::info!("Home page fully loaded");
        Ok(())
    }

    /// Select the one-way journey type.
    ///
    /// The radio lives inside the date picker, so the picker is opened
    /// first.
    pub async fn select_one_way(&self) -> Result<()> {
        tracing::info!("Selecting one-way journey");
        self.engine.click(home::DATE_INPUT).await?;
        self.engine
            .wait_for_selector(home::ONE_WAY_TAB, PICKER_TIMEOUT)
            .await?;
        if !self
            .engine
            .is_text_visible(home::JOURNEY_LABEL, home::ONE_WAY_TEXT, PICKER_TIMEOUT)
            .await
        {
            tracing::debug!("One-way radio not visible yet, clicking anyway");
        }
        self.engine
            .click_text(home::JOURNEY_LABEL, home::ONE_WAY_TEXT)
            .await?;
        self.engine.settle(SETTLE).await;
        tracing::info!("One-way journey selected");
        Ok(())
    }

    /// Type into the origin station input and wait for suggestions.
    pub async fn fill_origin(&self, station: &str) -> Result<()> {
        tracing::info!("Filling origin station: {}", station);
        self.engine.fill_field(home::ORIGIN_INPUT, station).await?;
        self.engine
            .wait_for_selector(home::STATION_OPTION, DROPDOWN_TIMEOUT)
            .await?;
        Ok(())
    }

    /// Type into the destination station input.
    pub async fn fill_destination(&self, station: &str) -> Result<()> {
        tracing::info!("Filling destination station: {}", station);
        self.engine
            .fill_field(home::DESTINATION_INPUT, station)
            .await?;
        Ok(())
    }

    /// Pick a station suggestion from the dropdown by its visible label.
    pub async fn choose_station(&self, option_label: &str) -> Result<()> {
        tracing::info!("Selecting from dropdown: {}", option_label);
        if !self
            .engine
            .is_text_visible(home::STATION_OPTION, option_label, DROPDOWN_TIMEOUT)
            .await
        {
            tracing::debug!("Suggestion '{}' not visible yet, clicking anyway", option_label);
        }
        self.engine
            .click_text(home::STATION_OPTION, option_label)
            .await?;
        self.engine.settle(SETTLE).await;
        tracing::info!("Selected: {}", option_label);
        Ok(())
    }

    /// Submit the search and wait for the results page to load.
    pub async fn submit_search(&self) -> Result<()> {
        tracing::info!("Clicking search button");
        self.engine.click(home::SEARCH_BUTTON).await?;
        self.engine.settle(SETTLE).await;
        self.engine.wait_for_page_load(PAGE_TIMEOUT).await?;
        tracing::info!("Search submitted");
        Ok(())
    }

    /// Perform the complete search described by `journey`.
    pub async fn search(&self, journey: &JourneyConfig) -> Result<()> {
        self.select_one_way().await?;
        self.fill_origin(&journey.origin).await?;
        self.choose_station(&journey.origin_option).await?;
        self.fill_destination(&journey.destination).await?;
        self.choose_station(&journey.destination_option).await?;
        self.submit_search().await
    }
}
