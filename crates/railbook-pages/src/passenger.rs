//! Passenger details page: the scenario's success condition.

use crate::locators::passenger;
use railbook_browser::BrowserEngine;
use std::sync::Arc;
use std::time::Duration;

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const FORM_TIMEOUT: Duration = Duration::from_secs(5);

/// URL fragments that mark the passenger/purchase step of the flow.
const URL_KEYWORDS: [&str; 4] = ["passenger", "viajero", "datos", "compra"];

/// Page object for the passenger details page.
pub struct PassengerDetailsPage {
    engine: Arc<BrowserEngine>,
}

impl PassengerDetailsPage {
    pub fn new(engine: Arc<BrowserEngine>) -> Self {
        Self { engine }
    }

    /// Check whether the passenger details page has been reached.
    ///
    /// The page is considered loaded when the URL carries a passenger
    /// keyword or a passenger form element is visible. Never fails;
    /// probe errors report `false`.
    pub async fn is_loaded(&self) -> bool {
        if let Err(e) = self.engine.wait_for_page_load(PAGE_TIMEOUT).await {
            tracing::debug!("Passenger page still loading: {}", e);
        }

        let url = self.engine.current_url().await.unwrap_or_default();
        let url_indicates = url_indicates_passenger_page(&url);

        let form_visible = self.engine.is_visible(passenger::FORM, FORM_TIMEOUT).await;

        tracing::info!(
            "Passenger page check - URL indicates: {}, form visible: {}",
            url_indicates,
            form_visible
        );
        url_indicates || form_visible
    }

    /// Page heading text, empty when absent.
    pub async fn title(&self) -> String {
        self.engine
            .extract_text(passenger::TITLE)
            .await
            .unwrap_or_default()
    }
}

fn url_indicates_passenger_page(url: &str) -> bool {
    let url = url.to_lowercase();
    URL_KEYWORDS.iter().any(|keyword| url.contains(keyword))
}
