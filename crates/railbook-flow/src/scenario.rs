//! The one linear scenario this suite automates: search, poll results,
//! pick an in-range ticket, choose the fare, reach passenger details.

use railbook_browser::{BrowserEngine, BrowserError, LaunchProfile};
use railbook_core::{PriceRange, RailbookError, SuiteConfig};
use railbook_pages::{
    find_offer_in_range, FareSelectionPage, HomePage, PageError, PassengerDetailsPage,
    PollingPolicy, ResultsPage,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the booking scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("configuration error: {0}")]
    Config(#[from] railbook_core::ConfigError),

    #[error("core error: {0}")]
    Core(#[from] RailbookError),

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("page error: {0}")]
    Page(#[from] PageError),
}

/// What a scenario run observed, for assertions and logs.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Unique identifier of this run, also used for artifact names
    pub run_id: String,
    /// RFC 3339 timestamp of when the run started
    pub started_at: String,
    /// Offers visible when polling succeeded
    pub offers_seen: usize,
    /// Parsed price of the selected ticket
    pub selected_price: f64,
    /// Duration text of the selected ticket, possibly empty
    pub selected_duration: String,
    /// URL the browser ended on
    pub final_url: String,
    /// Whether the passenger details page was reached
    pub reached_passenger_page: bool,
}

/// Drives the full ticket-purchase flow through one browser session.
pub struct BookingScenario {
    config: SuiteConfig,
    engine: Arc<BrowserEngine>,
    home: HomePage,
    results: ResultsPage,
    fare: FareSelectionPage,
    passenger: PassengerDetailsPage,
    run_id: String,
}

impl BookingScenario {
    /// Validate the configuration and launch a browser session.
    pub async fn launch(config: SuiteConfig) -> Result<Self, ScenarioError> {
        config.validate()?;

        let profile = LaunchProfile::randomized()
            .with_headless(config.browser.headless)
            .with_window_size(config.browser.window_width, config.browser.window_height);
        let engine = Arc::new(BrowserEngine::with_profile(profile).await?);

        let policy = PollingPolicy::from(&config.polling);
        let home = HomePage::new(Arc::clone(&engine));
        let results = ResultsPage::new(Arc::clone(&engine), policy);
        let fare = FareSelectionPage::new(Arc::clone(&engine));
        let passenger = PassengerDetailsPage::new(Arc::clone(&engine));

        Ok(Self {
            config,
            engine,
            home,
            results,
            fare,
            passenger,
            run_id: new_run_id(),
        })
    }

    /// Run the scenario end to end.
    ///
    /// On failure a full-page screenshot is saved to the artifacts
    /// directory before the error is surfaced.
    pub async fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        match self.drive().await {
            Ok(report) => Ok(report),
            Err(e) => {
                self.capture_failure_screenshot().await;
                Err(e)
            }
        }
    }

    async fn drive(&self) -> Result<ScenarioReport, ScenarioError> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let journey = &self.config.journey;
        tracing::info!(
            "Starting booking scenario {}: {} -> {}, {} fare",
            self.run_id,
            journey.origin,
            journey.destination,
            journey.fare
        );

        self.home.open(&journey.base_url).await?;
        self.home.accept_cookies().await;
        self.home.wait_until_ready().await?;
        self.home.search(journey).await?;

        self.results.ensure_results_loaded().await;
        let offers = self.results.wait_for_offers().await?;
        let offers_seen = offers.len();
        tracing::info!("Found {} available tickets", offers_seen);

        let range = PriceRange::new(self.config.pricing.min, self.config.pricing.max)?;
        let offer = find_offer_in_range(offers, &range)?;
        tracing::info!(
            "Selected ticket - price: {:.2}, duration: {}",
            offer.price,
            offer.raw_duration
        );
        let selected_price = offer.price;
        let selected_duration = offer.raw_duration.clone();

        self.results.select_offer(&offer).await?;

        let fare = journey.fare;
        if !self.fare.fare_visible(fare).await {
            return Err(ScenarioError::Page(PageError::SelectionFailed {
                reason: format!("{fare} fare option is not visible"),
            }));
        }
        self.fare.choose_fare(fare).await?;
        self.fare.confirm_selection().await?;
        self.fare.dismiss_fare_upgrade().await;

        let reached_passenger_page = self.passenger.is_loaded().await;
        let final_url = self.engine.current_url().await.unwrap_or_default();

        if reached_passenger_page {
            tracing::info!("Reached passenger details page at {}", final_url);
        } else {
            tracing::warn!("Passenger details page not confirmed, ended on {}", final_url);
        }

        Ok(ScenarioReport {
            run_id: self.run_id.clone(),
            started_at,
            offers_seen,
            selected_price,
            selected_duration,
            final_url,
            reached_passenger_page,
        })
    }

    async fn capture_failure_screenshot(&self) {
        let Ok(dir) = SuiteConfig::artifacts_dir() else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::debug!("Could not create artifacts dir: {}", e);
            return;
        }

        match self.engine.screenshot().await {
            Ok(png) => {
                let path = dir.join(format!("failure-{}.png", self.run_id));
                match std::fs::write(&path, png) {
                    Ok(()) => {
                        tracing::warn!("Scenario failed, screenshot saved to {}", path.display());
                    }
                    Err(e) => tracing::debug!("Could not write screenshot: {}", e),
                }
            }
            Err(e) => tracing::debug!("Failure screenshot unavailable: {}", e),
        }
    }

    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Shut the browser down.
    pub async fn close(self) {
        let Self {
            engine,
            home,
            results,
            fare,
            passenger,
            ..
        } = self;
        drop((home, results, fare, passenger));
        match Arc::try_unwrap(engine) {
            Ok(engine) => engine.close().await,
            Err(_) => tracing::debug!("Browser engine still shared, leaving it running"),
        }
    }
}

fn new_run_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = new_run_id();
        let b = new_run_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_report_serializes() {
        let report = ScenarioReport {
            run_id: new_run_id(),
            started_at: "2026-08-06T10:00:00Z".to_string(),
            offers_seen: 4,
            selected_price: 55.0,
            selected_duration: "2 h 30 min".to_string(),
            final_url: "https://venta.renfe.com/vol/datosViajero.do".to_string(),
            reached_passenger_page: true,
        };

        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"offers_seen\":4"));
        assert!(json.contains("\"reached_passenger_page\":true"));
    }
}
