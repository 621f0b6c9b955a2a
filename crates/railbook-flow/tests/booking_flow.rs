//! End-to-end booking flow: one-way Madrid-Atocha to Barcelona-Sants
//! with basic fare, asserting the passenger details page is reached
//! with a ticket priced inside the configured window.

use railbook_core::SuiteConfig;
use railbook_flow::BookingScenario;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

#[tokio::test]
#[ignore = "Requires Chromium and network access to the booking site"]
async fn test_purchase_one_way_ticket_basic_fare() {
    init_tracing();

    let config = SuiteConfig::load_with_env().expect("load config");
    let min = config.pricing.min;
    let max = config.pricing.max;

    let scenario = BookingScenario::launch(config).await.expect("launch browser");

    let result = scenario.run().await;
    let report = match result {
        Ok(report) => {
            scenario.close().await;
            report
        }
        Err(e) => {
            scenario.close().await;
            panic!("booking scenario failed: {e}");
        }
    };

    assert!(report.offers_seen > 0, "No tickets found in search results");
    assert!(
        report.selected_price >= min && report.selected_price <= max,
        "Selected ticket priced {} outside range {}-{}",
        report.selected_price,
        min,
        max
    );
    assert!(
        report.reached_passenger_page,
        "Failed to reach passenger details page (ended on {})",
        report.final_url
    );
}
