//! Example: run the full booking scenario against the live site.
//!
//! Requires Chromium and network access. Headed mode for debugging:
//! `RAILBOOK_HEADLESS=false cargo run --example run-booking`

use railbook_core::SuiteConfig;
use railbook_flow::BookingScenario;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = SuiteConfig::load_with_env()?;
    let scenario = BookingScenario::launch(config).await?;

    let result = scenario.run().await;
    scenario.close().await;

    let report = result?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.reached_passenger_page {
        return Err("did not reach the passenger details page".into());
    }

    Ok(())
}
