use railbook_browser::{BrowserActions, BrowserEngine, LaunchProfile};
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_browser_engine_creation() {
    let engine = BrowserEngine::new().await;
    assert!(engine.is_ok(), "Failed to create browser engine");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_navigation_and_text_extraction() {
    let engine = BrowserEngine::new().await.unwrap();

    engine.navigate("https://example.com").await.unwrap();
    engine
        .wait_for_selector("h1", Duration::from_secs(5))
        .await
        .unwrap();

    let heading = engine.extract_text("h1").await.unwrap();
    assert!(heading.contains("Example"));

    let url = engine.current_url().await.unwrap();
    assert!(url.contains("example.com"));

    engine.close().await;
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_visibility_probes() {
    let engine = BrowserEngine::with_profile(LaunchProfile::randomized())
        .await
        .unwrap();

    engine.navigate("https://example.com").await.unwrap();

    assert!(engine.is_visible("h1", Duration::from_secs(5)).await);
    assert!(
        !engine
            .is_visible("#no-such-element", Duration::from_millis(500))
            .await
    );
    assert!(
        engine
            .wait_for_hidden("#no-such-element", Duration::from_millis(500))
            .await
    );

    engine.close().await;
}
