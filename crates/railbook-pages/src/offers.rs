//! Offer polling, extraction, and selection logic.
//!
//! The results page renders asynchronously and may need the displayed
//! date advanced before any offers appear. This module owns that retry
//! loop, the best-effort price parsing, and the in-range scan. The page
//! itself is reached through the [`OfferSource`] seam so the loop can be
//! exercised without a browser.

use crate::error::{PageError, Result};
use async_trait::async_trait;
use railbook_browser::BrowserError;
use railbook_core::config::PollingConfig;
use railbook_core::PriceRange;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// A single bookable result row, snapshotted from the results page.
///
/// Offers are rebuilt on every polling attempt; the handle stays valid
/// only until the page re-renders.
#[derive(Debug, Clone)]
pub struct TicketOffer<H> {
    /// Price text as rendered, e.g. `"50,00 €"`
    pub raw_price: String,
    /// Duration text as rendered, possibly empty
    pub raw_duration: String,
    /// Parsed price; `0.0` when the raw text was unparseable
    pub price: f64,
    /// Opaque reference to the row element, used only for selection
    pub handle: H,
}

impl<H> TicketOffer<H> {
    /// Build an offer from raw texts, parsing the price best-effort.
    pub fn from_raw(raw_price: String, raw_duration: String, handle: H) -> Self {
        let price = parse_price(&raw_price);
        Self {
            raw_price,
            raw_duration,
            price,
            handle,
        }
    }
}

/// Retry behavior for the results page.
#[derive(Debug, Clone)]
pub struct PollingPolicy {
    /// Attempts before giving up
    pub max_attempts: u32,
    /// Wait for the offer container to become visible
    pub container_timeout: Duration,
    /// Wait when probing the sold-out indicator
    pub indicator_timeout: Duration,
    /// Settle window after a UI-affecting action
    pub settle: Duration,
    /// Wait for a page transition to complete
    pub page_load_timeout: Duration,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            container_timeout: Duration::from_secs(10),
            indicator_timeout: Duration::from_secs(2),
            settle: Duration::from_secs(1),
            page_load_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&PollingConfig> for PollingPolicy {
    fn from(config: &PollingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            container_timeout: Duration::from_secs(config.container_timeout_secs),
            indicator_timeout: Duration::from_secs(config.indicator_timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
        }
    }
}

/// The results page as the polling loop sees it.
///
/// Implemented by the real results page over the browser engine, and by
/// scripted fakes in tests.
#[async_trait]
pub trait OfferSource {
    /// Opaque handle type carried by extracted offers.
    type Handle: Send;

    /// Bounded wait for at least one offer container to be visible.
    ///
    /// A timeout is not an error: the attempt is simply treated as
    /// having zero offers.
    async fn await_offers_visible(&self, timeout: Duration) -> bool;

    /// Snapshot and extract every offer currently displayed, in DOM order.
    async fn snapshot_offers(&self)
        -> std::result::Result<Vec<TicketOffer<Self::Handle>>, BrowserError>;

    /// Is the "no offers available" indicator visible?
    async fn sold_out_visible(&self, timeout: Duration) -> bool;

    /// Advance the displayed date to the next day.
    async fn advance_day(&self) -> std::result::Result<(), BrowserError>;

    /// Bounded settle wait after a UI-affecting action.
    async fn settle(&self);
}

enum AttemptOutcome<H> {
    /// Offers present and the sold-out indicator absent.
    Ready(Vec<TicketOffer<H>>),
    /// Zero offers, or offers shadowed by the sold-out indicator.
    NotReady(Vec<TicketOffer<H>>),
}

/// Poll the results page until usable offers appear.
///
/// Runs up to `policy.max_attempts` attempts, advancing the displayed
/// date between attempts. An attempt succeeds when offers are present
/// and the sold-out indicator is absent. After exhausting all attempts
/// the freshest non-empty list seen is returned as a last resort;
/// only when even that list is empty does the call fail with
/// [`PageError::NoOffersAvailable`].
pub async fn wait_for_offers<S>(source: &S, policy: &PollingPolicy) -> Result<Vec<TicketOffer<S::Handle>>>
where
    S: OfferSource + Sync,
{
    tracing::info!("Waiting for ticket offers...");
    let mut last_seen: Vec<TicketOffer<S::Handle>> = Vec::new();

    for attempt in 1..=policy.max_attempts {
        match poll_once(source, policy).await {
            Ok(AttemptOutcome::Ready(offers)) => {
                tracing::info!("Attempt {}: found {} offers", attempt, offers.len());
                return Ok(offers);
            }
            Ok(AttemptOutcome::NotReady(offers)) => {
                tracing::info!(
                    "Attempt {}: {} offers, results not usable yet",
                    attempt,
                    offers.len()
                );
                if !offers.is_empty() {
                    last_seen = offers;
                }
            }
            Err(e) => {
                tracing::warn!("Attempt {} failed: {}", attempt, e);
            }
        }

        if attempt < policy.max_attempts {
            tracing::info!("Trying next day...");
            if let Err(e) = source.advance_day().await {
                tracing::warn!("Could not advance the date: {}", e);
            }
            source.settle().await;
        }
    }

    // Last resort: fail only if even the best-seen list is empty.
    if last_seen.is_empty() {
        Err(PageError::NoOffersAvailable {
            attempts: policy.max_attempts,
        })
    } else {
        tracing::info!(
            "Falling back to the last non-empty list ({} offers)",
            last_seen.len()
        );
        Ok(last_seen)
    }
}

async fn poll_once<S>(
    source: &S,
    policy: &PollingPolicy,
) -> std::result::Result<AttemptOutcome<S::Handle>, BrowserError>
where
    S: OfferSource + Sync,
{
    let container_visible = source.await_offers_visible(policy.container_timeout).await;

    let offers = if container_visible {
        source.snapshot_offers().await?
    } else {
        Vec::new()
    };

    let sold_out = source.sold_out_visible(policy.indicator_timeout).await;

    if !sold_out && !offers.is_empty() {
        Ok(AttemptOutcome::Ready(offers))
    } else {
        Ok(AttemptOutcome::NotReady(offers))
    }
}

/// Scan offers in order and return the first one priced inside `range`.
///
/// Both bounds are inclusive. No re-sorting, no best-match logic: the
/// first match in input order wins.
pub fn find_offer_in_range<H>(
    offers: Vec<TicketOffer<H>>,
    range: &PriceRange,
) -> Result<TicketOffer<H>> {
    tracing::info!("Finding offer within price range {}", range);
    let inspected = offers.len();

    for offer in offers {
        tracing::debug!("Checking offer priced {:.2}", offer.price);
        if range.contains(offer.price) {
            tracing::info!("Found offer within range: {:.2}", offer.price);
            return Ok(offer);
        }
    }

    Err(PageError::NoOfferInRange {
        min: range.min,
        max: range.max,
        inspected,
    })
}

/// Best-effort price parse that never fails.
///
/// Strips everything except digits, comma, and period, replaces the
/// comma with a period, and parses as a float. Anything unparseable
/// yields `0.0`, which callers treat as "unknown", not "free".
/// Thousands-separated amounts such as `"1.234,50 €"` cannot be
/// disambiguated by this approach and also yield `0.0`.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    static SANITIZER: OnceLock<Regex> = OnceLock::new();
    let sanitizer = SANITIZER.get_or_init(|| Regex::new(r"[^0-9,.]").expect("valid regex"));

    if raw.trim().is_empty() {
        return 0.0;
    }

    let cleaned = sanitizer.replace_all(raw, "").replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(price) => price,
        Err(_) => {
            tracing::warn!("Could not parse price: {}", raw);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    #[derive(Debug, Clone, Default)]
    struct FakeAttempt {
        container_visible: bool,
        prices: Vec<f64>,
        sold_out: bool,
    }

    impl FakeAttempt {
        fn empty() -> Self {
            Self::default()
        }

        fn with_offers(prices: &[f64]) -> Self {
            Self {
                container_visible: true,
                prices: prices.to_vec(),
                sold_out: false,
            }
        }

        fn sold_out(prices: &[f64]) -> Self {
            Self {
                container_visible: true,
                prices: prices.to_vec(),
                sold_out: true,
            }
        }
    }

    /// Scripted results page: one `FakeAttempt` per polling attempt.
    struct FakeSource {
        script: Vec<FakeAttempt>,
        cursor: AtomicUsize,
        advances: AtomicU32,
    }

    impl FakeSource {
        fn new(script: Vec<FakeAttempt>) -> Self {
            Self {
                script,
                cursor: AtomicUsize::new(0),
                advances: AtomicU32::new(0),
            }
        }

        fn current(&self) -> FakeAttempt {
            let idx = self.cursor.load(Ordering::SeqCst).saturating_sub(1);
            self.script.get(idx).cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl OfferSource for FakeSource {
        type Handle = usize;

        async fn await_offers_visible(&self, _timeout: Duration) -> bool {
            let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
            self.script
                .get(idx)
                .map_or(false, |a| a.container_visible)
        }

        async fn snapshot_offers(
            &self,
        ) -> std::result::Result<Vec<TicketOffer<usize>>, BrowserError> {
            let attempt = self.current();
            Ok(attempt
                .prices
                .iter()
                .enumerate()
                .map(|(i, price)| {
                    let raw = format!("{price:.2} \u{20ac}").replace('.', ",");
                    TicketOffer::from_raw(raw, "2 h 30 min".to_string(), i)
                })
                .collect())
        }

        async fn sold_out_visible(&self, _timeout: Duration) -> bool {
            self.current().sold_out
        }

        async fn advance_day(&self) -> std::result::Result<(), BrowserError> {
            self.advances.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn settle(&self) {}
    }

    fn quick_policy() -> PollingPolicy {
        PollingPolicy {
            max_attempts: 3,
            container_timeout: Duration::from_millis(10),
            indicator_timeout: Duration::from_millis(10),
            settle: Duration::from_millis(1),
            page_load_timeout: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let source = FakeSource::new(vec![
            FakeAttempt::empty(),
            FakeAttempt::empty(),
            FakeAttempt::with_offers(&[52.3, 61.9]),
        ]);

        let offers = wait_for_offers(&source, &quick_policy())
            .await
            .expect("third attempt succeeds");
        assert_eq!(offers.len(), 2);
        assert!((offers[0].price - 52.3).abs() < 0.001);
        // One date advance per failed non-final attempt
        assert_eq!(source.advances.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_all_attempts_empty_fails() {
        let source = FakeSource::new(vec![
            FakeAttempt::empty(),
            FakeAttempt::empty(),
            FakeAttempt::empty(),
        ]);

        let err = wait_for_offers(&source, &quick_policy()).await.unwrap_err();
        assert!(matches!(err, PageError::NoOffersAvailable { attempts: 3 }));
        assert_eq!(source.advances.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_attempt_success_skips_advance() {
        let source = FakeSource::new(vec![FakeAttempt::with_offers(&[55.0])]);

        let offers = wait_for_offers(&source, &quick_policy())
            .await
            .expect("first attempt succeeds");
        assert_eq!(offers.len(), 1);
        assert_eq!(source.advances.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sold_out_offers_returned_as_last_resort() {
        // Offers are rendered on every attempt but the sold-out banner
        // never clears; the freshest non-empty list is still returned.
        let source = FakeSource::new(vec![
            FakeAttempt::sold_out(&[40.0]),
            FakeAttempt::sold_out(&[45.0]),
            FakeAttempt::sold_out(&[48.0]),
        ]);

        let offers = wait_for_offers(&source, &quick_policy())
            .await
            .expect("last resort returns the freshest list");
        assert_eq!(offers.len(), 1);
        assert!((offers[0].price - 48.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_invisible_container_counts_as_zero_offers() {
        // Attempt 1 has rows scripted but the container never becomes
        // visible, so they must not be snapshotted.
        let source = FakeSource::new(vec![
            FakeAttempt {
                container_visible: false,
                prices: vec![10.0],
                sold_out: false,
            },
            FakeAttempt::with_offers(&[54.0]),
        ]);

        let mut policy = quick_policy();
        policy.max_attempts = 2;
        let offers = wait_for_offers(&source, &policy).await.expect("attempt 2");
        assert_eq!(offers.len(), 1);
        assert!((offers[0].price - 54.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_price_comma_decimal() {
        assert!((parse_price("50,00 \u{20ac}") - 50.0).abs() < f64::EPSILON);
        assert!((parse_price("62,50 \u{20ac}") - 62.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_dot_decimal() {
        assert!((parse_price("62.50") - 62.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_with_prefix_text() {
        assert!((parse_price("Desde 50,00 \u{20ac}") - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_thousands_separator_is_unparseable() {
        // Strip-and-replace cannot disambiguate thousands separators.
        assert!((parse_price("1.234,50 \u{20ac}") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_garbage_and_empty() {
        assert!((parse_price("") - 0.0).abs() < f64::EPSILON);
        assert!((parse_price("   ") - 0.0).abs() < f64::EPSILON);
        assert!((parse_price("gratis") - 0.0).abs() < f64::EPSILON);
        assert!((parse_price("0") - 0.0).abs() < f64::EPSILON);
    }

    fn offers_from(prices: &[f64]) -> Vec<TicketOffer<usize>> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| TicketOffer::from_raw(format!("{p:.2}"), String::new(), i))
            .collect()
    }

    #[test]
    fn test_find_offer_first_match_wins() {
        let range = PriceRange::new(50.0, 60.0).unwrap();
        let offer = find_offer_in_range(offers_from(&[40.0, 55.0, 58.0, 70.0]), &range)
            .expect("55 is in range");
        assert!((offer.price - 55.0).abs() < f64::EPSILON);
        assert_eq!(offer.handle, 1);
    }

    #[test]
    fn test_find_offer_none_in_range() {
        let range = PriceRange::new(50.0, 60.0).unwrap();
        let err = find_offer_in_range(offers_from(&[40.0, 70.0]), &range).unwrap_err();
        assert!(matches!(
            err,
            PageError::NoOfferInRange {
                inspected: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_find_offer_inclusive_bounds() {
        let range = PriceRange::new(50.0, 60.0).unwrap();

        let offer = find_offer_in_range(offers_from(&[50.0]), &range).expect("min bound matches");
        assert!((offer.price - 50.0).abs() < f64::EPSILON);

        let offer = find_offer_in_range(offers_from(&[60.0]), &range).expect("max bound matches");
        assert!((offer.price - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_find_offer_empty_input() {
        let range = PriceRange::new(50.0, 60.0).unwrap();
        let err = find_offer_in_range(offers_from(&[]), &range).unwrap_err();
        assert!(matches!(err, PageError::NoOfferInRange { inspected: 0, .. }));
    }

    #[test]
    fn test_unparseable_price_is_not_free() {
        // A zero price must not match a range starting at zero's edge
        // unless the range genuinely includes zero.
        let range = PriceRange::new(50.0, 60.0).unwrap();
        let offers = vec![TicketOffer::from_raw("n/a".to_string(), String::new(), 0usize)];
        assert!(find_offer_in_range(offers, &range).is_err());
    }
}
