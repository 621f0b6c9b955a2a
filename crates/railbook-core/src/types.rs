//! Shared types used across the Railbook suite.
//!
//! This module defines the small domain vocabulary of the booking flow:
//! the inclusive price window offers are matched against, the fare tier
//! picked after an offer is selected, and the departure-date helper.

use crate::error::RailbookError;
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive price window for offer selection.
///
/// Both bounds are inclusive: an offer priced exactly at `min` or `max`
/// is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest acceptable price
    pub min: f64,
    /// Highest acceptable price
    pub max: f64,
}

impl PriceRange {
    /// Create a new `PriceRange`.
    ///
    /// # Errors
    /// Returns error if either bound is negative or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, RailbookError> {
        if min < 0.0 || max < 0.0 {
            return Err(RailbookError::Validation(format!(
                "price bounds must be non-negative, got {min}..{max}"
            )));
        }
        if min > max {
            return Err(RailbookError::Validation(format!(
                "price range inverted: min {min} exceeds max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Check whether a price falls inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: 50.0,
            max: 60.0,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} \u{20ac}", self.min, self.max)
    }
}

/// Fare tiers offered once a ticket is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FareType {
    /// Cheapest tier, no seat choice or changes
    #[default]
    Basic,
    /// Mid tier with seat choice
    Elige,
    /// Fully flexible tier
    Premium,
}

impl FareType {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Elige => "Elige",
            Self::Premium => "Premium",
        }
    }

    /// The label the booking site renders for this tier.
    ///
    /// Used to locate the fare element by visible text.
    #[must_use]
    pub fn site_label(&self) -> &'static str {
        match self {
            Self::Basic => "B\u{e1}sico",
            Self::Elige => "Elige",
            Self::Premium => "Pr\u{e9}mium",
        }
    }
}

impl fmt::Display for FareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A departure date `days_from_now` days in the future, as `YYYY-MM-DD`.
///
/// The booking site pre-selects a departure date on its own, so the
/// scenario only uses this for logging and report metadata.
#[must_use]
pub fn future_date(days_from_now: u64) -> String {
    let date = Utc::now().date_naive() + Days::new(days_from_now);
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_contains_inclusive_bounds() {
        let range = PriceRange::new(50.0, 60.0).expect("valid range");
        assert!(range.contains(50.0));
        assert!(range.contains(60.0));
        assert!(range.contains(55.5));
        assert!(!range.contains(49.99));
        assert!(!range.contains(60.01));
    }

    #[test]
    fn test_price_range_rejects_inverted() {
        let err = PriceRange::new(60.0, 50.0).unwrap_err();
        assert!(matches!(err, RailbookError::Validation(_)));
    }

    #[test]
    fn test_price_range_rejects_negative() {
        assert!(PriceRange::new(-1.0, 10.0).is_err());
        assert!(PriceRange::new(0.0, -10.0).is_err());
    }

    #[test]
    fn test_price_range_degenerate_window() {
        let range = PriceRange::new(50.0, 50.0).expect("valid range");
        assert!(range.contains(50.0));
        assert!(!range.contains(50.01));
    }

    #[test]
    fn test_price_range_display() {
        let range = PriceRange::default();
        assert_eq!(range.to_string(), "50-60 \u{20ac}");
    }

    #[test]
    fn test_fare_type_labels() {
        assert_eq!(FareType::Basic.site_label(), "B\u{e1}sico");
        assert_eq!(FareType::Basic.display_name(), "Basic");
        assert_eq!(FareType::default(), FareType::Basic);
    }

    #[test]
    fn test_fare_type_serde_kebab_case() {
        let json = serde_json::to_string(&FareType::Basic).expect("serialize");
        assert_eq!(json, "\"basic\"");
        let parsed: FareType = serde_json::from_str("\"premium\"").expect("parse");
        assert_eq!(parsed, FareType::Premium);
    }

    #[test]
    fn test_future_date_format() {
        let date = future_date(7);
        assert_eq!(date.len(), 10);
        assert_eq!(date.as_bytes()[4], b'-');
        assert_eq!(date.as_bytes()[7], b'-');
    }
}
