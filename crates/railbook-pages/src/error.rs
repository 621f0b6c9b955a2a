use railbook_browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no travel options available after {attempts} attempts")]
    NoOffersAvailable { attempts: u32 },

    #[error("no ticket found within price range {min}-{max} ({inspected} offers inspected)")]
    NoOfferInRange {
        min: f64,
        max: f64,
        inspected: usize,
    },

    #[error("ticket selection failed: {reason}")]
    SelectionFailed { reason: String },

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
}

pub type Result<T> = std::result::Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_offer_in_range_display() {
        let err = PageError::NoOfferInRange {
            min: 50.0,
            max: 60.0,
            inspected: 4,
        };
        assert_eq!(
            err.to_string(),
            "no ticket found within price range 50-60 (4 offers inspected)"
        );
    }

    #[test]
    fn test_no_offers_available_display() {
        let err = PageError::NoOffersAvailable { attempts: 3 };
        assert!(err.to_string().contains("after 3 attempts"));
    }

    #[test]
    fn test_browser_error_converts() {
        let err: PageError = BrowserError::Timeout("t".to_string()).into();
        assert!(matches!(err, PageError::Browser(_)));
    }
}
