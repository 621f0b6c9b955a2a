//! Railbook Core - Foundation crate for the Railbook booking suite.
//!
//! This crate provides shared types, error handling, and configuration
//! management that all other Railbook crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared domain types (`PriceRange`, `FareType`, date helpers)
//!
//! # Example
//!
//! ```rust
//! use railbook_core::{PriceRange, SuiteConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration (defaults when no config file exists)
//! let config = SuiteConfig::default();
//!
//! // Build the target price window
//! let range = PriceRange::new(config.pricing.min, config.pricing.max)?;
//! assert!(range.contains(55.0));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    BrowserSettings, JourneyConfig, PollingConfig, PricingConfig, SuiteConfig,
};
pub use error::{ConfigError, ConfigResult, RailbookError, Result};
pub use types::{future_date, FareType, PriceRange};
