//! Scenario orchestration for the Railbook booking suite.
//!
//! Wires configuration, the browser engine, and the page objects into
//! the one linear ticket-purchase scenario the suite automates. The
//! end-to-end test lives in this crate's `tests/` directory;
//! `examples/run-booking.rs` drives the same scenario interactively.

pub mod scenario;

pub use scenario::{BookingScenario, ScenarioError, ScenarioReport};
