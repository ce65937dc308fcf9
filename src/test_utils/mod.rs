//! Test utilities.
//!
//! This module provides:
//! - Test data factories for creating valid fixtures
//! - In-memory implementations of the persistence and delivery ports
//! - A harness wiring the use cases over those ports
//! - `TestAppStateBuilder` for route tests

mod app_state_builder;
mod factories;
mod mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use harness::*;
pub use mocks::*;
