//! Integration test utilities for the jail moderation service
//!
//! Provides an in-memory guild, fixtures, and a helper to run the HTTP
//! server against it.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
pub use mock_client::{MockGuildClient, MockState};
