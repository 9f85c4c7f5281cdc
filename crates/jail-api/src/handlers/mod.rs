//! Route handlers
//!
//! HTTP request handlers grouped by concern.

pub mod events;
pub mod health;
pub mod moderation;
