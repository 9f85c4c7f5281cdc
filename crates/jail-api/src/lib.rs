//! # jail-api
//!
//! HTTP front end for the jail moderation service, built with Axum.
//!
//! The host runtime that owns the Discord gateway connection forwards
//! moderator commands and member events here.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
