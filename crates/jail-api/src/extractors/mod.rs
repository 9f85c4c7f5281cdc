//! Axum extractors for request handling
//!
//! Custom extractors for caller authentication, path ids, and validated bodies.

mod auth;
mod path;
mod validated;

pub use auth::{secrets_match, HostCaller};
pub use path::GuildIdPath;
pub use validated::{JsonBody, ValidatedJson};
