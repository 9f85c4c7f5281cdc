//! # jail-discord
//!
//! Discord REST API v10 implementation of the `GuildClient` port.
//!
//! ## Overview
//!
//! - Authorized `reqwest` client with audit-log reasons
//! - Wire models with serde derives
//! - Model -> entity mappers
//! - Status mapping: 403 -> `MissingPermission`, 404 -> not-found variants,
//!   429 -> `RateLimited` with the server-provided retry interval
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jail_discord::HttpGuildClient;
//! use jail_core::traits::GuildClient;
//!
//! let client = HttpGuildClient::from_config(&config.discord)?;
//! let member = client.fetch_member(guild_id, user_id).await?;
//! ```

pub mod client;
pub mod http;
pub mod mappers;
pub mod models;

// Re-export commonly used types
pub use client::HttpGuildClient;
pub use http::{RestClient, RestConfig};
