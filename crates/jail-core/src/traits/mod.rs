//! Ports implemented by the infrastructure layer

mod client;

pub use client::{ClientResult, GuildClient, PurgeOutcome};
