//! REST transport: authorized reqwest client and error mapping

mod client;
pub mod error;

pub use client::{encode_audit_reason, RestClient, RestConfig};
