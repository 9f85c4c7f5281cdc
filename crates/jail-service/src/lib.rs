//! # jail-service
//!
//! Application layer: moderation services, the text command parser, and DTOs.

pub mod commands;
pub mod dto;
pub mod services;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
