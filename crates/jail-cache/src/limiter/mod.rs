//! Command concurrency limiting.

mod command_limiter;

pub use command_limiter::{CommandLimiter, LimiterError, LimiterResult};
