//! Moderation services
//!
//! Each service borrows the shared [`ServiceContext`] and implements one
//! command or event flow. Helpers shared between flows (audit log, purge,
//! retry, roles, transcripts) live alongside them.

pub mod audit_log;
pub mod command;
pub mod context;
pub mod error;
pub mod guard;
pub mod jail;
pub mod jailcheck;
pub mod permission;
pub mod profile_scan;
pub mod purge;
pub mod retention;
pub mod retry;
pub mod roles;
pub mod tasks;
pub mod transcript;
pub mod unjail;

// Re-export all services for convenience
pub use audit_log::AuditLog;
pub use command::CommandService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guard::{EventOutcome, GuardService};
pub use jail::{prepare_targets, JailService};
pub use jailcheck::JailCheckService;
pub use permission::{Moderator, PermissionService};
pub use profile_scan::{match_keywords, ProfileScanService};
pub use purge::PurgeService;
pub use retention::RetentionSweeper;
pub use retry::retry_on_rate_limit;
pub use roles::RoleService;
pub use tasks::{spawn_event, spawn_supervised};
pub use transcript::{SweepReport, Transcript, TranscriptStore};
pub use unjail::UnjailService;
