//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs (command reports) for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{ActorRequest, JailRequest, TextCommandRequest, UnjailRequest};

pub use responses::{
    AlreadyJailed, CommandOutcome, CommandResponse, HealthResponse, JailCheckReport, JailReport,
    JailedMember, MemberFailure, ProfileScanReport, ReadinessChecks, ReadinessResponse,
    ReleasedMember, ReportDelivery, SuspiciousProfile, UnjailReport,
};
