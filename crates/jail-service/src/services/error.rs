//! Service layer error types
//!
//! Precondition failures abort a command before any member is touched;
//! everything else is captured per member inside the command's report.

use jail_cache::LimiterError;
use jail_common::AppError;
use jail_core::{DomainError, Snowflake};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Error reported by the guild client
    Domain(DomainError),

    /// Application error (I/O, config, etc.)
    App(AppError),

    /// Guild is not on the allow-list
    GuildNotAllowed(Snowflake),

    /// Actor may not run moderation commands
    PermissionDenied { permission: String },

    /// Validation error
    Validation(String),

    /// A configured role or channel does not resolve
    ConfigurationMissing(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::GuildNotAllowed(id) => write!(f, "Guild {id} is not allowed to use moderation commands"),
            Self::PermissionDenied { permission } => {
                write!(f, "Missing required permission: {permission}")
            }
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::ConfigurationMissing(what) => write!(f, "Configuration missing: {what}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration missing error
    pub fn configuration_missing(what: impl Into<String>) -> Self {
        Self::ConfigurationMissing(what.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if the target of an operation is gone
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() {
                    403
                } else if e.is_rate_limited() {
                    429
                } else if matches!(e, DomainError::HttpError { .. } | DomainError::TransportError(_)) {
                    502
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::GuildNotAllowed(_) | Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::ConfigurationMissing(_) | Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::GuildNotAllowed(_) => "GUILD_NOT_ALLOWED",
            Self::PermissionDenied { .. } => "MISSING_PERMISSIONS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ConfigurationMissing(what) => Self::ConfigurationMissing(what),
            other => Self::Domain(other),
        }
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<LimiterError> for ServiceError {
    fn from(err: LimiterError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::App(AppError::Io(err))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::GuildNotAllowed(id) => {
                AppError::Forbidden(format!("guild {id} is not allow-listed"))
            }
            ServiceError::PermissionDenied { permission } => {
                AppError::Domain(DomainError::MissingPermission(permission))
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::ConfigurationMissing(what) => {
                AppError::Domain(DomainError::ConfigurationMissing(what))
            }
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
