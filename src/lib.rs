//! Authorization core for an incident-tip knowledge base.
//!
//! `tipgate` answers two questions for the host application:
//!
//! - may this role do this? ([`rbac`]: a static, monotonic permission matrix)
//! - does this invite token grant membership? ([`invite_token`] plus the
//!   team actions in [`teams`])
//!
//! Storage, identity and audit persistence are collaborators expressed as
//! async repository traits. In-memory implementations ship behind the `mocks`
//! feature, PostgreSQL ones behind `sqlx_postgres`, and an axum surface for
//! the invite endpoints behind `axum_api`.

pub mod audit;
pub mod config;
pub mod crypto;
pub mod events;
pub mod invite_token;
pub mod rbac;
mod secret;
pub mod teams;
pub mod validators;

#[cfg(feature = "sqlx_postgres")]
pub mod postgres;

#[cfg(feature = "axum_api")]
pub mod api;

pub use audit::{AuditEntry, AuditLogRepository, AuditTrail, NewAuditEntry};
pub use config::{InvitationConfig, TipgateConfig};
pub use events::{TeamEvent, dispatch, register_event_listeners};
pub use invite_token::{InviteKind, ParsedInviteToken};
pub use rbac::{
    Permission, PermissionSet, PrivilegedAction, Role, authorize, has_permission, normalize_role,
    permissions_of,
};
pub use secret::SecretString;
pub use teams::{AcceptOutcome, RejectReason, RejectionCause, VerifiedIdentity};

#[cfg(any(test, feature = "mocks"))]
pub use audit::MockAuditLogRepository;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The addressed team, membership or invitation does not exist.
    NotFound,
    /// The acting role lacks the permission the operation requires.
    Forbidden,
    /// The acting user has no membership in the team.
    NotMember,
    /// Malformed, unknown, expired or exhausted invite token.
    ///
    /// These cases are deliberately indistinguishable.
    InvalidOrExpiredInvite,
    /// The verified identity does not own the invited email address.
    EmailMismatch,
    Validation(String),
    /// A required primitive (secure random source, hashing) is unavailable.
    ConfigurationError(String),
    DatabaseError(String),
    Internal(String),
}

impl std::error::Error for AuthError {}

impl From<validators::ValidationError> for AuthError {
    fn from(e: validators::ValidationError) -> Self {
        AuthError::Validation(e.to_string())
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::NotFound => write!(f, "Not found"),
            AuthError::Forbidden => write!(f, "You do not have permission to perform this action"),
            AuthError::NotMember => write!(f, "Not a member of this team"),
            AuthError::InvalidOrExpiredInvite => write!(f, "Invalid or expired invite"),
            AuthError::EmailMismatch => {
                write!(f, "This invite was issued to a different email address")
            }
            AuthError::Validation(msg) => write!(f, "Validation error: {msg}"),
            AuthError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            AuthError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}
