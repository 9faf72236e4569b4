//! Results of the invitation acceptance transaction.

use std::fmt;

use serde::Serialize;

use super::types::TeamMembership;
use crate::AuthError;

/// Terminal state of one acceptance attempt.
///
/// Infrastructure failures are not outcomes; they surface as `Err` from
/// [`AcceptInvitationAction::execute`](super::AcceptInvitationAction::execute).
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    /// First acceptance: membership created.
    Accepted(TeamMembership),
    /// The identity was already a member; nothing was created or consumed.
    AlreadyAccepted(TeamMembership),
    Rejected(RejectReason),
}

impl AcceptOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    pub fn membership(&self) -> Option<&TeamMembership> {
        match self {
            Self::Accepted(m) | Self::AlreadyAccepted(m) => Some(m),
            Self::Rejected(_) => None,
        }
    }

    /// Collapses the outcome for callers that only care about membership.
    pub fn into_result(self) -> Result<TeamMembership, AuthError> {
        match self {
            Self::Accepted(m) | Self::AlreadyAccepted(m) => Ok(m),
            Self::Rejected(reason) => Err(reason.into()),
        }
    }
}

/// What the invitee is told about a rejection.
///
/// Malformed, unknown, expired and exhausted tokens all map to
/// [`RejectReason::InvalidOrExpired`] so a caller cannot tell which rule
/// failed. Only an identity mismatch is reported separately: the invitee
/// already knows their own address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidOrExpired,
    EmailMismatch,
}

impl RejectReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidOrExpired => "invalid or expired invite",
            Self::EmailMismatch => "this invite was issued to a different email address",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<RejectReason> for AuthError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::InvalidOrExpired => AuthError::InvalidOrExpiredInvite,
            RejectReason::EmailMismatch => AuthError::EmailMismatch,
        }
    }
}

/// Precise rejection cause. Logged and carried on events for operators;
/// never returned to the presenter of the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCause {
    Malformed,
    UnknownToken,
    KindMismatch,
    Expired,
    Exhausted,
    EmailMismatch,
}

impl RejectionCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::UnknownToken => "unknown_token",
            Self::KindMismatch => "kind_mismatch",
            Self::Expired => "expired",
            Self::Exhausted => "exhausted",
            Self::EmailMismatch => "email_mismatch",
        }
    }

    pub fn reason(self) -> RejectReason {
        match self {
            Self::EmailMismatch => RejectReason::EmailMismatch,
            Self::Malformed
            | Self::UnknownToken
            | Self::KindMismatch
            | Self::Expired
            | Self::Exhausted => RejectReason::InvalidOrExpired,
        }
    }
}
