use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::invite_token::InviteKind;
use crate::teams::{TeamInvitation, TeamMembership};

// Request types

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub kind: InviteKind,
    /// Required for `email` invites.
    pub email: Option<String>,
    /// Role wire name, e.g. `"contributor"`.
    pub role: String,
    /// Link invites only.
    pub max_uses: Option<u32>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: i64,
    pub team_id: i64,
    pub kind: InviteKind,
    pub email: Option<String>,
    pub role: String,
    pub max_uses: u32,
    pub use_count: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<TeamInvitation> for InvitationResponse {
    fn from(invitation: TeamInvitation) -> Self {
        InvitationResponse {
            id: invitation.id,
            team_id: invitation.team_id,
            kind: invitation.kind,
            email: invitation.email,
            role: invitation.role,
            max_uses: invitation.max_uses,
            use_count: invitation.use_count,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }
    }
}

/// Returned once, at creation. The token is never retrievable again.
#[derive(Serialize)]
pub struct CreatedInvitationResponse {
    pub invitation: InvitationResponse,
    pub token: String,
    pub join_path: String,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub team_id: i64,
    pub user_id: i64,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<TeamMembership> for MembershipResponse {
    fn from(membership: TeamMembership) -> Self {
        MembershipResponse {
            team_id: membership.team_id,
            user_id: membership.user_id,
            role: membership.role,
            joined_at: membership.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AcceptInvitationResponse {
    /// `"accepted"` or `"already_accepted"`.
    pub status: &'static str,
    pub membership: MembershipResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<crate::AuthError> for ErrorResponse {
    fn from(err: crate::AuthError) -> Self {
        let code = match &err {
            crate::AuthError::NotFound => "NOT_FOUND",
            crate::AuthError::Forbidden => "FORBIDDEN",
            crate::AuthError::NotMember => "NOT_MEMBER",
            crate::AuthError::InvalidOrExpiredInvite => "INVALID_OR_EXPIRED_INVITE",
            crate::AuthError::EmailMismatch => "EMAIL_MISMATCH",
            crate::AuthError::Validation(_) => "VALIDATION_ERROR",
            crate::AuthError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            crate::AuthError::DatabaseError(_) => "DATABASE_ERROR",
            crate::AuthError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse {
            error: err.to_string(),
            code: code.to_owned(),
        }
    }
}
