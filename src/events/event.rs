use chrono::{DateTime, Utc};

use crate::invite_token::InviteKind;
use crate::rbac::{PrivilegedAction, Role};
use crate::teams::RejectionCause;

/// Events emitted by team actions.
///
/// Always fired; a no-op when no listeners are registered.
#[derive(Debug, Clone)]
pub enum TeamEvent {
    InvitationCreated {
        team_id: i64,
        invitation_id: i64,
        kind: InviteKind,
        invited_by: i64,
        at: DateTime<Utc>,
    },
    InvitationAccepted {
        team_id: i64,
        invitation_id: i64,
        user_id: i64,
        /// True when the user was already a member and nothing was consumed.
        replay: bool,
        at: DateTime<Utc>,
    },
    /// `invitation_id` is `None` when the token never matched a record.
    InvitationRejected {
        invitation_id: Option<i64>,
        user_id: i64,
        cause: RejectionCause,
        at: DateTime<Utc>,
    },
    InvitationRevoked {
        team_id: i64,
        invitation_id: i64,
        revoked_by: i64,
        at: DateTime<Utc>,
    },
    RoleAssigned {
        team_id: i64,
        user_id: i64,
        role: Role,
        assigned_by: i64,
        at: DateTime<Utc>,
    },
    PrivilegedActionPerformed {
        action: PrivilegedAction,
        actor_id: i64,
        team_id: i64,
        at: DateTime<Utc>,
    },
}

impl TeamEvent {
    /// Dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvitationCreated { .. } => "team.invitation.created",
            Self::InvitationAccepted { replay: false, .. } => "team.invitation.accepted",
            Self::InvitationAccepted { replay: true, .. } => "team.invitation.already_accepted",
            Self::InvitationRejected { .. } => "team.invitation.rejected",
            Self::InvitationRevoked { .. } => "team.invitation.revoked",
            Self::RoleAssigned { .. } => "team.role.assigned",
            Self::PrivilegedActionPerformed { .. } => "team.privileged_action",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::InvitationCreated { at, .. }
            | Self::InvitationAccepted { at, .. }
            | Self::InvitationRejected { at, .. }
            | Self::InvitationRevoked { at, .. }
            | Self::RoleAssigned { at, .. }
            | Self::PrivilegedActionPerformed { at, .. } => *at,
        }
    }
}
