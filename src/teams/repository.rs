use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{Team, TeamInvitation, TeamMembership};
use crate::AuthError;
use crate::invite_token::InviteKind;

#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub name: String,
    pub slug: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub team_id: i64,
    pub user_id: i64,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub team_id: i64,
    pub kind: InviteKind,
    pub email: Option<String>,
    pub role: String,
    pub token_hash: String,
    pub invited_by: i64,
    pub expires_at: DateTime<Utc>,
    pub max_uses: u32,
}

/// Result of an atomic redeem attempt against one invitation.
#[derive(Debug, Clone, PartialEq)]
pub enum Redemption {
    /// A new membership was created and one use was consumed.
    Joined(TeamMembership),
    /// The user already belongs to the team; nothing was consumed.
    AlreadyMember(TeamMembership),
    /// No uses left (link cap reached, or email invite already consumed).
    Exhausted,
    /// The invitation expired before the redeem could run.
    Expired,
    /// The invitation no longer exists.
    Gone,
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn create(&self, data: CreateTeam) -> Result<Team, AuthError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Team>, AuthError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Team>, AuthError>;
}

#[async_trait]
pub trait TeamMembershipRepository: Send + Sync {
    async fn create(&self, data: CreateMembership) -> Result<TeamMembership, AuthError>;
    async fn find_by_team_and_user(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMembership>, AuthError>;
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<TeamMembership>, AuthError>;
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<TeamMembership>, AuthError>;
    async fn update_role(&self, id: i64, role: &str) -> Result<TeamMembership, AuthError>;
    async fn delete_by_team_and_user(&self, team_id: i64, user_id: i64) -> Result<(), AuthError>;
}

/// Storage contract for invitations.
///
/// Implementations must make [`redeem`](Self::redeem) atomic per invitation:
/// the use-count check-and-increment, the membership insert and the
/// consumption mark happen as one unit relative to other redeems of the same
/// invitation. A read-then-write without a lock or transaction can exceed
/// `max_uses` under concurrent acceptances.
#[async_trait]
pub trait TeamInvitationRepository: Send + Sync {
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, AuthError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<TeamInvitation>, AuthError>;
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<TeamInvitation>, AuthError>;
    /// Unexpired invitations of a team that still have uses left.
    async fn find_pending_by_team(&self, team_id: i64) -> Result<Vec<TeamInvitation>, AuthError>;
    /// Grants membership to `user_id` under the invitation's role.
    ///
    /// - already a member: [`Redemption::AlreadyMember`], no use consumed; an
    ///   unconsumed email invite is marked accepted
    /// - expired: [`Redemption::Expired`]
    /// - `use_count >= max_uses`: [`Redemption::Exhausted`]
    /// - otherwise: insert membership, increment `use_count`, set
    ///   `accepted_at` if unset, [`Redemption::Joined`]
    async fn redeem(&self, invitation_id: i64, user_id: i64) -> Result<Redemption, AuthError>;
    async fn delete(&self, id: i64) -> Result<(), AuthError>;
    async fn delete_expired(&self) -> Result<u64, AuthError>;
}
