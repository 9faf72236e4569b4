use chrono::Utc;

use super::actor_role;
use crate::AuthError;
use crate::events::{TeamEvent, dispatch};
use crate::rbac::{Permission, authorize};
use crate::teams::{TeamInvitationRepository, TeamMembershipRepository};

#[derive(Debug, Clone)]
pub struct RevokeInvitationInput {
    pub team_id: i64,
    pub invitation_id: i64,
    pub revoked_by: i64,
}

/// Deletes an invitation so its token can no longer be redeemed.
pub struct RevokeInvitationAction<M, I>
where
    M: TeamMembershipRepository,
    I: TeamInvitationRepository,
{
    membership_repo: M,
    invitation_repo: I,
}

impl<M, I> RevokeInvitationAction<M, I>
where
    M: TeamMembershipRepository,
    I: TeamInvitationRepository,
{
    pub fn new(membership_repo: M, invitation_repo: I) -> Self {
        Self {
            membership_repo,
            invitation_repo,
        }
    }

    /// # Returns
    ///
    /// - `Ok(())` - Invitation deleted
    /// - `Err(AuthError::NotMember)` - Actor is not in the team
    /// - `Err(AuthError::Forbidden)` - Actor lacks `assign_roles`
    /// - `Err(AuthError::NotFound)` - No such invitation in this team
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "revoke_invitation",
            skip_all,
            fields(team_id = input.team_id, invitation_id = input.invitation_id),
            err
        )
    )]
    pub async fn execute(&self, input: RevokeInvitationInput) -> Result<(), AuthError> {
        let role = actor_role(&self.membership_repo, input.team_id, input.revoked_by).await?;
        authorize(role, Permission::AssignRoles)?;

        // an invitation from another team is reported as missing
        self.invitation_repo
            .find_by_id(input.invitation_id)
            .await?
            .filter(|i| i.team_id == input.team_id)
            .ok_or(AuthError::NotFound)?;

        self.invitation_repo.delete(input.invitation_id).await?;

        log::info!(
            target: "tipgate",
            "msg=\"invitation revoked\", team_id={}, invitation_id={}, revoked_by={}",
            input.team_id,
            input.invitation_id,
            input.revoked_by
        );

        dispatch(TeamEvent::InvitationRevoked {
            team_id: input.team_id,
            invitation_id: input.invitation_id,
            revoked_by: input.revoked_by,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
