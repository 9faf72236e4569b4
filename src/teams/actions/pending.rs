use super::actor_role;
use crate::AuthError;
use crate::rbac::{Permission, authorize};
use crate::teams::{TeamInvitation, TeamInvitationRepository, TeamMembershipRepository};

/// Lists a team's pending invitations, newest first. Requires `assign_roles`.
pub struct ListPendingInvitationsAction<M, I>
where
    M: TeamMembershipRepository,
    I: TeamInvitationRepository,
{
    membership_repo: M,
    invitation_repo: I,
}

impl<M, I> ListPendingInvitationsAction<M, I>
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

    pub async fn execute(
        &self,
        team_id: i64,
        actor_id: i64,
    ) -> Result<Vec<TeamInvitation>, AuthError> {
        let role = actor_role(&self.membership_repo, team_id, actor_id).await?;
        authorize(role, Permission::AssignRoles)?;

        self.invitation_repo.find_pending_by_team(team_id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::invite_token::InviteKind;
    use crate::teams::{
        CreateInvitation, CreateMembership, MockTeamInvitationRepository,
        MockTeamMembershipRepository,
    };

    fn invite(hash: &str, expires_in: Duration) -> CreateInvitation {
        CreateInvitation {
            team_id: 1,
            kind: InviteKind::Link,
            email: None,
            role: "reader".to_owned(),
            token_hash: hash.to_owned(),
            invited_by: 1,
            expires_at: Utc::now() + expires_in,
            max_uses: 3,
        }
    }

    #[tokio::test]
    async fn test_list_pending_skips_expired() {
        let members = MockTeamMembershipRepository::new();
        members
            .create(CreateMembership {
                team_id: 1,
                user_id: 1,
                role: "admin".to_owned(),
            })
            .await
            .unwrap();
        members
            .create(CreateMembership {
                team_id: 1,
                user_id: 2,
                role: "contributor".to_owned(),
            })
            .await
            .unwrap();

        let invitations = MockTeamInvitationRepository::with_memberships(members.clone());
        invitations.create(invite("live", Duration::days(1))).await.unwrap();
        invitations.create(invite("stale", -Duration::days(1))).await.unwrap();

        let action = ListPendingInvitationsAction::new(members, invitations);

        let pending = action.execute(1, 1).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].token_hash, "live");

        assert_eq!(action.execute(1, 2).await.unwrap_err(), AuthError::Forbidden);
    }
}
