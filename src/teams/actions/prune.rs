use crate::AuthError;
use crate::teams::TeamInvitationRepository;

/// Deletes every expired invitation. Meant for a periodic job.
pub struct PruneExpiredInvitationsAction<I>
where
    I: TeamInvitationRepository,
{
    invitation_repo: I,
}

impl<I> PruneExpiredInvitationsAction<I>
where
    I: TeamInvitationRepository,
{
    pub fn new(invitation_repo: I) -> Self {
        Self { invitation_repo }
    }

    /// Returns the number of invitations removed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "prune_expired_invitations", skip_all, err)
    )]
    pub async fn execute(&self) -> Result<u64, AuthError> {
        let removed = self.invitation_repo.delete_expired().await?;

        if removed > 0 {
            log::info!(
                target: "tipgate",
                "msg=\"expired invitations pruned\", count={removed}"
            );
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::invite_token::InviteKind;
    use crate::teams::{CreateInvitation, MockTeamInvitationRepository};

    #[tokio::test]
    async fn test_prune_removes_only_expired() {
        let repo = MockTeamInvitationRepository::new();
        for (hash, offset) in [("a", -1), ("b", -2), ("c", 5)] {
            repo.create(CreateInvitation {
                team_id: 1,
                kind: InviteKind::Email,
                email: Some(format!("{hash}@example.com")),
                role: "reader".to_owned(),
                token_hash: hash.to_owned(),
                invited_by: 1,
                expires_at: Utc::now() + Duration::hours(offset),
                max_uses: 1,
            })
            .await
            .unwrap();
        }

        let action = PruneExpiredInvitationsAction::new(repo.clone());
        assert_eq!(action.execute().await.unwrap(), 2);
        assert_eq!(action.execute().await.unwrap(), 0);
        assert!(repo.find_by_token_hash("c").await.unwrap().is_some());
    }
}
