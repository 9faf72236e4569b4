use chrono::Utc;

use crate::AuthError;
use crate::events::{TeamEvent, dispatch};
use crate::invite_token::{self, InviteKind};
use crate::teams::{
    AcceptOutcome, Redemption, RejectionCause, TeamInvitationRepository, VerifiedIdentity,
};

/// Action to accept a team invitation.
///
/// This action:
/// 1. Parses the presented token and looks up its hash
/// 2. Checks the record's kind and expiry
/// 3. For email invites, matches the verified email against the target
/// 4. Redeems the invitation atomically in the store
///
/// Every rejection is an [`AcceptOutcome::Rejected`]; `Err` only carries
/// storage failures.
pub struct AcceptInvitationAction<I>
where
    I: TeamInvitationRepository,
{
    invitation_repo: I,
}

impl<I> AcceptInvitationAction<I>
where
    I: TeamInvitationRepository,
{
    pub fn new(invitation_repo: I) -> Self {
        Self { invitation_repo }
    }

    /// Accepts an invitation on behalf of `identity`.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw token as presented (surrounding whitespace is ignored)
    /// * `identity` - The identity verified by the host application
    ///
    /// # Returns
    ///
    /// - `Ok(AcceptOutcome::Accepted(_))` - Membership created
    /// - `Ok(AcceptOutcome::AlreadyAccepted(_))` - Identity was already a member
    /// - `Ok(AcceptOutcome::Rejected(_))` - Token refused
    /// - `Err(_)` - Database or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "accept_invitation",
            skip_all,
            fields(user_id = identity.user_id),
            err
        )
    )]
    pub async fn execute(
        &self,
        token: &str,
        identity: &VerifiedIdentity,
    ) -> Result<AcceptOutcome, AuthError> {
        let Some(parsed) = invite_token::parse(token) else {
            return Ok(reject(None, identity, RejectionCause::Malformed).await);
        };

        let token_hash = invite_token::hash(token);
        let Some(invitation) = self.invitation_repo.find_by_token_hash(&token_hash).await? else {
            return Ok(reject(None, identity, RejectionCause::UnknownToken).await);
        };

        let invitation_id = Some(invitation.id);
        if invitation.kind != parsed.kind {
            return Ok(reject(invitation_id, identity, RejectionCause::KindMismatch).await);
        }
        if invitation.is_expired() {
            return Ok(reject(invitation_id, identity, RejectionCause::Expired).await);
        }
        if invitation.kind == InviteKind::Email
            && !invitation
                .email
                .as_deref()
                .is_some_and(|target| identity.owns_email(target))
        {
            return Ok(reject(invitation_id, identity, RejectionCause::EmailMismatch).await);
        }

        let outcome = match self
            .invitation_repo
            .redeem(invitation.id, identity.user_id)
            .await?
        {
            Redemption::Joined(membership) => AcceptOutcome::Accepted(membership),
            Redemption::AlreadyMember(membership) => AcceptOutcome::AlreadyAccepted(membership),
            Redemption::Exhausted | Redemption::Gone => {
                return Ok(reject(invitation_id, identity, RejectionCause::Exhausted).await);
            }
            Redemption::Expired => {
                return Ok(reject(invitation_id, identity, RejectionCause::Expired).await);
            }
        };

        let replay = matches!(outcome, AcceptOutcome::AlreadyAccepted(_));
        log::info!(
            target: "tipgate",
            "msg=\"invitation accepted\", team_id={}, invitation_id={}, user_id={}, replay={}",
            invitation.team_id,
            invitation.id,
            identity.user_id,
            replay
        );

        dispatch(TeamEvent::InvitationAccepted {
            team_id: invitation.team_id,
            invitation_id: invitation.id,
            user_id: identity.user_id,
            replay,
            at: Utc::now(),
        })
        .await;

        Ok(outcome)
    }
}

async fn reject(
    invitation_id: Option<i64>,
    identity: &VerifiedIdentity,
    cause: RejectionCause,
) -> AcceptOutcome {
    log::debug!(
        target: "tipgate",
        "msg=\"invitation rejected\", invitation_id={:?}, user_id={}, cause=\"{}\"",
        invitation_id,
        identity.user_id,
        cause.as_str()
    );

    dispatch(TeamEvent::InvitationRejected {
        invitation_id,
        user_id: identity.user_id,
        cause,
        at: Utc::now(),
    })
    .await;

    AcceptOutcome::Rejected(cause.reason())
}
