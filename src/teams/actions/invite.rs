use chrono::Utc;

use super::actor_role;
use crate::config::InvitationConfig;
use crate::events::{TeamEvent, dispatch};
use crate::invite_token::{self, InviteKind};
use crate::rbac::{Permission, Role, authorize};
use crate::teams::types::canonical_email;
use crate::teams::{
    CreateInvitation, TeamInvitation, TeamInvitationRepository, TeamMembershipRepository,
    TeamRepository,
};
use crate::validators::validate_email;
use crate::{AuthError, SecretString};

/// Input data for creating a team invitation.
#[derive(Debug, Clone)]
pub struct InviteToTeamInput {
    pub team_id: i64,
    pub kind: InviteKind,
    /// Required for email invites, must be `None` for links.
    pub email: Option<String>,
    /// Role granted on acceptance.
    pub role: Role,
    pub invited_by: i64,
    /// Link invites only; falls back to the configured default.
    pub max_uses: Option<u32>,
}

impl InviteToTeamInput {
    pub fn email(team_id: i64, email: impl Into<String>, role: Role, invited_by: i64) -> Self {
        Self {
            team_id,
            kind: InviteKind::Email,
            email: Some(email.into()),
            role,
            invited_by,
            max_uses: None,
        }
    }

    pub fn link(team_id: i64, role: Role, invited_by: i64, max_uses: Option<u32>) -> Self {
        Self {
            team_id,
            kind: InviteKind::Link,
            email: None,
            role,
            invited_by,
            max_uses,
        }
    }
}

/// Output from creating a team invitation.
#[derive(Debug)]
pub struct InviteToTeamOutput {
    pub invitation: TeamInvitation,
    /// The plaintext token. Only its hash is stored; this is the one chance
    /// to deliver it.
    pub token: SecretString,
}

impl InviteToTeamOutput {
    /// Shareable path for the token, `/join/{token}`.
    pub fn join_path(&self) -> String {
        format!("/join/{}", self.token.expose_secret())
    }
}

/// Issues a team invitation.
///
/// This action:
/// 1. Validates the team exists
/// 2. Requires the inviter to hold `assign_roles` in that team
/// 3. Validates the kind-specific fields
/// 4. Generates a token and stores only its hash
pub struct InviteToTeamAction<T, M, I>
where
    T: TeamRepository,
    M: TeamMembershipRepository,
    I: TeamInvitationRepository,
{
    team_repo: T,
    membership_repo: M,
    invitation_repo: I,
    config: InvitationConfig,
}

impl<T, M, I> InviteToTeamAction<T, M, I>
where
    T: TeamRepository,
    M: TeamMembershipRepository,
    I: TeamInvitationRepository,
{
    pub fn new(team_repo: T, membership_repo: M, invitation_repo: I) -> Self {
        Self::with_config(
            team_repo,
            membership_repo,
            invitation_repo,
            InvitationConfig::default(),
        )
    }

    pub fn with_config(
        team_repo: T,
        membership_repo: M,
        invitation_repo: I,
        config: InvitationConfig,
    ) -> Self {
        Self {
            team_repo,
            membership_repo,
            invitation_repo,
            config,
        }
    }

    /// # Returns
    ///
    /// - `Ok(output)` - Invitation stored; deliver `output.token` out-of-band
    /// - `Err(AuthError::NotFound)` - Team does not exist
    /// - `Err(AuthError::NotMember)` - Inviter is not in the team
    /// - `Err(AuthError::Forbidden)` - Inviter lacks `assign_roles`
    /// - `Err(AuthError::Validation(_))` - Bad email / max uses for the kind
    /// - `Err(AuthError::ConfigurationError(_))` - No secure random source
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "invite_to_team",
            skip_all,
            fields(team_id = input.team_id, kind = %input.kind),
            err
        )
    )]
    pub async fn execute(&self, input: InviteToTeamInput) -> Result<InviteToTeamOutput, AuthError> {
        self.team_repo
            .find_by_id(input.team_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        let inviter_role =
            actor_role(&self.membership_repo, input.team_id, input.invited_by).await?;
        authorize(inviter_role, Permission::AssignRoles)?;

        let (email, max_uses) = self.validate(&input)?;

        let token = invite_token::create_token_with_len(
            input.kind,
            self.config.effective_secret_bytes(),
        )?;
        let token_hash = invite_token::hash(token.expose_secret());

        let data = CreateInvitation {
            team_id: input.team_id,
            kind: input.kind,
            email,
            role: input.role.as_str().to_owned(),
            token_hash,
            invited_by: input.invited_by,
            expires_at: Utc::now() + self.config.expiry_for(input.kind),
            max_uses,
        };

        let invitation = self.invitation_repo.create(data).await?;

        log::info!(
            target: "tipgate",
            "msg=\"invitation created\", team_id={}, invitation_id={}, kind=\"{}\", role=\"{}\", max_uses={}",
            invitation.team_id,
            invitation.id,
            invitation.kind,
            invitation.role,
            invitation.max_uses
        );

        dispatch(TeamEvent::InvitationCreated {
            team_id: invitation.team_id,
            invitation_id: invitation.id,
            kind: invitation.kind,
            invited_by: invitation.invited_by,
            at: invitation.created_at,
        })
        .await;

        Ok(InviteToTeamOutput { invitation, token })
    }

    fn validate(&self, input: &InviteToTeamInput) -> Result<(Option<String>, u32), AuthError> {
        match input.kind {
            InviteKind::Email => {
                let email = input.email.as_deref().map(canonical_email).ok_or_else(|| {
                    AuthError::Validation("email invites need a target address".into())
                })?;
                validate_email(&email)?;
                if input.max_uses.is_some_and(|n| n != 1) {
                    return Err(AuthError::Validation("email invites are single-use".into()));
                }
                Ok((Some(email), 1))
            }
            InviteKind::Link => {
                if input.email.is_some() {
                    return Err(AuthError::Validation(
                        "link invites are not bound to an email address".into(),
                    ));
                }
                let max_uses = input
                    .max_uses
                    .unwrap_or(self.config.default_link_max_uses);
                if max_uses == 0 {
                    return Err(AuthError::Validation(
                        "link invites need at least one use".into(),
                    ));
                }
                Ok((None, max_uses))
            }
        }
    }
}
