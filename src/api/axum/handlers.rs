use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};

use super::error::AppError;
use super::routes::InviteState;
use crate::AuthError;
use crate::api::{
    AcceptInvitationResponse, CreateInvitationRequest, CreatedInvitationResponse,
    InvitationResponse, MessageResponse,
};
use crate::rbac::Role;
use crate::teams::{
    AcceptInvitationAction, AcceptOutcome, InviteToTeamAction, InviteToTeamInput,
    ListPendingInvitationsAction, RevokeInvitationAction, RevokeInvitationInput,
    TeamInvitationRepository, TeamMembershipRepository, TeamRepository, VerifiedIdentity,
};

/// Create an invitation.
///
/// POST /teams/{team_id}/invitations
pub async fn create_invitation<T, M, I>(
    State(state): State<InviteState<T, M, I>>,
    Path(team_id): Path<i64>,
    Extension(identity): Extension<VerifiedIdentity>,
    Json(body): Json<CreateInvitationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    let role = Role::from_name(&body.role)
        .ok_or_else(|| AuthError::Validation(format!("unknown role '{}'", body.role)))?;

    let action = InviteToTeamAction::with_config(
        state.team_repo,
        state.membership_repo,
        state.invitation_repo,
        state.config,
    );
    let output = action
        .execute(InviteToTeamInput {
            team_id,
            kind: body.kind,
            email: body.email,
            role,
            invited_by: identity.user_id,
            max_uses: body.max_uses,
        })
        .await?;

    let join_path = output.join_path();
    let response = CreatedInvitationResponse {
        token: output.token.expose_secret().to_owned(),
        join_path,
        invitation: output.invitation.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// List a team's pending invitations.
///
/// GET /teams/{team_id}/invitations
pub async fn list_invitations<T, M, I>(
    State(state): State<InviteState<T, M, I>>,
    Path(team_id): Path<i64>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<impl IntoResponse, AppError>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    let action = ListPendingInvitationsAction::new(state.membership_repo, state.invitation_repo);
    let invitations = action.execute(team_id, identity.user_id).await?;

    let responses: Vec<InvitationResponse> = invitations.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Revoke an invitation.
///
/// DELETE /teams/{team_id}/invitations/{invitation_id}
pub async fn revoke_invitation<T, M, I>(
    State(state): State<InviteState<T, M, I>>,
    Path((team_id, invitation_id)): Path<(i64, i64)>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<impl IntoResponse, AppError>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    let action = RevokeInvitationAction::new(state.membership_repo, state.invitation_repo);
    action
        .execute(RevokeInvitationInput {
            team_id,
            invitation_id,
            revoked_by: identity.user_id,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "invitation revoked".to_owned(),
    }))
}

/// Accept an invitation as the current identity.
///
/// POST /join/{token}
pub async fn accept_invitation<T, M, I>(
    State(state): State<InviteState<T, M, I>>,
    Path(token): Path<String>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<impl IntoResponse, AppError>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    let action = AcceptInvitationAction::new(state.invitation_repo);

    let response = match action.execute(&token, &identity).await? {
        AcceptOutcome::Accepted(membership) => AcceptInvitationResponse {
            status: "accepted",
            membership: membership.into(),
        },
        AcceptOutcome::AlreadyAccepted(membership) => AcceptInvitationResponse {
            status: "already_accepted",
            membership: membership.into(),
        },
        AcceptOutcome::Rejected(reason) => return Err(AppError(reason.into())),
    };

    Ok(Json(response))
}
