use axum::Router;
use axum::routing::{delete, post};

use super::handlers;
use crate::config::InvitationConfig;
use crate::teams::{TeamInvitationRepository, TeamMembershipRepository, TeamRepository};

#[derive(Clone)]
pub struct InviteState<T, M, I> {
    pub team_repo: T,
    pub membership_repo: M,
    pub invitation_repo: I,
    pub config: InvitationConfig,
}

/// Invitation management, mounted under `/teams`.
///
/// - `POST /{team_id}/invitations` - Create an invitation
/// - `GET /{team_id}/invitations` - List pending invitations
/// - `DELETE /{team_id}/invitations/{invitation_id}` - Revoke an invitation
pub fn invite_routes<T, M, I>() -> Router<InviteState<T, M, I>>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/{team_id}/invitations",
            post(handlers::create_invitation::<T, M, I>)
                .get(handlers::list_invitations::<T, M, I>),
        )
        .route(
            "/{team_id}/invitations/{invitation_id}",
            delete(handlers::revoke_invitation::<T, M, I>),
        )
}

/// - `POST /join/{token}` - Accept an invitation
pub fn join_routes<T, M, I>() -> Router<InviteState<T, M, I>>
where
    T: TeamRepository + Clone + Send + Sync + 'static,
    M: TeamMembershipRepository + Clone + Send + Sync + 'static,
    I: TeamInvitationRepository + Clone + Send + Sync + 'static,
{
    Router::new().route("/join/{token}", post(handlers::accept_invitation::<T, M, I>))
}
