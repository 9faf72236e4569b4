mod accept;
mod assign_role;
mod invite;
mod pending;
mod prune;
mod revoke;

pub use accept::AcceptInvitationAction;
pub use assign_role::{AssignRoleAction, AssignRoleInput};
pub use invite::{InviteToTeamAction, InviteToTeamInput, InviteToTeamOutput};
pub use pending::ListPendingInvitationsAction;
pub use prune::PruneExpiredInvitationsAction;
pub use revoke::{RevokeInvitationAction, RevokeInvitationInput};

use crate::AuthError;
use crate::rbac::Role;
use crate::teams::TeamMembershipRepository;

/// Role the actor holds in `team_id`, or `NotMember`.
pub(crate) async fn actor_role<M: TeamMembershipRepository>(
    membership_repo: &M,
    team_id: i64,
    user_id: i64,
) -> Result<Role, AuthError> {
    membership_repo
        .find_by_team_and_user(team_id, user_id)
        .await?
        .map(|m| m.role())
        .ok_or(AuthError::NotMember)
}
