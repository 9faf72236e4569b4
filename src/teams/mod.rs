//! Teams, memberships and the invitation lifecycle.

mod actions;
#[cfg(any(test, feature = "mocks"))]
mod mocks;
mod outcome;
mod repository;
pub(crate) mod types;

pub use actions::{
    AcceptInvitationAction, AssignRoleAction, AssignRoleInput, InviteToTeamAction,
    InviteToTeamInput, InviteToTeamOutput, ListPendingInvitationsAction,
    PruneExpiredInvitationsAction, RevokeInvitationAction, RevokeInvitationInput,
};
pub use outcome::{AcceptOutcome, RejectReason, RejectionCause};
pub use repository::{
    CreateInvitation, CreateMembership, CreateTeam, Redemption, TeamInvitationRepository,
    TeamMembershipRepository, TeamRepository,
};
pub use types::{Team, TeamInvitation, TeamMembership, VerifiedIdentity};

#[cfg(any(test, feature = "mocks"))]
pub use mocks::{MockTeamInvitationRepository, MockTeamMembershipRepository, MockTeamRepository};
