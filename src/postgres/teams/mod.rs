//! `PostgreSQL` implementations for team repositories.

mod invitation;
mod membership;
mod team;

pub use invitation::PostgresTeamInvitationRepository;
pub use membership::PostgresTeamMembershipRepository;
pub use team::PostgresTeamRepository;
