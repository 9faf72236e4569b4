//! PostgreSQL implementations of the storage traits.

mod audit_log;
pub mod migrations;
mod teams;

pub use audit_log::PostgresAuditLogRepository;
pub use teams::{
    PostgresTeamInvitationRepository, PostgresTeamMembershipRepository, PostgresTeamRepository,
};

use sqlx::PgPool;

use crate::AuthError;

/// Creates all Postgres repository instances from a connection pool.
pub fn create_repositories(
    pool: PgPool,
) -> (
    PostgresTeamRepository,
    PostgresTeamMembershipRepository,
    PostgresTeamInvitationRepository,
    PostgresAuditLogRepository,
) {
    (
        PostgresTeamRepository::new(pool.clone()),
        PostgresTeamMembershipRepository::new(pool.clone()),
        PostgresTeamInvitationRepository::new(pool.clone()),
        PostgresAuditLogRepository::new(pool),
    )
}

/// Logs a driver error and converts it for the caller.
fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AuthError {
    move |e| {
        log::error!(
            target: "tipgate",
            "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
        );
        AuthError::DatabaseError(e.to_string())
    }
}
