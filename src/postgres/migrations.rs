//! Database migrations.
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use tipgate::postgres::migrations;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run_all(pool).await
//! }
//! ```

use sqlx::PgPool;

/// Creates or upgrades the tables:
/// - `teams`
/// - `team_memberships`
/// - `team_invitations`
/// - `audit_logs`
pub async fn run_all(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
