//! `PostgreSQL` implementation of [`TeamMembershipRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::AuthError;
use crate::postgres::db_error;
use crate::teams::{CreateMembership, TeamMembership, TeamMembershipRepository};

pub(super) const MEMBERSHIP_COLUMNS: &str = "id, team_id, user_id, role, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresTeamMembershipRepository {
    pool: PgPool,
}

impl PostgresTeamMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
pub(super) struct MembershipRecord {
    id: i64,
    team_id: i64,
    user_id: i64,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MembershipRecord> for TeamMembership {
    fn from(row: MembershipRecord) -> Self {
        TeamMembership {
            id: row.id,
            team_id: row.team_id,
            user_id: row.user_id,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TeamMembershipRepository for PostgresTeamMembershipRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateMembership) -> Result<TeamMembership, AuthError> {
        let row: MembershipRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO team_memberships (team_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING {MEMBERSHIP_COLUMNS}
            "
        ))
        .bind(data.team_id)
        .bind(data.user_id)
        .bind(&data.role)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_membership"))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_team_and_user(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMembership>, AuthError> {
        let row: Option<MembershipRecord> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM team_memberships WHERE team_id = $1 AND user_id = $2"
        ))
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find_membership"))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_team(&self, team_id: i64) -> Result<Vec<TeamMembership>, AuthError> {
        let rows: Vec<MembershipRecord> = sqlx::query_as(&format!(
            r"
            SELECT {MEMBERSHIP_COLUMNS}
            FROM team_memberships
            WHERE team_id = $1
            ORDER BY created_at
            "
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find_memberships_by_team"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<TeamMembership>, AuthError> {
        let rows: Vec<MembershipRecord> = sqlx::query_as(&format!(
            r"
            SELECT {MEMBERSHIP_COLUMNS}
            FROM team_memberships
            WHERE user_id = $1
            ORDER BY created_at
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find_memberships_by_user"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn update_role(&self, id: i64, role: &str) -> Result<TeamMembership, AuthError> {
        let row: MembershipRecord = sqlx::query_as(&format!(
            r"
            UPDATE team_memberships
            SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {MEMBERSHIP_COLUMNS}
            "
        ))
        .bind(role)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AuthError::NotFound,
            e => db_error("update_membership_role")(e),
        })?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_by_team_and_user(&self, team_id: i64, user_id: i64) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM team_memberships WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_membership"))?;

        Ok(())
    }
}
