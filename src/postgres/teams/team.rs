//! `PostgreSQL` implementation of [`TeamRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::AuthError;
use crate::postgres::db_error;
use crate::teams::{CreateTeam, Team, TeamRepository};

#[derive(Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TeamRecord {
    id: i64,
    name: String,
    slug: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamRecord> for Team {
    fn from(row: TeamRecord) -> Self {
        Team {
            id: row.id,
            name: row.name,
            slug: row.slug,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn create(&self, data: CreateTeam) -> Result<Team, AuthError> {
        let row: TeamRecord = sqlx::query_as(
            r"
            INSERT INTO teams (name, slug, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, owner_id, created_at, updated_at
            ",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_team"))?;

        Ok(row.into())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Team>, AuthError> {
        let row: Option<TeamRecord> = sqlx::query_as(
            "SELECT id, name, slug, owner_id, created_at, updated_at FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find_team_by_id"))?;

        Ok(row.map(Into::into))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Team>, AuthError> {
        let row: Option<TeamRecord> = sqlx::query_as(
            "SELECT id, name, slug, owner_id, created_at, updated_at FROM teams WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find_team_by_slug"))?;

        Ok(row.map(Into::into))
    }
}
