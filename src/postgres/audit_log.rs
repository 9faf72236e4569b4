use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::audit::{AuditEntry, AuditLogRepository, NewAuditEntry};
use crate::postgres::db_error;
use crate::rbac::PrivilegedAction;
use crate::AuthError;

#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AuditLogRecord {
    id: i64,
    action: String,
    actor_id: i64,
    team_id: i64,
    target_type: String,
    target_id: String,
    metadata: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRecord> for AuditEntry {
    type Error = AuthError;

    fn try_from(row: AuditLogRecord) -> Result<Self, Self::Error> {
        let action = PrivilegedAction::from_name(&row.action).ok_or_else(|| {
            AuthError::DatabaseError(format!("unknown audit action '{}'", row.action))
        })?;

        Ok(AuditEntry {
            id: row.id,
            action,
            actor_id: row.actor_id,
            team_id: row.team_id,
            target_type: row.target_type,
            target_id: row.target_id,
            metadata: row.metadata,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, entry), fields(action = %entry.action), err)
    )]
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuthError> {
        let row: AuditLogRecord = sqlx::query_as(
            r"
            INSERT INTO audit_logs (action, actor_id, team_id, target_type, target_id, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, action, actor_id, team_id, target_type, target_id, metadata, created_at
            ",
        )
        .bind(entry.action.as_str())
        .bind(entry.actor_id)
        .bind(entry.team_id)
        .bind(&entry.target_type)
        .bind(&entry.target_id)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("record_audit_entry"))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_team(&self, team_id: i64, limit: usize) -> Result<Vec<AuditEntry>, AuthError> {
        let rows: Vec<AuditLogRecord> = sqlx::query_as(
            r"
            SELECT id, action, actor_id, team_id, target_type, target_id, metadata, created_at
            FROM audit_logs
            WHERE team_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(team_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find_audit_entries_by_team"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
