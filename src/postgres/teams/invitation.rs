//! `PostgreSQL` implementation of [`TeamInvitationRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use super::membership::{MEMBERSHIP_COLUMNS, MembershipRecord};
use crate::AuthError;
use crate::invite_token::InviteKind;
use crate::postgres::db_error;
use crate::teams::{
    CreateInvitation, CreateMembership, Redemption, TeamInvitation, TeamInvitationRepository,
    TeamMembership,
};

const INVITATION_COLUMNS: &str = "id, team_id, kind, email, role, token_hash, invited_by, \
     expires_at, max_uses, use_count, accepted_at, created_at";

/// PostgreSQL-backed team invitation repository.
#[derive(Clone)]
pub struct PostgresTeamInvitationRepository {
    pool: PgPool,
}

impl PostgresTeamInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct InvitationRecord {
    id: i64,
    team_id: i64,
    kind: String,
    email: Option<String>,
    role: String,
    token_hash: String,
    invited_by: i64,
    expires_at: DateTime<Utc>,
    max_uses: i32,
    use_count: i32,
    accepted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvitationRecord> for TeamInvitation {
    type Error = AuthError;

    fn try_from(row: InvitationRecord) -> Result<Self, Self::Error> {
        let kind = InviteKind::from_name(&row.kind).ok_or_else(|| {
            AuthError::DatabaseError(format!("unknown invitation kind '{}'", row.kind))
        })?;

        Ok(TeamInvitation {
            id: row.id,
            team_id: row.team_id,
            kind,
            email: row.email,
            role: row.role,
            token_hash: row.token_hash,
            invited_by: row.invited_by,
            expires_at: row.expires_at,
            max_uses: u32::try_from(row.max_uses).unwrap_or(0),
            use_count: u32::try_from(row.use_count).unwrap_or(u32::MAX),
            accepted_at: row.accepted_at,
            created_at: row.created_at,
        })
    }
}

fn to_column(value: u32) -> Result<i32, AuthError> {
    i32::try_from(value)
        .map_err(|_| AuthError::Validation(format!("max uses {value} is too large")))
}

#[async_trait]
impl TeamInvitationRepository for PostgresTeamInvitationRepository {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, data), err))]
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, AuthError> {
        let row: InvitationRecord = sqlx::query_as(&format!(
            r"
            INSERT INTO team_invitations
                (team_id, kind, email, role, token_hash, invited_by, expires_at, max_uses)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {INVITATION_COLUMNS}
            "
        ))
        .bind(data.team_id)
        .bind(data.kind.as_str())
        .bind(&data.email)
        .bind(&data.role)
        .bind(&data.token_hash)
        .bind(data.invited_by)
        .bind(data.expires_at)
        .bind(to_column(data.max_uses)?)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create_invitation"))?;

        row.try_into()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_by_id(&self, id: i64) -> Result<Option<TeamInvitation>, AuthError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {INVITATION_COLUMNS} FROM team_invitations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find_invitation_by_id"))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<TeamInvitation>, AuthError> {
        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {INVITATION_COLUMNS} FROM team_invitations WHERE token_hash = $1"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find_invitation_by_token_hash"))?;

        row.map(TryInto::try_into).transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn find_pending_by_team(&self, team_id: i64) -> Result<Vec<TeamInvitation>, AuthError> {
        let rows: Vec<InvitationRecord> = sqlx::query_as(&format!(
            r"
            SELECT {INVITATION_COLUMNS}
            FROM team_invitations
            WHERE team_id = $1 AND use_count < max_uses AND expires_at > NOW()
            ORDER BY created_at DESC
            "
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find_pending_invitations_by_team"))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Runs in one transaction. The invitation row is locked with
    /// `FOR UPDATE`, so concurrent redeems of the same invitation serialize
    /// and the use count can never pass `max_uses`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn redeem(&self, invitation_id: i64, user_id: i64) -> Result<Redemption, AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("redeem_invitation_begin"))?;

        let row: Option<InvitationRecord> = sqlx::query_as(&format!(
            "SELECT {INVITATION_COLUMNS} FROM team_invitations WHERE id = $1 FOR UPDATE"
        ))
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("redeem_invitation_lock"))?;

        let Some(row) = row else {
            return Ok(Redemption::Gone);
        };
        let invitation = TeamInvitation::try_from(row)?;

        let existing: Option<MembershipRecord> = sqlx::query_as(&format!(
            "SELECT {MEMBERSHIP_COLUMNS} FROM team_memberships WHERE team_id = $1 AND user_id = $2"
        ))
        .bind(invitation.team_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("redeem_invitation_find_member"))?;

        if let Some(existing) = existing {
            if invitation.kind == InviteKind::Email && invitation.accepted_at.is_none() {
                sqlx::query(
                    r"
                    UPDATE team_invitations
                    SET accepted_at = NOW(), use_count = max_uses
                    WHERE id = $1
                    ",
                )
                .bind(invitation.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("redeem_invitation_mark_accepted"))?;
            }
            tx.commit()
                .await
                .map_err(db_error("redeem_invitation_commit"))?;
            return Ok(Redemption::AlreadyMember(existing.into()));
        }

        if invitation.is_expired() {
            return Ok(Redemption::Expired);
        }
        if invitation.is_exhausted() {
            return Ok(Redemption::Exhausted);
        }

        let data = CreateMembership {
            team_id: invitation.team_id,
            user_id,
            role: invitation.role.clone(),
        };
        let inserted: Option<MembershipRecord> = sqlx::query_as(&format!(
            r"
            INSERT INTO team_memberships (team_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id) DO NOTHING
            RETURNING {MEMBERSHIP_COLUMNS}
            "
        ))
        .bind(data.team_id)
        .bind(data.user_id)
        .bind(&data.role)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("redeem_invitation_insert_member"))?;

        // joined through another invitation since the check above
        let Some(inserted) = inserted else {
            let membership = find_member(&mut tx, data.team_id, data.user_id).await?;
            tx.commit()
                .await
                .map_err(db_error("redeem_invitation_commit"))?;
            return Ok(Redemption::AlreadyMember(membership));
        };

        sqlx::query(
            r"
            UPDATE team_invitations
            SET use_count = use_count + 1, accepted_at = COALESCE(accepted_at, NOW())
            WHERE id = $1
            ",
        )
        .bind(invitation.id)
        .execute(&mut *tx)
        .await
        .map_err(db_error("redeem_invitation_consume"))?;

        tx.commit()
            .await
            .map_err(db_error("redeem_invitation_commit"))?;

        Ok(Redemption::Joined(inserted.into()))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete(&self, id: i64) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM team_invitations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_invitation"))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn delete_expired(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM team_invitations WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(db_error("delete_expired_invitations"))?;

        Ok(result.rows_affected())
    }
}

async fn find_member(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    team_id: i64,
    user_id: i64,
) -> Result<TeamMembership, AuthError> {
    let row: MembershipRecord = sqlx::query_as(&format!(
        "SELECT {MEMBERSHIP_COLUMNS} FROM team_memberships WHERE team_id = $1 AND user_id = $2"
    ))
    .bind(team_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_error("redeem_invitation_find_member"))?;

    Ok(row.into())
}
