use std::future::Future;

use chrono::Utc;

use super::{AuditEntry, AuditLogRepository, NewAuditEntry};
use crate::AuthError;
use crate::events::{TeamEvent, dispatch};
use crate::rbac::{Permission, Role, authorize};

/// Authorization checkpoint and recorder for privileged actions.
///
/// ```rust,ignore
/// let trail = AuditTrail::new(audit_repo);
/// let entry = NewAuditEntry::new(PrivilegedAction::PublishTip, actor_id, team_id, "tip", tip_id);
/// let (tip, _record) = trail
///     .perform(actor_role, entry, || tips.publish(tip_id))
///     .await?;
/// ```
pub struct AuditTrail<A>
where
    A: AuditLogRepository,
{
    audit_repo: A,
}

impl<A: AuditLogRepository> AuditTrail<A> {
    pub fn new(audit_repo: A) -> Self {
        Self { audit_repo }
    }

    /// Runs `op` if `role` holds the action's permission, then records it.
    ///
    /// Nothing is recorded when authorization or `op` fails. A failure to
    /// record after `op` succeeded is returned as an error: the action
    /// happened but is not auditable, and the caller must know.
    ///
    /// # Errors
    ///
    /// - `AuthError::Forbidden` - `role` lacks `entry.action.required_permission()`
    /// - whatever `op` returns
    /// - storage errors from the audit repository
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "privileged_action",
            skip_all,
            fields(action = %entry.action),
            err
        )
    )]
    pub async fn perform<T, F, Fut>(
        &self,
        role: Role,
        entry: NewAuditEntry,
        op: F,
    ) -> Result<(T, AuditEntry), AuthError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, AuthError>> + Send,
        T: Send,
    {
        authorize(role, entry.action.required_permission())?;
        let value = op().await?;
        let record = self.record(entry).await?;
        Ok((value, record))
    }

    /// Writes an audit entry for an action the caller already authorized
    /// and completed.
    pub async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuthError> {
        let action = entry.action;
        let record = self.audit_repo.record(entry).await.map_err(|e| {
            log::error!(
                target: "tipgate",
                "msg=\"failed to record privileged action\", action=\"{action}\", error=\"{e}\""
            );
            e
        })?;

        log::info!(
            target: "tipgate",
            "msg=\"privileged action recorded\", action=\"{}\", actor_id={}, team_id={}, target=\"{}:{}\"",
            record.action,
            record.actor_id,
            record.team_id,
            record.target_type,
            record.target_id
        );

        dispatch(TeamEvent::PrivilegedActionPerformed {
            action: record.action,
            actor_id: record.actor_id,
            team_id: record.team_id,
            at: Utc::now(),
        })
        .await;

        Ok(record)
    }

    /// Recent entries for a team. Requires `read_audit`.
    pub async fn read(
        &self,
        role: Role,
        team_id: i64,
        limit: usize,
    ) -> Result<Vec<AuditEntry>, AuthError> {
        authorize(role, Permission::ReadAudit)?;
        self.audit_repo.find_by_team(team_id, limit).await
    }
}
