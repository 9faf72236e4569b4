//! Audit trail for privileged actions.
//!
//! Every [`PrivilegedAction`] that completes must leave an [`AuditEntry`]
//! naming the action, the actor, the team and the target entity. Storage is a
//! collaborator behind [`AuditLogRepository`]; [`AuditTrail`] is the
//! checkpoint callers go through.

#[cfg(any(test, feature = "mocks"))]
mod mock;
mod trail;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AuthError;
use crate::rbac::PrivilegedAction;

#[cfg(any(test, feature = "mocks"))]
pub use mock::MockAuditLogRepository;
pub use trail::AuditTrail;

/// A stored audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub action: PrivilegedAction,
    pub actor_id: i64,
    pub team_id: i64,
    /// Kind of entity acted on, e.g. `"tip"`, `"membership"`, `"integration"`.
    pub target_type: String,
    pub target_id: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit record to be written; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub action: PrivilegedAction,
    pub actor_id: i64,
    pub team_id: i64,
    pub target_type: String,
    pub target_id: String,
    pub metadata: Option<serde_json::Value>,
}

impl NewAuditEntry {
    pub fn new(
        action: PrivilegedAction,
        actor_id: i64,
        team_id: i64,
        target_type: impl Into<String>,
        target_id: impl ToString,
    ) -> Self {
        Self {
            action,
            actor_id,
            team_id,
            target_type: target_type.into(),
            target_id: target_id.to_string(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuthError>;
    /// Most recent first.
    async fn find_by_team(&self, team_id: i64, limit: usize) -> Result<Vec<AuditEntry>, AuthError>;
}
