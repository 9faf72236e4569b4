use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use super::{AuditEntry, AuditLogRepository, NewAuditEntry};
use crate::AuthError;

#[derive(Clone, Default)]
pub struct MockAuditLogRepository {
    pub entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MockAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn record(&self, entry: NewAuditEntry) -> Result<AuditEntry, AuthError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AuthError::Internal("lock poisoned".into()))?;

        let record = AuditEntry {
            id: i64::try_from(entries.len()).unwrap_or(i64::MAX) + 1,
            action: entry.action,
            actor_id: entry.actor_id,
            team_id: entry.team_id,
            target_type: entry.target_type,
            target_id: entry.target_id,
            metadata: entry.metadata,
            created_at: Utc::now(),
        };
        entries.push(record.clone());
        drop(entries);

        Ok(record)
    }

    async fn find_by_team(&self, team_id: i64, limit: usize) -> Result<Vec<AuditEntry>, AuthError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AuthError::Internal("lock poisoned".into()))?;

        Ok(entries
            .iter()
            .filter(|e| e.team_id == team_id)
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
