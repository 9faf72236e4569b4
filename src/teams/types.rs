//! Core types for teams, memberships and invitations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::invite_token::InviteKind;
use crate::rbac::{Role, normalize_role};

/// A team groups users around a shared set of tips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    /// URL-friendly unique identifier.
    pub slug: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Links a user to a team with a role. `(team_id, user_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub id: i64,
    pub team_id: i64,
    pub user_id: i64,
    /// Role wire name as stored; read it through [`TeamMembership::role`].
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMembership {
    /// The stored role, failing closed to the lowest role if it is unknown.
    pub fn role(&self) -> Role {
        normalize_role(Some(&self.role))
    }
}

/// A pending or consumed invitation, keyed by the hash of its token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvitation {
    pub id: i64,
    pub team_id: i64,
    pub kind: InviteKind,
    /// Target address; only set for email invites.
    pub email: Option<String>,
    /// Role granted on acceptance.
    pub role: String,
    /// SHA-256 of the normalized token.
    #[serde(skip_serializing, default)]
    pub token_hash: String,
    pub invited_by: i64,
    pub expires_at: DateTime<Utc>,
    /// Always 1 for email invites.
    pub max_uses: u32,
    pub use_count: u32,
    /// First successful acceptance.
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TeamInvitation {
    pub fn role(&self) -> Role {
        normalize_role(Some(&self.role))
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// No uses left: the link hit its cap, or the email invite was consumed.
    pub fn is_exhausted(&self) -> bool {
        self.use_count >= self.max_uses
    }

    pub fn remaining_uses(&self) -> u32 {
        self.max_uses.saturating_sub(self.use_count)
    }

    /// Whether the invite can still grant membership to someone new.
    pub fn is_pending_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && !self.is_exhausted()
    }
}

/// The current user as asserted by the identity provider.
///
/// The email here is the only email the acceptance flow trusts; never build
/// one from request input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub user_id: i64,
    pub email: String,
}

impl VerifiedIdentity {
    pub fn new(user_id: i64, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Case-insensitive comparison against an invite's target address.
    pub fn owns_email(&self, target: &str) -> bool {
        emails_match(&self.email, target)
    }
}

/// Canonical form used when storing invite targets.
pub(crate) fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn emails_match(a: &str, b: &str) -> bool {
    canonical_email(a) == canonical_email(b)
}
