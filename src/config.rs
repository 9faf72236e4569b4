//! Configuration types.
//!
//! ```rust
//! use tipgate::config::{InvitationConfig, TipgateConfig};
//! use chrono::Duration;
//!
//! let config = TipgateConfig {
//!     invitations: InvitationConfig {
//!         link_expiry: Duration::days(2),
//!         default_link_max_uses: 10,
//!         ..Default::default()
//!     },
//! };
//! assert_eq!(config.invitations.secret_bytes, 32);
//! ```

use chrono::Duration;

use crate::invite_token::{DEFAULT_SECRET_BYTES, InviteKind, MIN_SECRET_BYTES};

/// Top-level configuration.
#[derive(Debug, Clone, Default)]
pub struct TipgateConfig {
    pub invitations: InvitationConfig,
}

impl TipgateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Long-lived, generous invites for local work.
    pub fn development() -> Self {
        Self {
            invitations: InvitationConfig {
                email_expiry: Duration::days(30),
                link_expiry: Duration::days(30),
                default_link_max_uses: 100,
                secret_bytes: DEFAULT_SECRET_BYTES,
            },
        }
    }

    /// Short-lived invites, single-digit link uses and larger secrets.
    pub fn strict() -> Self {
        Self {
            invitations: InvitationConfig {
                email_expiry: Duration::days(2),
                link_expiry: Duration::hours(24),
                default_link_max_uses: 5,
                secret_bytes: 48,
            },
        }
    }
}

/// Invitation lifetimes and limits.
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// How long an email invite stays redeemable. Default: 7 days
    pub email_expiry: Duration,
    /// How long a shareable link stays redeemable. Default: 7 days
    pub link_expiry: Duration,
    /// Uses granted to a link invite when the issuer does not say. Default: 25
    pub default_link_max_uses: u32,
    /// Random bytes per token secret. Values below 24 are raised to 24.
    /// Default: 32
    pub secret_bytes: usize,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            email_expiry: Duration::days(7),
            link_expiry: Duration::days(7),
            default_link_max_uses: 25,
            secret_bytes: DEFAULT_SECRET_BYTES,
        }
    }
}

impl InvitationConfig {
    pub fn expiry_for(&self, kind: InviteKind) -> Duration {
        match kind {
            InviteKind::Email => self.email_expiry,
            InviteKind::Link => self.link_expiry,
        }
    }

    /// Secret size actually used, after applying the entropy floor.
    #[inline]
    pub fn effective_secret_bytes(&self) -> usize {
        self.secret_bytes.max(MIN_SECRET_BYTES)
    }
}
