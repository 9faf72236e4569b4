use std::fmt;

use serde::{Deserialize, Serialize};

/// A capability tier assigned per user per team.
///
/// Variants are declared in ascending order of capability, so the derived
/// `Ord` is the capability order: every role holds all permissions of the
/// roles that sort before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Reader,
    Contributor,
    Reviewer,
    Admin,
}

impl Role {
    /// Every role, lowest capability first.
    pub const ALL: [Role; 4] = [Role::Reader, Role::Contributor, Role::Reviewer, Role::Admin];

    /// The role unknown or missing role data collapses to.
    pub const LOWEST: Role = Role::Reader;

    /// Name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Contributor => "contributor",
            Self::Reviewer => "reviewer",
            Self::Admin => "admin",
        }
    }

    /// Strict, case-sensitive lookup by wire name.
    ///
    /// Use [`normalize_role`] at trust boundaries instead; it never fails.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "reader" => Some(Self::Reader),
            "contributor" => Some(Self::Contributor),
            "reviewer" => Some(Self::Reviewer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Zero-based position in the capability order.
    pub fn rank(self) -> usize {
        match self {
            Self::Reader => 0,
            Self::Contributor => 1,
            Self::Reviewer => 2,
            Self::Admin => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interprets externally stored role data.
///
/// Anything other than an exact wire name, including a missing value, becomes
/// [`Role::LOWEST`]. Malformed role data must never read as elevated privilege.
pub fn normalize_role(raw: Option<&str>) -> Role {
    raw.and_then(Role::from_name).unwrap_or(Role::LOWEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_missing_and_unknown() {
        assert_eq!(normalize_role(None), Role::Reader);
        assert_eq!(normalize_role(Some("bogus-role")), Role::Reader);
        assert_eq!(normalize_role(Some("")), Role::Reader);
    }

    #[test]
    fn test_normalize_is_case_sensitive() {
        assert_eq!(normalize_role(Some("Admin")), Role::Reader);
        assert_eq!(normalize_role(Some("ADMIN")), Role::Reader);
        assert_eq!(normalize_role(Some(" admin")), Role::Reader);
    }

    #[test]
    fn test_normalize_exact_names_roundtrip() {
        for role in Role::ALL {
            assert_eq!(normalize_role(Some(role.as_str())), role);
        }
    }

    #[test]
    fn test_order_matches_rank() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].rank() + 1, pair[1].rank());
        }
        assert_eq!(Role::LOWEST, Role::ALL[0]);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::Reviewer).unwrap();
        assert_eq!(json, "\"reviewer\"");
        let role: Role = serde_json::from_str("\"contributor\"").unwrap();
        assert_eq!(role, Role::Contributor);
    }
}
