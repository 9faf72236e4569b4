//! Atomic capabilities and the compact set type the matrix hands out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An atomic, unparameterized capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ReadTips,
    CreateTips,
    PublishTips,
    DeprecateTips,
    AssignRoles,
    ConfigureIntegration,
    ReadAudit,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::ReadTips,
        Permission::CreateTips,
        Permission::PublishTips,
        Permission::DeprecateTips,
        Permission::AssignRoles,
        Permission::ConfigureIntegration,
        Permission::ReadAudit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadTips => "read_tips",
            Self::CreateTips => "create_tips",
            Self::PublishTips => "publish_tips",
            Self::DeprecateTips => "deprecate_tips",
            Self::AssignRoles => "assign_roles",
            Self::ConfigureIntegration => "configure_integration",
            Self::ReadAudit => "read_audit",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "read_tips" => Some(Self::ReadTips),
            "create_tips" => Some(Self::CreateTips),
            "publish_tips" => Some(Self::PublishTips),
            "deprecate_tips" => Some(Self::DeprecateTips),
            "assign_roles" => Some(Self::AssignRoles),
            "configure_integration" => Some(Self::ConfigureIntegration),
            "read_audit" => Some(Self::ReadAudit),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of permissions stored as a bitmask.
///
/// Iteration follows [`Permission::ALL`] order. Serializes as a list of wire
/// names, e.g. `["read_tips","create_tips"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet {
    bits: u8,
}

impl PermissionSet {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Builds a set from a slice; usable in `const` context.
    pub const fn from_slice(permissions: &[Permission]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < permissions.len() {
            bits |= permissions[i].bit();
            i += 1;
        }
        Self { bits }
    }

    pub fn insert(&mut self, permission: Permission) {
        self.bits |= permission.bit();
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.bits & permission.bit() != 0
    }

    /// True if every permission in `self` is also in `other`.
    pub fn is_subset(&self, other: &PermissionSet) -> bool {
        self.bits & !other.bits == 0
    }

    /// Permissions in `self` that are not in `other`.
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet {
            bits: self.bits & !other.bits,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(|p| self.contains(*p))
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::empty();
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

impl Serialize for PermissionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let permissions = Vec::<Permission>::deserialize(deserializer)?;
        Ok(permissions.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_roundtrip() {
        for permission in Permission::ALL {
            assert_eq!(Permission::from_name(permission.as_str()), Some(permission));
        }
        assert_eq!(Permission::from_name("read-tips"), None);
    }

    #[test]
    fn test_bits_are_distinct() {
        let all: PermissionSet = Permission::ALL.into_iter().collect();
        assert_eq!(all.len(), Permission::ALL.len());
    }

    #[test]
    fn test_insert_contains() {
        let mut set = PermissionSet::empty();
        assert!(set.is_empty());
        set.insert(Permission::PublishTips);
        assert!(set.contains(Permission::PublishTips));
        assert!(!set.contains(Permission::ReadTips));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_subset_and_difference() {
        let small = PermissionSet::from_slice(&[Permission::ReadTips]);
        let large = PermissionSet::from_slice(&[Permission::ReadTips, Permission::CreateTips]);

        assert!(small.is_subset(&large));
        assert!(!large.is_subset(&small));
        assert!(small.is_subset(&small));

        let added: Vec<_> = large.difference(&small).iter().collect();
        assert_eq!(added, vec![Permission::CreateTips]);
    }

    #[test]
    fn test_json_roundtrip() {
        let set = PermissionSet::from_slice(&[Permission::ReadAudit, Permission::ReadTips]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["read_tips","read_audit"]"#);

        let parsed: PermissionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_deserialize_rejects_unknown_permission() {
        let parsed: Result<PermissionSet, _> = serde_json::from_str(r#"["root"]"#);
        assert!(parsed.is_err());
    }
}
