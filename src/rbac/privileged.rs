use std::fmt;

use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// Permission-gated actions whose successful completion must be audited.
///
/// Reading and creating tips are gated too, but are not audit-worthy and so
/// have no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegedAction {
    PublishTip,
    DeprecateTip,
    AssignRole,
    ConfigureIntegration,
}

impl PrivilegedAction {
    pub const ALL: [PrivilegedAction; 4] = [
        PrivilegedAction::PublishTip,
        PrivilegedAction::DeprecateTip,
        PrivilegedAction::AssignRole,
        PrivilegedAction::ConfigureIntegration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PublishTip => "publish_tip",
            Self::DeprecateTip => "deprecate_tip",
            Self::AssignRole => "assign_role",
            Self::ConfigureIntegration => "configure_integration",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "publish_tip" => Some(Self::PublishTip),
            "deprecate_tip" => Some(Self::DeprecateTip),
            "assign_role" => Some(Self::AssignRole),
            "configure_integration" => Some(Self::ConfigureIntegration),
            _ => None,
        }
    }

    /// The permission an actor must hold to perform this action.
    pub fn required_permission(self) -> Permission {
        match self {
            Self::PublishTip => Permission::PublishTips,
            Self::DeprecateTip => Permission::DeprecateTips,
            Self::AssignRole => Permission::AssignRoles,
            Self::ConfigureIntegration => Permission::ConfigureIntegration,
        }
    }
}

impl fmt::Display for PrivilegedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
