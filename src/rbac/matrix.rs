//! The role → permission table.
//!
//! Expressed as data so each cell can be reviewed on its own and the
//! superset chain can be checked mechanically (see the tests below).

use super::permission::{Permission, PermissionSet};
use super::role::Role;
use crate::AuthError;

const READER: &[Permission] = &[Permission::ReadTips];

const CONTRIBUTOR: &[Permission] = &[Permission::ReadTips, Permission::CreateTips];

const REVIEWER: &[Permission] = &[
    Permission::ReadTips,
    Permission::CreateTips,
    Permission::PublishTips,
    Permission::DeprecateTips,
    Permission::ReadAudit,
];

const ADMIN: &[Permission] = &[
    Permission::ReadTips,
    Permission::CreateTips,
    Permission::PublishTips,
    Permission::DeprecateTips,
    Permission::ReadAudit,
    Permission::AssignRoles,
    Permission::ConfigureIntegration,
];

/// One row per role, in [`Role::ALL`] order.
pub const ROLE_PERMISSIONS: [(Role, &[Permission]); 4] = [
    (Role::Reader, READER),
    (Role::Contributor, CONTRIBUTOR),
    (Role::Reviewer, REVIEWER),
    (Role::Admin, ADMIN),
];

const ROLE_SETS: [PermissionSet; 4] = [
    PermissionSet::from_slice(READER),
    PermissionSet::from_slice(CONTRIBUTOR),
    PermissionSet::from_slice(REVIEWER),
    PermissionSet::from_slice(ADMIN),
];

/// The fixed permission set of `role`. Never empty.
pub fn permissions_of(role: Role) -> PermissionSet {
    ROLE_SETS[role.rank()]
}

pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions_of(role).contains(permission)
}

/// Checkpoint for privileged operations: `Err(Forbidden)` unless `role`
/// holds `permission`.
pub fn authorize(role: Role, permission: Permission) -> Result<(), AuthError> {
    if has_permission(role, permission) {
        return Ok(());
    }

    log::info!(
        target: "tipgate",
        "msg=\"permission denied\", role=\"{role}\", permission=\"{permission}\""
    );
    Err(AuthError::Forbidden)
}

/// Lowest role that holds `permission`.
pub fn minimum_role_for(permission: Permission) -> Role {
    Role::ALL
        .into_iter()
        .find(|role| has_permission(*role, permission))
        .unwrap_or(Role::Admin)
}
