//! Role-based access control.
//!
//! A closed set of [`Role`]s, a closed set of [`Permission`]s and a static,
//! monotonic table between them. Nothing here holds state, so every function
//! is safe to call from any number of tasks at once.
//!
//! ```rust
//! use tipgate::rbac::{Permission, Role, has_permission, normalize_role};
//!
//! let role = normalize_role(Some("reviewer"));
//! assert!(has_permission(role, Permission::PublishTips));
//! assert!(!has_permission(role, Permission::AssignRoles));
//!
//! // unknown role data fails closed
//! assert_eq!(normalize_role(Some("superuser")), Role::Reader);
//! ```

mod matrix;
mod permission;
mod privileged;
mod role;

pub use matrix::{ROLE_PERMISSIONS, authorize, has_permission, minimum_role_for, permissions_of};
pub use permission::{Permission, PermissionSet};
pub use privileged::PrivilegedAction;
pub use role::{Role, normalize_role};
