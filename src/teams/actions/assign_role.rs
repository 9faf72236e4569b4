use chrono::Utc;
use serde_json::json;

use super::actor_role;
use crate::AuthError;
use crate::audit::{AuditLogRepository, AuditTrail, NewAuditEntry};
use crate::events::{TeamEvent, dispatch};
use crate::rbac::{Permission, PrivilegedAction, Role, authorize};
use crate::teams::{TeamMembership, TeamMembershipRepository};

#[derive(Debug, Clone)]
pub struct AssignRoleInput {
    pub team_id: i64,
    pub actor_id: i64,
    /// Member whose role changes.
    pub user_id: i64,
    pub role: Role,
}

/// Changes a member's role. A privileged action: requires `assign_roles`
/// and leaves an `assign_role` audit entry.
pub struct AssignRoleAction<M, A>
where
    M: TeamMembershipRepository,
    A: AuditLogRepository,
{
    membership_repo: M,
    trail: AuditTrail<A>,
}

impl<M, A> AssignRoleAction<M, A>
where
    M: TeamMembershipRepository,
    A: AuditLogRepository,
{
    pub fn new(membership_repo: M, audit_repo: A) -> Self {
        Self {
            membership_repo,
            trail: AuditTrail::new(audit_repo),
        }
    }

    /// # Returns
    ///
    /// - `Ok(membership)` - The updated membership
    /// - `Err(AuthError::NotMember)` - Actor is not in the team
    /// - `Err(AuthError::Forbidden)` - Actor lacks `assign_roles`
    /// - `Err(AuthError::NotFound)` - Target is not in the team
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "assign_role",
            skip_all,
            fields(team_id = input.team_id, user_id = input.user_id, role = %input.role),
            err
        )
    )]
    pub async fn execute(&self, input: AssignRoleInput) -> Result<TeamMembership, AuthError> {
        let actor = actor_role(&self.membership_repo, input.team_id, input.actor_id).await?;
        authorize(actor, Permission::AssignRoles)?;

        let target = self
            .membership_repo
            .find_by_team_and_user(input.team_id, input.user_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        let previous = target.role();

        let entry = NewAuditEntry::new(
            PrivilegedAction::AssignRole,
            input.actor_id,
            input.team_id,
            "membership",
            target.id,
        )
        .with_metadata(json!({
            "user_id": input.user_id,
            "from": previous.as_str(),
            "to": input.role.as_str(),
        }));

        let (membership, _) = self
            .trail
            .perform(actor, entry, || {
                self.membership_repo
                    .update_role(target.id, input.role.as_str())
            })
            .await?;

        log::info!(
            target: "tipgate",
            "msg=\"role assigned\", team_id={}, user_id={}, from=\"{}\", to=\"{}\"",
            input.team_id,
            input.user_id,
            previous,
            input.role
        );

        dispatch(TeamEvent::RoleAssigned {
            team_id: input.team_id,
            user_id: input.user_id,
            role: input.role,
            assigned_by: input.actor_id,
            at: Utc::now(),
        })
        .await;

        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MockAuditLogRepository;
    use crate::teams::{CreateMembership, MockTeamMembershipRepository};

    const TEAM_ID: i64 = 3;

    async fn setup() -> (MockTeamMembershipRepository, MockAuditLogRepository) {
        let members = MockTeamMembershipRepository::new();
        for (user_id, role) in [(1, "admin"), (2, "reviewer"), (3, "reader")] {
            members
                .create(CreateMembership {
                    team_id: TEAM_ID,
                    user_id,
                    role: role.to_owned(),
                })
                .await
                .unwrap();
        }
        (members, MockAuditLogRepository::new())
    }

    fn input(actor_id: i64, user_id: i64, role: Role) -> AssignRoleInput {
        AssignRoleInput {
            team_id: TEAM_ID,
            actor_id,
            user_id,
            role,
        }
    }

    #[tokio::test]
    async fn test_assign_role_success_is_audited() {
        let (members, audit) = setup().await;
        let action = AssignRoleAction::new(members.clone(), audit.clone());

        let membership = action.execute(input(1, 3, Role::Contributor)).await.unwrap();
        assert_eq!(membership.role(), Role::Contributor);

        let stored = members.find_by_team_and_user(TEAM_ID, 3).await.unwrap().unwrap();
        assert_eq!(stored.role, "contributor");

        let entries = audit.find_by_team(TEAM_ID, 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, PrivilegedAction::AssignRole);
        assert_eq!(entries[0].actor_id, 1);
        assert_eq!(entries[0].target_type, "membership");
        assert_eq!(entries[0].target_id, stored.id.to_string());
        let metadata = entries[0].metadata.as_ref().unwrap();
        assert_eq!(metadata["from"], "reader");
        assert_eq!(metadata["to"], "contributor");
    }

    #[tokio::test]
    async fn test_assign_role_requires_admin() {
        let (members, audit) = setup().await;
        let action = AssignRoleAction::new(members.clone(), audit.clone());

        let err = action.execute(input(2, 3, Role::Admin)).await.unwrap_err();
        assert_eq!(err, AuthError::Forbidden);

        let err = action.execute(input(99, 3, Role::Admin)).await.unwrap_err();
        assert_eq!(err, AuthError::NotMember);

        let unchanged = members.find_by_team_and_user(TEAM_ID, 3).await.unwrap().unwrap();
        assert_eq!(unchanged.role, "reader");
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn test_assign_role_target_must_be_member() {
        let (members, audit) = setup().await;
        let action = AssignRoleAction::new(members, audit.clone());

        let err = action.execute(input(1, 42, Role::Reviewer)).await.unwrap_err();
        assert_eq!(err, AuthError::NotFound);
        assert!(audit.is_empty());
    }
}
