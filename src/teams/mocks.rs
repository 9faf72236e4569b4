#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{
    CreateInvitation, CreateMembership, CreateTeam, Redemption, TeamInvitationRepository,
    TeamMembershipRepository, TeamRepository,
};
use super::types::{Team, TeamInvitation, TeamMembership};
use crate::AuthError;
use crate::invite_token::InviteKind;

fn poisoned<T>(_: T) -> AuthError {
    AuthError::Internal("lock poisoned".into())
}

#[derive(Clone)]
pub struct MockTeamRepository {
    teams: Arc<RwLock<HashMap<i64, Team>>>,
    next_id: Arc<AtomicI64>,
}

impl MockTeamRepository {
    pub fn new() -> Self {
        Self {
            teams: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for MockTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamRepository for MockTeamRepository {
    async fn create(&self, data: CreateTeam) -> Result<Team, AuthError> {
        let mut teams = self.teams.write().map_err(poisoned)?;
        if teams.values().any(|t| t.slug == data.slug) {
            return Err(AuthError::Validation(format!(
                "team slug '{}' is taken",
                data.slug
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let team = Team {
            id,
            name: data.name,
            slug: data.slug,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        teams.insert(id, team.clone());

        Ok(team)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Team>, AuthError> {
        let teams = self.teams.read().map_err(poisoned)?;
        Ok(teams.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Team>, AuthError> {
        let teams = self.teams.read().map_err(poisoned)?;
        Ok(teams.values().find(|t| t.slug == slug).cloned())
    }
}

#[derive(Default)]
struct MembershipTable {
    rows: HashMap<i64, TeamMembership>,
    next_id: i64,
}

impl MembershipTable {
    fn find(&self, team_id: i64, user_id: i64) -> Option<&TeamMembership> {
        self.rows
            .values()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
    }

    fn insert(&mut self, data: CreateMembership) -> Result<TeamMembership, AuthError> {
        if self.find(data.team_id, data.user_id).is_some() {
            return Err(AuthError::DatabaseError(
                "duplicate membership for team and user".to_owned(),
            ));
        }

        self.next_id += 1;
        let now = Utc::now();
        let membership = TeamMembership {
            id: self.next_id,
            team_id: data.team_id,
            user_id: data.user_id,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        self.rows.insert(membership.id, membership.clone());

        Ok(membership)
    }
}

/// In-memory memberships. Clones share the same table.
#[derive(Clone, Default)]
pub struct MockTeamMembershipRepository {
    table: Arc<RwLock<MembershipTable>>,
}

impl MockTeamMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of membership rows for a team and user; at most 1.
    pub fn count_for(&self, team_id: i64, user_id: i64) -> usize {
        self.table.read().map_or(0, |table| {
            table
                .rows
                .values()
                .filter(|m| m.team_id == team_id && m.user_id == user_id)
                .count()
        })
    }
}

#[async_trait]
impl TeamMembershipRepository for MockTeamMembershipRepository {
    async fn create(&self, data: CreateMembership) -> Result<TeamMembership, AuthError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table.insert(data)
    }

    async fn find_by_team_and_user(
        &self,
        team_id: i64,
        user_id: i64,
    ) -> Result<Option<TeamMembership>, AuthError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.find(team_id, user_id).cloned())
    }

    async fn find_by_team(&self, team_id: i64) -> Result<Vec<TeamMembership>, AuthError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table
            .rows
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<TeamMembership>, AuthError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table
            .rows
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_role(&self, id: i64, role: &str) -> Result<TeamMembership, AuthError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let membership = table.rows.get_mut(&id).ok_or(AuthError::NotFound)?;
        role.clone_into(&mut membership.role);
        membership.updated_at = Utc::now();

        Ok(membership.clone())
    }

    async fn delete_by_team_and_user(&self, team_id: i64, user_id: i64) -> Result<(), AuthError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table
            .rows
            .retain(|_, m| !(m.team_id == team_id && m.user_id == user_id));
        Ok(())
    }
}

/// In-memory invitations.
///
/// Redeems write to the membership store it was built with. The invitation
/// lock is always taken before the membership lock, which makes each redeem
/// atomic with respect to every other redeem.
#[derive(Clone)]
pub struct MockTeamInvitationRepository {
    invitations: Arc<RwLock<HashMap<i64, TeamInvitation>>>,
    next_id: Arc<AtomicI64>,
    memberships: MockTeamMembershipRepository,
}

impl MockTeamInvitationRepository {
    /// Invitations backed by their own, private membership store.
    pub fn new() -> Self {
        Self::with_memberships(MockTeamMembershipRepository::new())
    }

    /// Invitations whose redeems insert into `memberships`.
    pub fn with_memberships(memberships: MockTeamMembershipRepository) -> Self {
        Self {
            invitations: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            memberships,
        }
    }

    pub fn memberships(&self) -> &MockTeamMembershipRepository {
        &self.memberships
    }
}

impl Default for MockTeamInvitationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TeamInvitationRepository for MockTeamInvitationRepository {
    async fn create(&self, data: CreateInvitation) -> Result<TeamInvitation, AuthError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let invitation = TeamInvitation {
            id,
            team_id: data.team_id,
            kind: data.kind,
            email: data.email,
            role: data.role,
            token_hash: data.token_hash,
            invited_by: data.invited_by,
            expires_at: data.expires_at,
            max_uses: data.max_uses,
            use_count: 0,
            accepted_at: None,
            created_at: Utc::now(),
        };

        let mut invitations = self.invitations.write().map_err(poisoned)?;
        if invitations
            .values()
            .any(|i| i.token_hash == invitation.token_hash)
        {
            return Err(AuthError::DatabaseError(
                "duplicate invitation token hash".to_owned(),
            ));
        }
        invitations.insert(id, invitation.clone());

        Ok(invitation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TeamInvitation>, AuthError> {
        let invitations = self.invitations.read().map_err(poisoned)?;
        Ok(invitations.get(&id).cloned())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<TeamInvitation>, AuthError> {
        let invitations = self.invitations.read().map_err(poisoned)?;
        Ok(invitations
            .values()
            .find(|i| i.token_hash == token_hash)
            .cloned())
    }

    async fn find_pending_by_team(&self, team_id: i64) -> Result<Vec<TeamInvitation>, AuthError> {
        let invitations = self.invitations.read().map_err(poisoned)?;
        let now = Utc::now();
        let mut pending: Vec<_> = invitations
            .values()
            .filter(|i| i.team_id == team_id && i.is_pending_at(now))
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    async fn redeem(&self, invitation_id: i64, user_id: i64) -> Result<Redemption, AuthError> {
        let mut invitations = self.invitations.write().map_err(poisoned)?;
        let Some(invitation) = invitations.get_mut(&invitation_id) else {
            return Ok(Redemption::Gone);
        };

        let mut table = self.memberships.table.write().map_err(poisoned)?;
        let now = Utc::now();

        if let Some(existing) = table.find(invitation.team_id, user_id) {
            if invitation.kind == InviteKind::Email && invitation.accepted_at.is_none() {
                invitation.accepted_at = Some(now);
                invitation.use_count = invitation.max_uses;
            }
            return Ok(Redemption::AlreadyMember(existing.clone()));
        }

        if invitation.is_expired_at(now) {
            return Ok(Redemption::Expired);
        }
        if invitation.is_exhausted() {
            return Ok(Redemption::Exhausted);
        }

        let membership = table.insert(CreateMembership {
            team_id: invitation.team_id,
            user_id,
            role: invitation.role.clone(),
        })?;
        invitation.use_count += 1;
        invitation.accepted_at.get_or_insert(now);

        Ok(Redemption::Joined(membership))
    }

    async fn delete(&self, id: i64) -> Result<(), AuthError> {
        let mut invitations = self.invitations.write().map_err(poisoned)?;
        invitations.remove(&id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AuthError> {
        let mut invitations = self.invitations.write().map_err(poisoned)?;
        let now = Utc::now();
        let before = invitations.len();
        invitations.retain(|_, i| !i.is_expired_at(now));
        let removed = before - invitations.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
