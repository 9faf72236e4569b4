//! End-to-end tests for the invitation lifecycle.
//!
//! These tests use mock repositories - no database required.
//! Run with: `cargo test --features mocks --test e2e_invitations`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use tipgate::audit::AuditLogRepository;
use tipgate::teams::{
    AcceptInvitationAction, AssignRoleAction, AssignRoleInput, CreateMembership, CreateTeam,
    InviteToTeamAction, InviteToTeamInput, ListPendingInvitationsAction,
    MockTeamInvitationRepository, MockTeamMembershipRepository, MockTeamRepository,
    RevokeInvitationAction, RevokeInvitationInput, TeamMembershipRepository, TeamRepository,
};
use tipgate::{
    AcceptOutcome, AuthError, InviteKind, MockAuditLogRepository, PrivilegedAction,
    RejectReason, Role, VerifiedIdentity, invite_token,
};

const ADMIN: i64 = 1;

type Inviter = InviteToTeamAction<
    MockTeamRepository,
    MockTeamMembershipRepository,
    MockTeamInvitationRepository,
>;

struct Harness {
    team_id: i64,
    teams: MockTeamRepository,
    members: MockTeamMembershipRepository,
    invitations: MockTeamInvitationRepository,
}

impl Harness {
    async fn new() -> Self {
        let teams = MockTeamRepository::new();
        let members = MockTeamMembershipRepository::new();
        let invitations = MockTeamInvitationRepository::with_memberships(members.clone());

        let team = teams
            .create(CreateTeam {
                name: "Payments SRE".to_owned(),
                slug: "payments-sre".to_owned(),
                owner_id: ADMIN,
            })
            .await
            .unwrap();
        members
            .create(CreateMembership {
                team_id: team.id,
                user_id: ADMIN,
                role: Role::Admin.as_str().to_owned(),
            })
            .await
            .unwrap();

        Self {
            team_id: team.id,
            teams,
            members,
            invitations,
        }
    }

    fn inviter(&self) -> Inviter {
        InviteToTeamAction::new(
            self.teams.clone(),
            self.members.clone(),
            self.invitations.clone(),
        )
    }

    fn acceptor(&self) -> AcceptInvitationAction<MockTeamInvitationRepository> {
        AcceptInvitationAction::new(self.invitations.clone())
    }

    async fn role_of(&self, user_id: i64) -> Option<Role> {
        self.members
            .find_by_team_and_user(self.team_id, user_id)
            .await
            .unwrap()
            .map(|m| m.role())
    }
}

#[tokio::test]
async fn test_email_invite_flow() {
    let h = Harness::new().await;

    let output = h
        .inviter()
        .execute(InviteToTeamInput::email(
            h.team_id,
            "dana@example.com",
            Role::Reviewer,
            ADMIN,
        ))
        .await
        .unwrap();

    let parsed = invite_token::parse(output.token.expose_secret()).unwrap();
    assert_eq!(parsed.kind, InviteKind::Email);

    let dana = VerifiedIdentity::new(2, "Dana@Example.com");
    let first = h
        .acceptor()
        .execute(output.token.expose_secret(), &dana)
        .await
        .unwrap();
    let second = h
        .acceptor()
        .execute(output.token.expose_secret(), &dana)
        .await
        .unwrap();

    assert!(matches!(first, AcceptOutcome::Accepted(_)));
    assert!(matches!(second, AcceptOutcome::AlreadyAccepted(_)));
    assert_eq!(h.members.count_for(h.team_id, 2), 1);
    assert_eq!(h.role_of(2).await, Some(Role::Reviewer));

    // consumed: no longer pending
    let pending = ListPendingInvitationsAction::new(h.members.clone(), h.invitations.clone())
        .execute(h.team_id, ADMIN)
        .await
        .unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn test_email_invite_cannot_be_used_by_someone_else() {
    let h = Harness::new().await;
    let output = h
        .inviter()
        .execute(InviteToTeamInput::email(
            h.team_id,
            "dana@example.com",
            Role::Contributor,
            ADMIN,
        ))
        .await
        .unwrap();

    let eve = VerifiedIdentity::new(3, "eve@example.com");
    let outcome = h
        .acceptor()
        .execute(output.token.expose_secret(), &eve)
        .await
        .unwrap();

    assert_eq!(outcome, AcceptOutcome::Rejected(RejectReason::EmailMismatch));
    assert_eq!(
        outcome.into_result().unwrap_err().to_string(),
        "This invite was issued to a different email address"
    );
    assert_eq!(h.role_of(3).await, None);
}

#[tokio::test]
async fn test_link_invite_flow() {
    let h = Harness::new().await;
    let output = h
        .inviter()
        .execute(InviteToTeamInput::link(h.team_id, Role::Reader, ADMIN, Some(2)))
        .await
        .unwrap();
    let token = output.token.expose_secret();

    let mut outcomes = Vec::new();
    for user_id in [10, 11, 10, 12] {
        let identity = VerifiedIdentity::new(user_id, format!("user{user_id}@example.com"));
        outcomes.push(h.acceptor().execute(token, &identity).await.unwrap());
    }

    assert!(matches!(outcomes[0], AcceptOutcome::Accepted(_)));
    assert!(matches!(outcomes[1], AcceptOutcome::Accepted(_)));
    assert!(matches!(outcomes[2], AcceptOutcome::AlreadyAccepted(_)));
    assert_eq!(outcomes[3], AcceptOutcome::Rejected(RejectReason::InvalidOrExpired));

    assert_eq!(h.role_of(10).await, Some(Role::Reader));
    assert_eq!(h.role_of(12).await, None);
}

#[tokio::test]
async fn test_revoked_invite_is_indistinguishable_from_unknown() {
    let h = Harness::new().await;
    let output = h
        .inviter()
        .execute(InviteToTeamInput::link(h.team_id, Role::Reader, ADMIN, None))
        .await
        .unwrap();

    RevokeInvitationAction::new(h.members.clone(), h.invitations.clone())
        .execute(RevokeInvitationInput {
            team_id: h.team_id,
            invitation_id: output.invitation.id,
            revoked_by: ADMIN,
        })
        .await
        .unwrap();

    let identity = VerifiedIdentity::new(20, "late@example.com");
    let revoked = h
        .acceptor()
        .execute(output.token.expose_secret(), &identity)
        .await
        .unwrap();
    let garbage = h.acceptor().execute("bdi1.link.nope", &identity).await.unwrap();

    assert_eq!(revoked, garbage);
    assert_eq!(
        revoked.into_result().unwrap_err(),
        AuthError::InvalidOrExpiredInvite
    );
}

#[tokio::test]
async fn test_new_member_cannot_invite_until_promoted() {
    let h = Harness::new().await;
    let audit = MockAuditLogRepository::new();

    let output = h
        .inviter()
        .execute(InviteToTeamInput::link(h.team_id, Role::Contributor, ADMIN, None))
        .await
        .unwrap();
    let frank = VerifiedIdentity::new(30, "frank@example.com");
    h.acceptor()
        .execute(output.token.expose_secret(), &frank)
        .await
        .unwrap();

    let attempt = h
        .inviter()
        .execute(InviteToTeamInput::link(h.team_id, Role::Reader, frank.user_id, None))
        .await;
    assert_eq!(attempt.unwrap_err(), AuthError::Forbidden);

    AssignRoleAction::new(h.members.clone(), audit.clone())
        .execute(AssignRoleInput {
            team_id: h.team_id,
            actor_id: ADMIN,
            user_id: frank.user_id,
            role: Role::Admin,
        })
        .await
        .unwrap();

    let attempt = h
        .inviter()
        .execute(InviteToTeamInput::link(h.team_id, Role::Reader, frank.user_id, None))
        .await;
    assert!(attempt.is_ok());

    let entries = audit.find_by_team(h.team_id, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, PrivilegedAction::AssignRole);
    assert_eq!(entries[0].actor_id, ADMIN);
}
