//! Concurrent acceptance of a single invitation.
//!
//! Run with: `cargo test --features mocks --test concurrency`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::join_all;
use tipgate::teams::{
    AcceptInvitationAction, CreateInvitation, MockTeamInvitationRepository,
    TeamInvitationRepository, TeamMembershipRepository,
};
use tipgate::{AcceptOutcome, InviteKind, RejectReason, VerifiedIdentity, invite_token};

const TEAM_ID: i64 = 1;
const CONTENDERS: i64 = 32;

async fn link_invite(repo: &MockTeamInvitationRepository, max_uses: u32) -> String {
    let token = invite_token::create_token(InviteKind::Link).unwrap();
    repo.create(CreateInvitation {
        team_id: TEAM_ID,
        kind: InviteKind::Link,
        email: None,
        role: "contributor".to_owned(),
        token_hash: invite_token::hash(token.expose_secret()),
        invited_by: 1,
        expires_at: Utc::now() + Duration::hours(1),
        max_uses,
    })
    .await
    .unwrap();
    token.expose_secret().to_owned()
}

async fn race(
    action: Arc<AcceptInvitationAction<MockTeamInvitationRepository>>,
    token: Arc<String>,
    identities: Vec<VerifiedIdentity>,
) -> Vec<AcceptOutcome> {
    let handles = identities.into_iter().map(|identity| {
        let action = Arc::clone(&action);
        let token = Arc::clone(&token);
        tokio::spawn(async move { action.execute(&token, &identity).await.unwrap() })
    });

    join_all(handles)
        .await
        .into_iter()
        .map(Result::unwrap)
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_single_use_link_grants_exactly_once() {
    let repo = MockTeamInvitationRepository::new();
    let token = link_invite(&repo, 1).await;
    let action = Arc::new(AcceptInvitationAction::new(repo.clone()));

    let identities = (0..CONTENDERS)
        .map(|i| VerifiedIdentity::new(100 + i, format!("racer{i}@example.com")))
        .collect();
    let outcomes = race(action, Arc::new(token.clone()), identities).await;

    let accepted = outcomes
        .iter()
        .filter(|o| matches!(o, AcceptOutcome::Accepted(_)))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|o| **o == AcceptOutcome::Rejected(RejectReason::InvalidOrExpired))
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(rejected, outcomes.len() - 1);

    assert_eq!(repo.memberships().find_by_team(TEAM_ID).await.unwrap().len(), 1);
    let invitation = repo
        .find_by_token_hash(&invite_token::hash(&token))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invitation.use_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_capped_link_never_overshoots() {
    let repo = MockTeamInvitationRepository::new();
    let token = link_invite(&repo, 5).await;
    let action = Arc::new(AcceptInvitationAction::new(repo.clone()));

    let identities = (0..CONTENDERS)
        .map(|i| VerifiedIdentity::new(200 + i, format!("crowd{i}@example.com")))
        .collect();
    let outcomes = race(action, Arc::new(token.clone()), identities).await;

    let accepted = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(accepted, 5);
    assert_eq!(repo.memberships().find_by_team(TEAM_ID).await.unwrap().len(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_user_racing_joins_once() {
    let repo = MockTeamInvitationRepository::new();
    let token = link_invite(&repo, 10).await;
    let action = Arc::new(AcceptInvitationAction::new(repo.clone()));

    let identities = (0..8)
        .map(|_| VerifiedIdentity::new(7, "solo@example.com"))
        .collect();
    let outcomes = race(action, Arc::new(token.clone()), identities).await;

    let accepted = outcomes
        .iter()
        .filter(|o| matches!(o, AcceptOutcome::Accepted(_)))
        .count();
    let replays = outcomes
        .iter()
        .filter(|o| matches!(o, AcceptOutcome::AlreadyAccepted(_)))
        .count();
    assert_eq!((accepted, replays), (1, 7));
    assert_eq!(repo.memberships().count_for(TEAM_ID, 7), 1);

    let invitation = repo
        .find_by_token_hash(&invite_token::hash(&token))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invitation.use_count, 1);
}
