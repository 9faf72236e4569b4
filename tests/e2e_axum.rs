//! End-to-end tests for the Axum invitation endpoints.
//!
//! These tests use mock repositories - no database required.
//! Run with: `cargo test --features "axum_api mocks" --test e2e_axum`

#![cfg(all(feature = "axum_api", feature = "mocks"))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use http_body_util::BodyExt;
use tipgate::api::axum::{InviteState, invite_routes, join_routes};
use tipgate::teams::{
    CreateMembership, CreateTeam, MockTeamInvitationRepository, MockTeamMembershipRepository,
    MockTeamRepository, TeamMembershipRepository, TeamRepository,
};
use tipgate::{InvitationConfig, VerifiedIdentity};
use tower::ServiceExt;

type State =
    InviteState<MockTeamRepository, MockTeamMembershipRepository, MockTeamInvitationRepository>;

const ADMIN: i64 = 1;

async fn create_state() -> (State, i64) {
    let teams = MockTeamRepository::new();
    let members = MockTeamMembershipRepository::new();
    let invitations = MockTeamInvitationRepository::with_memberships(members.clone());

    let team = teams
        .create(CreateTeam {
            name: "Databases".to_owned(),
            slug: "databases".to_owned(),
            owner_id: ADMIN,
        })
        .await
        .unwrap();
    members
        .create(CreateMembership {
            team_id: team.id,
            user_id: ADMIN,
            role: "admin".to_owned(),
        })
        .await
        .unwrap();

    let state = InviteState {
        team_repo: teams,
        membership_repo: members,
        invitation_repo: invitations,
        config: InvitationConfig::default(),
    };
    (state, team.id)
}

fn app(state: State, identity: VerifiedIdentity) -> Router {
    Router::new()
        .nest("/teams", invite_routes())
        .merge(join_routes())
        .layer(Extension(identity))
        .with_state(state)
}

fn admin() -> VerifiedIdentity {
    VerifiedIdentity::new(ADMIN, "admin@example.com")
}

async fn body_to_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_invite(
    state: &State,
    team_id: i64,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/teams/{team_id}/invitations"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app(state.clone(), admin()).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn join(
    state: &State,
    path: &str,
    identity: VerifiedIdentity,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app(state.clone(), identity).oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

#[tokio::test]
async fn test_create_and_accept_email_invite() {
    let (state, team_id) = create_state().await;

    let (status, json) = create_invite(
        &state,
        team_id,
        serde_json::json!({ "kind": "email", "email": "gail@example.com", "role": "reviewer" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["invitation"]["kind"], "email");
    assert_eq!(json["invitation"]["max_uses"], 1);
    assert!(json["invitation"].get("token_hash").is_none());
    let join_path = json["join_path"].as_str().unwrap().to_owned();
    assert!(join_path.starts_with("/join/bdi1.email."));

    let gail = VerifiedIdentity::new(5, "gail@example.com");
    let (status, json) = join(&state, &join_path, gail.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "accepted");
    assert_eq!(json["membership"]["role"], "reviewer");

    let (status, json) = join(&state, &join_path, gail).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "already_accepted");
}

#[tokio::test]
async fn test_join_errors() {
    let (state, team_id) = create_state().await;
    let (_, json) = create_invite(
        &state,
        team_id,
        serde_json::json!({ "kind": "email", "email": "gail@example.com", "role": "reader" }),
    )
    .await;
    let join_path = json["join_path"].as_str().unwrap().to_owned();

    let hank = VerifiedIdentity::new(6, "hank@example.com");
    let (status, json) = join(&state, &join_path, hank.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "EMAIL_MISMATCH");

    let (status, json) = join(&state, "/join/garbage", hank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_OR_EXPIRED_INVITE");
    assert_eq!(json["error"], "Invalid or expired invite");
}

#[tokio::test]
async fn test_create_invitation_validation_and_permissions() {
    let (state, team_id) = create_state().await;

    let (status, json) = create_invite(
        &state,
        team_id,
        serde_json::json!({ "kind": "link", "role": "overlord" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    for role in [" admin ", "Admin", "admin\n"] {
        let (status, json) = create_invite(
            &state,
            team_id,
            serde_json::json!({ "kind": "link", "role": role }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "role {role:?}");
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let (status, json) = create_invite(
        &state,
        team_id,
        serde_json::json!({ "kind": "email", "email": "gail@example.", "role": "reader" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, _) = create_invite(
        &state,
        999,
        serde_json::json!({ "kind": "link", "role": "reader" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    state
        .membership_repo
        .create(CreateMembership {
            team_id,
            user_id: 9,
            role: "contributor".to_owned(),
        })
        .await
        .unwrap();
    let request = Request::builder()
        .method("GET")
        .uri(format!("/teams/{team_id}/invitations"))
        .body(Body::empty())
        .unwrap();
    let response = app(state.clone(), VerifiedIdentity::new(9, "ivy@example.com"))
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_and_revoke_invitations() {
    let (state, team_id) = create_state().await;
    let (_, json) = create_invite(
        &state,
        team_id,
        serde_json::json!({ "kind": "link", "role": "contributor", "max_uses": 3 }),
    )
    .await;
    let invitation_id = json["invitation"]["id"].as_i64().unwrap();
    let join_path = json["join_path"].as_str().unwrap().to_owned();

    let request = Request::builder()
        .method("GET")
        .uri(format!("/teams/{team_id}/invitations"))
        .body(Body::empty())
        .unwrap();
    let response = app(state.clone(), admin()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["max_uses"], 3);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/teams/{team_id}/invitations/{invitation_id}"))
        .body(Body::empty())
        .unwrap();
    let response = app(state.clone(), admin()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = join(&state, &join_path, VerifiedIdentity::new(7, "jo@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
