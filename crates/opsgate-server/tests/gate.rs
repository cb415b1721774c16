//! End-to-end gate behavior through the router.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::TimeDelta;
use opsgate_core::OpsgateConfig;
use opsgate_server::{AppState, create_router};
use opsgate_token::{Claims, SigningKey, TokenSigner};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn test_state(secret: Option<&str>) -> AppState {
    let mut config = OpsgateConfig::default();
    config.auth.secret = secret.map(String::from);
    config.auth.secret_env = None;
    AppState::new(config)
}

fn bearer_for(email: &str) -> String {
    let claims = Claims {
        sub: Some("g-1".into()),
        email: Some(email.into()),
        name: Some("Test".into()),
        ..Claims::default()
    };
    let token = TokenSigner::new(SigningKey::new(SECRET), TimeDelta::days(7))
        .mint(&claims)
        .unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_credential_is_denied_with_signals() {
    let app = create_router(test_state(Some(SECRET)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-redirect"], "/login");
    assert_eq!(response.headers()["x-clear-token"], "true");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(body_json(response).await["error"], "Access denied");
}

#[tokio::test]
async fn denial_bodies_do_not_disclose_the_cause() {
    let app = create_router(test_state(Some(SECRET)));

    let mut bodies = Vec::new();
    for authorization in ["Bearer abc.def", "Bearer "] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/user")
                    .header(header::AUTHORIZATION, authorization)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(body_json(response).await);
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn verified_session_sees_its_identity() {
    let app = create_router(test_state(Some(SECRET)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/user")
                .header(header::AUTHORIZATION, bearer_for("someone@example.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "someone@example.com");
    assert_eq!(body["user"]["privileged"], false);
}

#[tokio::test]
async fn roster_member_is_privileged() {
    let app = create_router(test_state(Some(SECRET)));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/user")
                .header(header::AUTHORIZATION, bearer_for("avery.collins@glitchhq.io"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["user"]["privileged"], true);
}

#[tokio::test]
async fn hash_requires_roster_membership() {
    let app = create_router(test_state(Some(SECRET)));

    // Valid credential, not on the roster: forbidden, and no discard
    // signal (the credential itself is fine).
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/hash")
                .header(header::AUTHORIZATION, bearer_for("someone@example.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!response.headers().contains_key("x-clear-token"));
    assert!(!response.headers().contains_key("x-redirect"));

    // Roster member: 16 random bytes as uppercase hex.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/hash")
                .header(header::AUTHORIZATION, bearer_for("avery.collins@glitchhq.io"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let hash = body["hash"].as_str().unwrap();
    assert_eq!(hash.len(), 32);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
}

#[tokio::test]
async fn operatives_enumeration_requires_a_session() {
    let app = create_router(test_state(Some(SECRET)));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/operatives")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/operatives")
                .header(header::AUTHORIZATION, bearer_for("someone@example.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["operatives"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn missing_secret_is_a_server_error_not_a_denial() {
    let app = create_router(test_state(None));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/user")
                .header(header::AUTHORIZATION, bearer_for("someone@example.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.headers().contains_key("x-clear-token"));
    assert!(!response.headers().contains_key("x-redirect"));
}

#[tokio::test]
async fn healthz_is_public() {
    let app = create_router(test_state(Some(SECRET)));
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn issuance_rejects_bad_bodies() {
    let app = create_router(test_state(Some(SECRET)));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/google")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/google")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"idToken":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
