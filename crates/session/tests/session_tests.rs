//! Session behaviour against a mock blog API

use inkpost_http::ApiClient;
use inkpost_session::services::CommentStore;
use inkpost_session::{ClientConfig, RefreshState, Session};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "A",
        "email": "a@x.com",
        "role": "reader",
        "isVerified": true
    })
}

fn comment_json() -> serde_json::Value {
    json!({
        "_id": "c1",
        "content": "Nice",
        "userId": user_json(),
        "postId": "p1",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    })
}

fn unauthorized(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({ "message": message }))
}

fn setup(server: &MockServer) -> (ApiClient, Session) {
    let config = ClientConfig {
        api_url: format!("{}/api", server.uri()),
        ..ClientConfig::default()
    };
    let client = config.build_client().unwrap();
    let session = Session::from_config(&client, &config);
    (client, session)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "accessToken=a1; Path=/; HttpOnly")
                .set_body_json(json!({ "user": user_json() })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_expired_credential_is_refreshed_once_and_retried() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/p1/comments"))
        .respond_with(unauthorized("jwt expired"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts/p1/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "comments": [comment_json()]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = setup(&server);
    session.login("a@x.com", "secret1").await.unwrap();

    let comments = CommentStore::new(client, session.clone());
    let loaded = comments.fetch_comments_for_post("p1").await.unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(comments.state().comments, loaded);
    assert!(session.is_authenticated());
    assert!(matches!(
        session.state().refresh,
        RefreshState::Scheduled { .. }
    ));
}

#[tokio::test]
async fn test_failed_retry_clears_user() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/p1/comments"))
        .respond_with(unauthorized("jwt expired"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = setup(&server);
    session.login("a@x.com", "secret1").await.unwrap();

    let comments = CommentStore::new(client, session.clone());
    let err = comments.fetch_comments_for_post("p1").await.unwrap_err();

    assert!(err.is_auth_expired());
    assert_eq!(session.user(), None);
    assert!(!session.has_pending_refresh());
    assert_eq!(comments.state().error.as_deref(), Some("jwt expired"));
}

#[tokio::test]
async fn test_failed_refresh_skips_retry() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/posts/p1/comments"))
        .respond_with(unauthorized("jwt expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(unauthorized("Refresh token expired"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session) = setup(&server);
    session.login("a@x.com", "secret1").await.unwrap();

    let comments = CommentStore::new(client, session.clone());
    let err = comments.fetch_comments_for_post("p1").await.unwrap_err();

    assert_eq!(err.server_message(), Some("jwt expired"));
    assert_eq!(session.user(), None);
}

#[tokio::test]
async fn test_fetch_user_without_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(unauthorized("Not authenticated"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(unauthorized("No refresh token"))
        .expect(1)
        .mount(&server)
        .await;

    let (_, session) = setup(&server);
    assert_eq!(session.fetch_user().await, None);

    let state = session.state();
    assert_eq!(state.user, None);
    assert_eq!(state.error, None);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_logout_survives_server_failure() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let (_, session) = setup(&server);
    session.login("a@x.com", "secret1").await.unwrap();
    session.logout().await;

    let state = session.state();
    assert_eq!(state.user, None);
    assert_eq!(state.refresh, RefreshState::Idle);
    assert!(!session.has_pending_refresh());
}

#[tokio::test]
async fn test_verify_email_reports_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-email"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid code" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_, session) = setup(&server);
    let err = session.verify_email("123456").await.unwrap_err();

    assert_eq!(err.server_message(), Some("invalid code"));
    assert_eq!(session.state().error.as_deref(), Some("invalid code"));
    assert_eq!(session.user(), None);
}
