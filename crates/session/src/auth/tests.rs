use super::api::MockAuthApi;
use super::error_messages::SESSION_EXPIRED;
use super::{RefreshState, Session};
use crate::config::AuthConfig;
use inkpost_core::User;
use inkpost_http::types::{MessageResponse, VerifyEmailResponse};
use inkpost_http::{ClientError, ErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};

const INTERVAL: Duration = AuthConfig::TOKEN_REFRESH_INTERVAL;

fn reader() -> User {
    User {
        id: "u1".into(),
        name: "A".into(),
        email: "a@x.com".into(),
        role: "reader".into(),
        is_verified: true,
    }
}

fn unverified() -> User {
    User {
        is_verified: false,
        ..reader()
    }
}

fn expired(message: &str) -> ClientError {
    ClientError::AuthenticationFailed(message.into())
}

fn session_with(mock: MockAuthApi) -> Session {
    Session::new(Arc::new(mock), INTERVAL)
}

fn expect_login(mock: &mut MockAuthApi, user: fn() -> User) {
    mock.expect_login()
        .withf(|req| req.email == "a@x.com" && req.password == "secret1")
        .returning(move |_| Ok(user()));
}

fn count_refreshes(
    mock: &mut MockAuthApi,
    outcome: fn() -> Result<(), ClientError>,
) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    mock.expect_refresh_token().returning(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        outcome()
    });
    calls
}

#[tokio::test(start_paused = true)]
async fn test_login_caches_user_and_arms_refresh() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let refreshes = count_refreshes(&mut mock, || Ok(()));
    let session = session_with(mock);
    let start = Instant::now();

    let user = session.login("a@x.com", "secret1").await;
    assert_eq!(user, Some(reader()));

    let state = session.state();
    assert_eq!(state.user, Some(reader()));
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.refresh, RefreshState::Scheduled { at: start + INTERVAL });
    assert!(session.has_pending_refresh());

    sleep(INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    // re-armed one interval after the refresh fired
    let RefreshState::Scheduled { at } = session.state().refresh else {
        panic!("refresh should be scheduled again");
    };
    assert!(at >= start + INTERVAL * 2);
    assert!(at < start + INTERVAL * 2 + Duration::from_secs(1));
    assert!(session.is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_login_sends_trimmed_email() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let session = session_with(mock);

    let user = session.login(" a@x.com\t", "secret1").await;
    assert_eq!(user, Some(reader()));
    assert_eq!(session.state().error, None);
}

#[tokio::test(start_paused = true)]
async fn test_second_login_replaces_timer() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let refreshes = count_refreshes(&mut mock, || Ok(()));
    let session = session_with(mock);
    let start = Instant::now();

    session.login("a@x.com", "secret1").await;
    sleep(Duration::from_secs(5 * 60)).await;
    session.login("a@x.com", "secret1").await;

    // the first timer would have fired here
    sleep_until(start + INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);

    sleep_until(start + Duration::from_secs(5 * 60) + INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_logout_clears_session_when_remote_fails() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    mock.expect_logout().times(1).returning(|| {
        Err(ClientError::ServerError {
            status: 500,
            message: "boom".into(),
        })
    });
    let refreshes = count_refreshes(&mut mock, || Ok(()));
    let session = session_with(mock);

    session.login("a@x.com", "secret1").await;
    session.logout().await;

    let state = session.state();
    assert_eq!(state.user, None);
    assert!(!state.loading);
    assert_eq!(state.refresh, RefreshState::Idle);
    assert!(!session.has_pending_refresh());

    sleep(INTERVAL * 3).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_background_refresh_failure_ends_session() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let refreshes = count_refreshes(&mut mock, || Err(expired("Refresh token expired")));
    let session = session_with(mock);
    let mut updates = session.subscribe();

    session.login("a@x.com", "secret1").await;
    sleep(INTERVAL + Duration::from_secs(1)).await;

    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    let state = updates.borrow_and_update().clone();
    assert_eq!(state.user, None);
    assert_eq!(state.refresh, RefreshState::Idle);
    assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED));
    assert!(!session.has_pending_refresh());

    sleep(INTERVAL * 2).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_stops_timer() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let refreshes = count_refreshes(&mut mock, || Ok(()));
    let session = session_with(mock);

    session.login("a@x.com", "secret1").await;
    drop(session);

    sleep(INTERVAL * 2).await;
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_login_failure_keeps_user_unset() {
    let mut mock = MockAuthApi::new();
    mock.expect_login()
        .returning(|_| Err(ClientError::BadRequest("Invalid credentials".into())));
    let session = session_with(mock);

    assert_eq!(session.login("a@x.com", "wrong").await, None);

    let state = session.state();
    assert_eq!(state.user, None);
    assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
    assert!(!state.loading);
    assert!(!session.has_pending_refresh());
}

#[tokio::test]
async fn test_signup_validation_skips_network() {
    let mut mock = MockAuthApi::new();
    mock.expect_signup().never();
    let session = session_with(mock);

    assert_eq!(session.signup("A", "a@x.com", "secret1").await, None);
    assert_eq!(
        session.state().error.as_deref(),
        Some("Full name must be at least 2 characters")
    );

    assert_eq!(session.signup("Ann", "a@x", "secret1").await, None);
    assert_eq!(
        session.state().error.as_deref(),
        Some("Please enter a valid email address")
    );
}

#[tokio::test]
async fn test_verify_email_rejection_keeps_user() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, unverified);
    mock.expect_verify_email()
        .withf(|code| code == "123456")
        .times(1)
        .returning(|_| Err(ClientError::BadRequest("invalid code".into())));
    mock.expect_refresh_token().never();
    let session = session_with(mock);

    session.login("a@x.com", "secret1").await;
    let err = session.verify_email("123456").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Rejected);
    let state = session.state();
    assert_eq!(state.error.as_deref(), Some("invalid code"));
    assert_eq!(state.user, Some(unverified()));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_verify_email_success_caches_user() {
    let mut mock = MockAuthApi::new();
    mock.expect_verify_email().returning(|_| {
        Ok(VerifyEmailResponse {
            user: Some(reader()),
            message: Some("Email verified".into()),
        })
    });
    let session = session_with(mock);

    let user = session.verify_email(" 123456 ").await.unwrap();
    assert_eq!(user, Some(reader()));

    let state = session.state();
    assert_eq!(state.user, Some(reader()));
    assert_eq!(state.notice.as_deref(), Some("Email verified"));
    assert!(session.has_pending_refresh());
}

#[tokio::test]
async fn test_verify_email_rejects_malformed_code_locally() {
    let mut mock = MockAuthApi::new();
    mock.expect_verify_email().never();
    let session = session_with(mock);

    let err = session.verify_email("12ab").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(session.state().error.is_some());
}

#[tokio::test]
async fn test_fetch_user_without_session_records_no_error() {
    let mut mock = MockAuthApi::new();
    mock.expect_me()
        .times(1)
        .returning(|| Err(expired("Not authenticated")));
    let refreshes = count_refreshes(&mut mock, || Err(expired("No refresh token")));
    let session = session_with(mock);

    assert_eq!(session.fetch_user().await, None);

    let state = session.state();
    assert_eq!(state.user, None);
    assert_eq!(state.error, None);
    assert!(!state.loading);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_user_records_server_failure() {
    let mut mock = MockAuthApi::new();
    mock.expect_me().returning(|| {
        Err(ClientError::ServerError {
            status: 503,
            message: "Database unavailable".into(),
        })
    });
    mock.expect_refresh_token().never();
    let session = session_with(mock);

    assert_eq!(session.fetch_user().await, None);
    assert_eq!(
        session.state().error.as_deref(),
        Some("Database unavailable")
    );
}

#[tokio::test]
async fn test_fetch_user_recovers_with_one_refresh() {
    let mut mock = MockAuthApi::new();
    let mut seq = mockall::Sequence::new();
    mock.expect_me()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Err(expired("jwt expired")));
    mock.expect_refresh_token()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(()));
    mock.expect_me()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(reader()));
    let session = session_with(mock);

    assert_eq!(session.fetch_user().await, Some(reader()));
    assert!(session.has_pending_refresh());
}

#[tokio::test]
async fn test_failed_retry_clears_user() {
    let mut mock = MockAuthApi::new();
    expect_login(&mut mock, reader);
    let refreshes = count_refreshes(&mut mock, || Ok(()));
    let session = session_with(mock);
    session.login("a@x.com", "secret1").await;

    let attempts = AtomicUsize::new(0);
    let result: Result<(), ClientError> = session
        .authenticated(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(expired("jwt expired")) }
        })
        .await;

    assert!(result.unwrap_err().is_auth_expired());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(session.user(), None);
    assert!(!session.has_pending_refresh());
}

#[tokio::test]
async fn test_non_auth_failure_is_not_retried() {
    let mut mock = MockAuthApi::new();
    mock.expect_refresh_token().never();
    let session = session_with(mock);

    let attempts = AtomicUsize::new(0);
    let result: Result<(), ClientError> = session
        .authenticated(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(ClientError::NotFound("Post not found".into())) }
        })
        .await;

    assert!(matches!(result, Err(ClientError::NotFound(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_password_flows_record_notice() {
    let mut mock = MockAuthApi::new();
    mock.expect_forgot_password()
        .withf(|email| email == "a@x.com")
        .returning(|_| {
            Ok(MessageResponse {
                success: Some(true),
                message: Some("Reset link sent".into()),
            })
        });
    mock.expect_reset_password().never();
    let session = session_with(mock);

    assert_eq!(
        session.forgot_password("a@x.com").await.as_deref(),
        Some("Reset link sent")
    );
    assert_eq!(session.state().notice.as_deref(), Some("Reset link sent"));
    assert_eq!(session.user(), None);

    assert_eq!(session.reset_password("tok", "short").await, None);
    let state = session.state();
    assert_eq!(state.notice, None);
    assert_eq!(
        state.error.as_deref(),
        Some("Password must be at least 8 characters")
    );
}
