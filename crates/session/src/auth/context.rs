//! Session manager

use super::api::AuthApi;
use super::error_messages::{
    FETCH_USER_FAILED, FORGOT_PASSWORD_FAILED, LOGIN_FAILED, RESET_PASSWORD_FAILED,
    SESSION_EXPIRED, SIGNUP_FAILED, VERIFY_EMAIL_FAILED, get_user_friendly_error,
};
use super::scheduler::RefreshScheduler;
use super::state::{RefreshState, SessionState};
use crate::config::ClientConfig;
use inkpost_core::User;
use inkpost_core::validation::{
    validate_email, validate_login, validate_new_password, validate_signup,
    validate_verification_code,
};
use inkpost_http::types::{LoginRequest, SignupRequest};
use inkpost_http::{ApiClient, ClientError};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

pub(crate) struct SessionInner {
    pub(crate) api: Arc<dyn AuthApi>,
    pub(crate) state: watch::Sender<SessionState>,
    pub(crate) scheduler: RefreshScheduler,
    refresh_interval: Duration,
}

/// Handle to the client-side session
///
/// Cloning is cheap and every clone drives the same state. The refresh timer
/// holds only a weak reference, so dropping the last handle stops it.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

impl Session {
    pub fn new(api: Arc<dyn AuthApi>, refresh_interval: Duration) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(SessionInner {
                api,
                state,
                scheduler: RefreshScheduler::new(),
                refresh_interval,
            }),
        }
    }

    /// Create a session over `client` using the configured refresh interval
    pub fn from_config(client: &ApiClient, config: &ClientConfig) -> Self {
        Self::new(Arc::new(client.clone()), config.refresh_interval())
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Whether a background refresh timer is live
    pub fn has_pending_refresh(&self) -> bool {
        self.inner.scheduler.is_armed()
    }

    pub fn clear_error(&self) {
        self.inner.state.send_modify(|s| s.error = None);
    }

    pub fn clear_notice(&self) {
        self.inner.state.send_modify(|s| s.notice = None);
    }

    /// Create an account and log it in
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Option<User> {
        self.begin();
        if let Err(err) = validate_signup(name, email, password) {
            self.fail(&err.into(), SIGNUP_FAILED);
            return None;
        }

        let request = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.inner.api.signup(&request).await {
            Ok(user) => {
                info!(user_id = %user.id, "account created");
                self.establish(user.clone());
                Some(user)
            }
            Err(err) => {
                self.fail(&err, SIGNUP_FAILED);
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Option<User> {
        self.begin();
        if let Err(err) = validate_login(email, password) {
            self.fail(&err.into(), LOGIN_FAILED);
            return None;
        }

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.inner.api.login(&request).await {
            Ok(user) => {
                info!(user_id = %user.id, "logged in");
                self.establish(user.clone());
                Some(user)
            }
            Err(err) => {
                self.fail(&err, LOGIN_FAILED);
                None
            }
        }
    }

    /// End the session locally, whatever the API answers
    pub async fn logout(&self) {
        self.begin();
        self.inner.scheduler.cancel();

        if let Err(err) = self.inner.api.logout().await {
            warn!(error = %err, "remote logout failed, clearing local session");
        }

        // a refresh may have been armed while the request was in flight
        self.inner.scheduler.cancel();
        self.inner.state.send_modify(|s| {
            s.user = None;
            s.loading = false;
            s.refresh = RefreshState::Idle;
        });
        info!("logged out");
    }

    /// Ask the API who the current session belongs to
    ///
    /// A plain "not logged in" answer clears the user without recording an
    /// error.
    pub async fn fetch_user(&self) -> Option<User> {
        self.begin();
        let api = &self.inner.api;
        match self.authenticated(|| api.me()).await {
            Ok(user) => {
                debug!(user_id = %user.id, "session confirmed");
                self.establish(user.clone());
                Some(user)
            }
            Err(err) => {
                self.inner.scheduler.cancel();
                let error = (!err.is_auth_expired())
                    .then(|| get_user_friendly_error(&err, FETCH_USER_FAILED));
                self.inner.state.send_modify(|s| {
                    s.user = None;
                    s.loading = false;
                    s.refresh = RefreshState::Idle;
                    s.error = error;
                });
                None
            }
        }
    }

    /// Renew the credential once; failure ends the session
    pub async fn refresh_token(&self) -> bool {
        self.begin();
        match self.inner.api.refresh_token().await {
            Ok(()) => {
                debug!("credential refreshed");
                if self.is_authenticated() {
                    self.rearm();
                }
                self.inner.state.send_modify(|s| s.loading = false);
                true
            }
            Err(err) => {
                warn!(error = %err, "credential refresh failed");
                self.end_session();
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(SESSION_EXPIRED.to_string());
                });
                false
            }
        }
    }

    /// Request a password reset email
    pub async fn forgot_password(&self, email: &str) -> Option<String> {
        self.begin();
        if let Err(err) = validate_email(email) {
            self.fail(&err.into(), FORGOT_PASSWORD_FAILED);
            return None;
        }

        match self.inner.api.forgot_password(email.trim()).await {
            Ok(response) => Some(self.record_notice(response.message)),
            Err(err) => {
                self.fail(&err, FORGOT_PASSWORD_FAILED);
                None
            }
        }
    }

    /// Set a new password with the token from a reset email
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Option<String> {
        self.begin();
        if let Err(err) = validate_new_password(new_password) {
            self.fail(&err.into(), RESET_PASSWORD_FAILED);
            return None;
        }

        match self.inner.api.reset_password(token, new_password).await {
            Ok(response) => Some(self.record_notice(response.message)),
            Err(err) => {
                self.fail(&err, RESET_PASSWORD_FAILED);
                None
            }
        }
    }

    /// Exchange an email verification code
    ///
    /// Unlike the other operations the failure is also handed back, so a
    /// form can stay open on a rejected code. Never retried.
    ///
    /// # Errors
    ///
    /// Returns the validation or API error; `error` carries its message.
    pub async fn verify_email(&self, code: &str) -> Result<Option<User>, ClientError> {
        self.begin();
        let code = code.trim();
        if let Err(err) = validate_verification_code(code) {
            let err = ClientError::from(err);
            self.fail(&err, VERIFY_EMAIL_FAILED);
            return Err(err);
        }

        match self.inner.api.verify_email(code).await {
            Ok(response) => {
                if let Some(message) = response.message {
                    self.inner.state.send_modify(|s| s.notice = Some(message));
                }
                match response.user {
                    Some(user) => {
                        info!(user_id = %user.id, "email verified");
                        self.establish(user.clone());
                        Ok(Some(user))
                    }
                    None => {
                        self.inner.state.send_modify(|s| s.loading = false);
                        Ok(None)
                    }
                }
            }
            Err(err) => {
                self.fail(&err, VERIFY_EMAIL_FAILED);
                Err(err)
            }
        }
    }

    fn begin(&self) {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
            s.notice = None;
        });
    }

    fn fail(&self, err: &ClientError, fallback: &str) {
        debug!(error = %err, "session operation failed");
        let message = get_user_friendly_error(err, fallback);
        self.inner.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    fn record_notice(&self, message: Option<String>) -> String {
        let message = message.unwrap_or_default();
        self.inner.state.send_modify(|s| {
            s.loading = false;
            s.notice = Some(message.clone());
        });
        message
    }

    /// Cache `user` and (re)arm the refresh timer
    fn establish(&self, user: User) {
        let at = self.arm_refresh();
        self.inner.state.send_modify(|s| {
            s.user = Some(user);
            s.loading = false;
            s.refresh = RefreshState::Scheduled { at };
        });
    }

    pub(crate) fn rearm(&self) {
        let at = self.arm_refresh();
        self.inner
            .state
            .send_modify(|s| s.refresh = RefreshState::Scheduled { at });
    }

    /// Drop the session locally: no timer, no user
    pub(crate) fn end_session(&self) {
        self.inner.scheduler.cancel();
        self.inner.state.send_modify(|s| {
            s.user = None;
            s.refresh = RefreshState::Idle;
        });
    }

    fn arm_refresh(&self) -> Instant {
        let interval = self.inner.refresh_interval;
        let first = Instant::now() + interval;
        let session = Arc::downgrade(&self.inner);

        self.inner
            .scheduler
            .arm(move |generation| refresh_loop(session, generation, first, interval));
        first
    }
}

async fn refresh_loop(
    session: Weak<SessionInner>,
    generation: u64,
    first: Instant,
    interval: Duration,
) {
    let mut deadline = first;
    loop {
        sleep_until(deadline).await;
        let Some(inner) = session.upgrade() else {
            return;
        };

        inner
            .state
            .send_modify(|s| s.refresh = RefreshState::Refreshing);
        match inner.api.refresh_token().await {
            Ok(()) => {
                deadline = Instant::now() + interval;
                inner
                    .state
                    .send_modify(|s| s.refresh = RefreshState::Scheduled { at: deadline });
                debug!(next_in_secs = interval.as_secs(), "background refresh succeeded");
            }
            Err(err) => {
                warn!(error = %err, "background refresh failed, ending session");
                inner.scheduler.release(generation);
                inner.state.send_modify(|s| {
                    s.user = None;
                    s.refresh = RefreshState::Idle;
                    s.error = Some(SESSION_EXPIRED.to_string());
                });
                return;
            }
        }
    }
}
