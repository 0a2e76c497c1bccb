//! Refresh-and-retry for requests that need a live session

use crate::auth::Session;
use inkpost_http::ClientError;
use std::future::Future;
use tracing::{debug, warn};

impl Session {
    /// Run a protected request, recovering once from an expired credential
    ///
    /// On a 401 the credential is refreshed and `request` is issued exactly
    /// once more. If the refresh or the retry fails the session is dropped
    /// and the error is returned. Other failures pass straight through.
    ///
    /// # Errors
    ///
    /// Returns the request's error, or the refresh error when the refresh
    /// failed for a reason other than an expired credential.
    pub async fn authenticated<T, F, Fut>(&self, request: F) -> Result<T, ClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let err = match request().await {
            Err(err) if err.is_auth_expired() => err,
            other => return other,
        };

        debug!("credential expired, refreshing before retry");
        if let Err(refresh_err) = self.inner.api.refresh_token().await {
            warn!(error = %refresh_err, "refresh after 401 failed, ending session");
            self.end_session();
            return Err(if refresh_err.is_auth_expired() {
                err
            } else {
                refresh_err
            });
        }

        if self.is_authenticated() {
            self.rearm();
        }

        match request().await {
            Ok(value) => Ok(value),
            Err(retry_err) => {
                warn!(error = %retry_err, "retry after refresh failed, ending session");
                self.end_session();
                Err(retry_err)
            }
        }
    }
}
