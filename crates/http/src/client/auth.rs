//! Authentication API client methods

use super::{ApiClient, ClientError};
use crate::types::{
    ForgotPasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest, SignupRequest,
    UserEnvelope, VerifyEmailRequest, VerifyEmailResponse,
};
use inkpost_core::User;
use reqwest::Method;

impl ApiClient {
    /// Create an account; the API logs the new user in
    pub async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError> {
        let req = self
            .request(Method::POST, &["auth", "signup"])
            .json(request);
        let envelope: UserEnvelope = self.execute(req).await?;
        Ok(envelope.user)
    }

    /// Log in with email and password
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ClientError> {
        let req = self.request(Method::POST, &["auth", "login"]).json(request);
        let envelope: UserEnvelope = self.execute(req).await?;
        Ok(envelope.user)
    }

    /// Invalidate the session on the server
    pub async fn logout(&self) -> Result<(), ClientError> {
        let req = self.request(Method::POST, &["auth", "logout"]);
        self.execute_empty(req).await
    }

    /// Get the user the current session belongs to (requires a session)
    pub async fn me(&self) -> Result<User, ClientError> {
        let req = self.request(Method::GET, &["auth", "me"]);
        let envelope: UserEnvelope = self.execute(req).await?;
        Ok(envelope.user)
    }

    /// Renew the access credential; the API answers with a new cookie
    pub async fn refresh_token(&self) -> Result<(), ClientError> {
        let req = self.request(Method::POST, &["auth", "refresh-token"]);
        self.execute_empty(req).await
    }

    /// Ask for a password reset email
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, &["auth", "forgot-password"])
            .json(&ForgotPasswordRequest {
                email: email.to_string(),
            });
        self.execute(req).await
    }

    /// Set a new password using the token from the reset email
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, &["auth", "reset-password", token])
            .json(&ResetPasswordRequest {
                new_password: new_password.to_string(),
            });
        self.execute(req).await
    }

    /// Exchange an email verification code
    pub async fn verify_email(&self, code: &str) -> Result<VerifyEmailResponse, ClientError> {
        let req = self
            .request(Method::POST, &["auth", "verify-email"])
            .json(&VerifyEmailRequest {
                verification_token: code.to_string(),
            });
        self.execute(req).await
    }
}
