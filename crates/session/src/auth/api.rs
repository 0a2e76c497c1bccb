//! The authentication endpoints the session manager depends on

use async_trait::async_trait;
use inkpost_core::User;
use inkpost_http::types::{LoginRequest, MessageResponse, SignupRequest, VerifyEmailResponse};
use inkpost_http::{ApiClient, ClientError};

/// Authentication operations of the blog API
///
/// `ApiClient` is the production implementation; tests substitute a mock so
/// the refresh clock can be driven without real sockets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError>;
    async fn login(&self, request: &LoginRequest) -> Result<User, ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;
    async fn me(&self) -> Result<User, ClientError>;
    async fn refresh_token(&self) -> Result<(), ClientError>;
    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError>;
    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError>;
    async fn verify_email(&self, code: &str) -> Result<VerifyEmailResponse, ClientError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError> {
        Self::signup(self, request).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<User, ClientError> {
        Self::login(self, request).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        Self::logout(self).await
    }

    async fn me(&self) -> Result<User, ClientError> {
        Self::me(self).await
    }

    async fn refresh_token(&self) -> Result<(), ClientError> {
        Self::refresh_token(self).await
    }

    async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        Self::forgot_password(self, email).await
    }

    async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        Self::reset_password(self, token, new_password).await
    }

    async fn verify_email(&self, code: &str) -> Result<VerifyEmailResponse, ClientError> {
        Self::verify_email(self, code).await
    }
}
