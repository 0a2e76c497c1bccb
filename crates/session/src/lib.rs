//! Inkpost session management
//!
//! The [`Session`] keeps the logged-in user, renews the credential in the
//! background and recovers protected requests from a single expired
//! credential. Content stores and the content gate build on it.

pub mod auth;
pub mod auth_guard;
pub mod client_wrapper;
pub mod config;
pub mod services;

pub use auth::{AuthApi, RefreshState, Session, SessionState};
pub use config::{AuthConfig, ClientConfig};
