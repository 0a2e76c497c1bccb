//! Inkpost HTTP client
//!
//! Every request goes through one [`client::ApiClient`] whose cookie jar holds
//! the session credential set by the API, so authenticated calls never carry
//! an explicit token.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder, ClientError, ErrorKind};
