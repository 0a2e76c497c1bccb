//! Authentication state and the session manager

pub mod api;
pub mod context;
pub mod error_messages;
pub mod scheduler;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::AuthApi;
pub use context::Session;
pub use state::{RefreshState, SessionState};
