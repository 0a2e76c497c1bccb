//! Observable session state

use inkpost_core::User;
use tokio::time::Instant;

/// Where the background credential refresh stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    /// No refresh timer is live
    #[default]
    Idle,
    /// A refresh fires at `at`
    Scheduled { at: Instant },
    /// The timer fired and the refresh request is in flight
    Refreshing,
}

impl RefreshState {
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Snapshot of the session published to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// The authenticated user, if any
    pub user: Option<User>,
    /// An operation is in flight
    pub loading: bool,
    /// Human-readable failure of the last operation
    pub error: Option<String>,
    /// Confirmation from the last password or verification flow
    pub notice: Option<String>,
    pub refresh: RefreshState,
}

impl SessionState {
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
