//! Content stores backed by the blog API
//!
//! Each store publishes its state through a watch channel, the same way the
//! session does. Requests that need a session go through
//! [`Session::authenticated`](crate::auth::Session::authenticated).

pub mod comments;
pub mod contact;
pub mod newsletter;
pub mod posts;

pub use comments::{CommentState, CommentStore};
pub use contact::send_contact;
pub use newsletter::{NewsletterState, NewsletterStore};
pub use posts::{PostState, PostStore};

use crate::auth::error_messages::get_user_friendly_error;
use inkpost_http::ClientError;
use std::future::Future;
use tokio::sync::watch;
use tracing::debug;

/// Store state carrying the common progress fields
pub(crate) trait Tracked {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

macro_rules! impl_tracked {
    ($state:ty) => {
        impl $crate::services::Tracked for $state {
            fn set_loading(&mut self, loading: bool) {
                self.loading = loading;
            }

            fn set_error(&mut self, error: Option<String>) {
                self.error = error;
            }
        }
    };
}
pub(crate) use impl_tracked;

/// Run `request` with loading and error bookkeeping
///
/// `apply` updates the store's data in the same transition that clears
/// `loading`, so subscribers never observe a finished request without its
/// result.
pub(crate) async fn with_store_state<S, T, Fut>(
    state: &watch::Sender<S>,
    fallback: &str,
    request: Fut,
    apply: impl FnOnce(&mut S, &T),
) -> Result<T, ClientError>
where
    S: Tracked,
    Fut: Future<Output = Result<T, ClientError>>,
{
    state.send_modify(|s| {
        s.set_loading(true);
        s.set_error(None);
    });

    let result = request.await;

    state.send_modify(|s| {
        s.set_loading(false);
        match &result {
            Ok(value) => apply(s, value),
            Err(err) => {
                debug!(error = %err, fallback, "store request failed");
                s.set_error(Some(get_user_friendly_error(err, fallback)));
            }
        }
    });

    result
}
