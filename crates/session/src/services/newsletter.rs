//! Newsletter store

use super::{impl_tracked, with_store_state};
use crate::auth::Session;
use crate::auth::error_messages::{FETCH_SUBSCRIBERS_FAILED, SUBSCRIBE_FAILED};
use inkpost_core::Subscriber;
use inkpost_core::validation::validate_email;
use inkpost_http::types::{MessageResponse, SubscribersResponse};
use inkpost_http::{ApiClient, ClientError};
use tokio::sync::watch;

const SUBSCRIBED: &str = "Successfully subscribed to the newsletter";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsletterState {
    pub subscribers: Vec<Subscriber>,
    pub subscriber_count: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Confirmation from the last subscription
    pub success: Option<String>,
}

impl_tracked!(NewsletterState);

pub struct NewsletterStore {
    client: ApiClient,
    session: Session,
    state: watch::Sender<NewsletterState>,
}

impl NewsletterStore {
    pub fn new(client: ApiClient, session: Session) -> Self {
        let (state, _) = watch::channel(NewsletterState::default());
        Self {
            client,
            session,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NewsletterState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> NewsletterState {
        self.state.borrow().clone()
    }

    /// Subscribe `email`, returning the confirmation to show
    pub async fn subscribe_email(&self, email: &str) -> Result<String, ClientError> {
        self.state.send_modify(|s| s.success = None);
        if let Err(err) = validate_email(email) {
            self.state.send_modify(|s| s.error = Some(err.message.clone()));
            return Err(err.into());
        }

        let response: MessageResponse = with_store_state(
            &self.state,
            SUBSCRIBE_FAILED,
            async {
                let response = self.client.subscribe(email.trim()).await?;
                match response.success {
                    Some(false) => Err(declined(response.message, SUBSCRIBE_FAILED)),
                    _ => Ok(response),
                }
            },
            |s, response: &MessageResponse| s.success = Some(confirmation(response)),
        )
        .await?;
        Ok(confirmation(&response))
    }

    /// Load the subscriber list (admins only)
    pub async fn fetch_subscribers(&self) -> Result<Vec<Subscriber>, ClientError> {
        let response: SubscribersResponse = with_store_state(
            &self.state,
            FETCH_SUBSCRIBERS_FAILED,
            async {
                let listing = self.session.authenticated(|| self.client.list_subscribers());
                let response = listing.await?;
                match response.success {
                    Some(false) => Err(declined(response.message, FETCH_SUBSCRIBERS_FAILED)),
                    _ => Ok(response),
                }
            },
            |s, response: &SubscribersResponse| {
                s.subscribers.clone_from(&response.data);
                s.subscriber_count = response.count;
            },
        )
        .await?;
        Ok(response.data)
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_success(&self) {
        self.state.send_modify(|s| s.success = None);
    }

    pub fn clear_messages(&self) {
        self.state.send_modify(|s| {
            s.error = None;
            s.success = None;
        });
    }
}

fn confirmation(response: &MessageResponse) -> String {
    response
        .message
        .clone()
        .unwrap_or_else(|| SUBSCRIBED.to_string())
}

/// A 200 answer carrying `success: false`
fn declined(message: Option<String>, fallback: &str) -> ClientError {
    ClientError::BadRequest(message.unwrap_or_else(|| fallback.to_string()))
}
