//! Newsletter API client methods

use super::{ApiClient, ClientError};
use crate::types::{MessageResponse, SubscribeRequest, SubscribersResponse};
use reqwest::Method;

impl ApiClient {
    /// Subscribe an email address to the newsletter
    pub async fn subscribe(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let req = self
            .request(Method::POST, &["newsletter", "subscribe"])
            .json(&SubscribeRequest {
                email: email.to_string(),
            });
        self.execute(req).await
    }

    /// List subscribers (requires an admin session)
    pub async fn list_subscribers(&self) -> Result<SubscribersResponse, ClientError> {
        let req = self.request(Method::GET, &["newsletter", "subscribers"]);
        self.execute(req).await
    }
}
