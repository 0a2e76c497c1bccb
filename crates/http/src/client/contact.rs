//! Contact form client method

use super::{ApiClient, ClientError};
use crate::types::{ContactMessage, MessageResponse};
use reqwest::Method;

impl ApiClient {
    /// Send the contact form
    pub async fn send_contact(
        &self,
        message: &ContactMessage,
    ) -> Result<MessageResponse, ClientError> {
        let req = self.request(Method::POST, &["contact"]).json(message);
        self.execute(req).await
    }
}
