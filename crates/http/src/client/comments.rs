//! Comment API client methods
//!
//! All comment endpoints require a session.

use super::{ApiClient, ClientError};
use crate::types::{CommentEnvelope, CommentRequest, CommentsEnvelope};
use inkpost_core::Comment;
use reqwest::Method;

impl ApiClient {
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, ClientError> {
        let req = self.request(Method::GET, &["posts", post_id, "comments"]);
        let envelope: CommentsEnvelope = self.execute(req).await?;
        Ok(envelope.comments)
    }

    pub async fn create_comment(
        &self,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let req = self
            .request(Method::POST, &["posts", post_id, "comments"])
            .json(&CommentRequest {
                content: content.to_string(),
            });
        let envelope: CommentEnvelope = self.execute(req).await?;
        Ok(envelope.comment)
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let req = self
            .request(Method::PUT, &["posts", post_id, "comments", comment_id])
            .json(&CommentRequest {
                content: content.to_string(),
            });
        let envelope: CommentEnvelope = self.execute(req).await?;
        Ok(envelope.comment)
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ClientError> {
        let req = self.request(Method::DELETE, &["posts", post_id, "comments", comment_id]);
        self.execute_empty(req).await
    }
}
