//! Comment store
//!
//! Comment threads are members-only, so every request here needs a session.

use super::{impl_tracked, with_store_state};
use crate::auth::Session;
use crate::auth::error_messages::{
    CREATE_COMMENT_FAILED, DELETE_COMMENT_FAILED, FETCH_COMMENTS_FAILED, UPDATE_COMMENT_FAILED,
};
use inkpost_core::Comment;
use inkpost_core::validation::validate_comment;
use inkpost_http::{ApiClient, ClientError};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentState {
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_tracked!(CommentState);

pub struct CommentStore {
    client: ApiClient,
    session: Session,
    state: watch::Sender<CommentState>,
}

impl CommentStore {
    pub fn new(client: ApiClient, session: Session) -> Self {
        let (state, _) = watch::channel(CommentState::default());
        Self {
            client,
            session,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CommentState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CommentState {
        self.state.borrow().clone()
    }

    pub async fn fetch_comments_for_post(
        &self,
        post_id: &str,
    ) -> Result<Vec<Comment>, ClientError> {
        with_store_state(
            &self.state,
            FETCH_COMMENTS_FAILED,
            self.session.authenticated(|| self.client.list_comments(post_id)),
            |s, comments| s.comments.clone_from(comments),
        )
        .await
    }

    /// Post a comment; the body is trimmed and length-checked first
    pub async fn create_comment(
        &self,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let content = self.validated(content)?;
        with_store_state(
            &self.state,
            CREATE_COMMENT_FAILED,
            self.session
                .authenticated(|| self.client.create_comment(post_id, content)),
            |s, comment| s.comments.push(comment.clone()),
        )
        .await
    }

    pub async fn update_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let content = self.validated(content)?;
        with_store_state(
            &self.state,
            UPDATE_COMMENT_FAILED,
            self.session
                .authenticated(|| self.client.update_comment(post_id, comment_id, content)),
            |s, comment| {
                if let Some(existing) = s.comments.iter_mut().find(|c| c.id == comment_id) {
                    *existing = comment.clone();
                }
            },
        )
        .await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ClientError> {
        with_store_state(
            &self.state,
            DELETE_COMMENT_FAILED,
            self.session
                .authenticated(|| self.client.delete_comment(post_id, comment_id)),
            |s, _| s.comments.retain(|c| c.id != comment_id),
        )
        .await
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_comments(&self) {
        self.state.send_modify(|s| s.comments.clear());
    }

    fn validated<'a>(&self, content: &'a str) -> Result<&'a str, ClientError> {
        validate_comment(content).map_err(|err| {
            self.state.send_modify(|s| s.error = Some(err.message.clone()));
            ClientError::from(err)
        })
    }
}
