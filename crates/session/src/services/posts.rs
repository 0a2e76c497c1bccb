//! Post store

use super::{impl_tracked, with_store_state};
use crate::auth::Session;
use crate::auth::error_messages::{
    CREATE_POST_FAILED, DELETE_POST_FAILED, FETCH_POST_FAILED, FETCH_POSTS_FAILED,
    UPDATE_POST_FAILED,
};
use inkpost_core::{Post, PostQuery, filter};
use inkpost_http::types::{NewPost, PostUpdate};
use inkpost_http::{ApiClient, ClientError};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostState {
    pub posts: Vec<Post>,
    /// The post being viewed or edited
    pub current_post: Option<Post>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_tracked!(PostState);

impl PostState {
    /// Published posts matching `query`
    pub fn visible(&self, query: &PostQuery) -> Vec<&Post> {
        query.apply(&self.posts)
    }

    /// Distinct categories across the loaded posts
    pub fn categories(&self) -> Vec<String> {
        filter::categories(&self.posts)
    }
}

/// Post listing and management
pub struct PostStore {
    client: ApiClient,
    session: Session,
    state: watch::Sender<PostState>,
}

impl PostStore {
    pub fn new(client: ApiClient, session: Session) -> Self {
        let (state, _) = watch::channel(PostState::default());
        Self {
            client,
            session,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PostState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PostState {
        self.state.borrow().clone()
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ClientError> {
        with_store_state(
            &self.state,
            FETCH_POSTS_FAILED,
            self.client.list_posts(),
            |s, posts| s.posts.clone_from(posts),
        )
        .await
    }

    pub async fn fetch_post_by_id(&self, id: &str) -> Result<Post, ClientError> {
        with_store_state(
            &self.state,
            FETCH_POST_FAILED,
            self.client.get_post(id),
            |s, post| s.current_post = Some(post.clone()),
        )
        .await
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> Result<Post, ClientError> {
        with_store_state(
            &self.state,
            FETCH_POST_FAILED,
            self.client.get_post_by_slug(slug),
            |s, post| s.current_post = Some(post.clone()),
        )
        .await
    }

    /// Publish a new post; it is listed first and becomes current
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        let created = with_store_state(
            &self.state,
            CREATE_POST_FAILED,
            self.session.authenticated(|| self.client.create_post(post)),
            |s, post| {
                s.posts.insert(0, post.clone());
                s.current_post = Some(post.clone());
            },
        )
        .await?;
        info!(post_id = %created.id, "post created");
        Ok(created)
    }

    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> Result<Post, ClientError> {
        with_store_state(
            &self.state,
            UPDATE_POST_FAILED,
            self.session.authenticated(|| self.client.update_post(id, update)),
            |s, post| {
                if let Some(existing) = s.posts.iter_mut().find(|p| p.id == post.id) {
                    *existing = post.clone();
                }
                if s.current_post.as_ref().is_some_and(|p| p.id == post.id) {
                    s.current_post = Some(post.clone());
                }
            },
        )
        .await
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ClientError> {
        with_store_state(
            &self.state,
            DELETE_POST_FAILED,
            self.session.authenticated(|| self.client.delete_post(id)),
            |s, _| {
                s.posts.retain(|p| p.id != id);
                if s.current_post.as_ref().is_some_and(|p| p.id == id) {
                    s.current_post = None;
                }
            },
        )
        .await?;
        info!(post_id = id, "post deleted");
        Ok(())
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_current_post(&self) {
        self.state.send_modify(|s| s.current_post = None);
    }
}
