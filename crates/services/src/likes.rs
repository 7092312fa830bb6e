//! # Like Ledger
//!
//! One like per (user, post) pair, enforced by the store's uniqueness
//! contract rather than a read-then-write in here, so two racing likes
//! can never both land. Duplicate likes are rejected, not absorbed.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Actor, Like};
use domains::ports::BlogRepo;

use crate::policy::{authorize, Action};

/// What the like button needs: the total and the caller's own like, if
/// any, so the surface can offer like or unlike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeState {
    pub count: u64,
    pub own_like_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct LikeService {
    repo: Arc<dyn BlogRepo>,
}

impl LikeService {
    pub fn new(repo: Arc<dyn BlogRepo>) -> Self {
        Self { repo }
    }

    /// Records the caller's like on a post. `Conflict` when the pair
    /// already exists, `NotFound` when the post does not.
    pub async fn like(&self, actor: &Actor, post_id: Uuid) -> Result<Like> {
        authorize(Action::Like, actor, None)?;

        let like = Like {
            id: Uuid::now_v7(),
            post_id,
            user_id: actor.id.clone(),
            created_at: Utc::now(),
        };
        // Uniqueness and the post check happen inside the insert.
        self.repo.insert_like(like.clone()).await?;
        tracing::info!(like_id = %like.id, post_id = %post_id, user = %actor.id, "like recorded");
        Ok(like)
    }

    /// Removes a like. Only its owner may do this; there is no admin
    /// override for someone else's like.
    pub async fn unlike(&self, actor: &Actor, like_id: Uuid) -> Result<()> {
        let like = self
            .repo
            .get_like(like_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Like", like_id))?;
        authorize(Action::Unlike, actor, Some(&like.user_id))?;

        self.repo.remove_like(like_id).await?;
        tracing::info!(like_id = %like_id, post_id = %like.post_id, user = %actor.id, "like removed");
        Ok(())
    }

    pub async fn like_count(&self, post_id: Uuid) -> Result<u64> {
        self.repo.count_likes(post_id).await
    }

    pub async fn get_like(&self, like_id: Uuid) -> Result<Like> {
        self.repo
            .get_like(like_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Like", like_id))
    }

    /// Count plus the viewer's own like id, for rendering the button.
    pub async fn like_state(&self, post_id: Uuid, user_id: &str) -> Result<LikeState> {
        let count = self.repo.count_likes(post_id).await?;
        let own_like_id = self
            .repo
            .find_like(post_id, user_id)
            .await?
            .map(|like| like.id);
        Ok(LikeState { count, own_like_id })
    }
}
