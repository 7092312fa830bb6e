//! # Blog Service
//!
//! Staff-authored articles. Authorship is gated on the Dev role; the
//! delete path removes the post's likes in the same unit of work so the
//! ledger never holds likes against a missing post.

use std::sync::Arc;

use chrono::Utc;
use configs::ContentLimits;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Actor, BlogPost};
use domains::ports::BlogRepo;

use crate::policy::{authorize, Action};
use crate::validation::require_text;

/// Fields for a new article, straight from the composer form.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepo>,
    limits: ContentLimits,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepo>, limits: ContentLimits) -> Self {
        Self { repo, limits }
    }

    /// Publishes a new article under the caller's id.
    pub async fn create(&self, actor: &Actor, new: NewBlogPost) -> Result<BlogPost> {
        // 1. Policy, then input, before any store call
        authorize(Action::CreateBlogPost, actor, None)?;
        let title = require_text("title", &new.title, self.limits.max_title)?;
        let content = require_text("content", &new.content, self.limits.max_content)?;

        // 2. Persist
        let post = BlogPost {
            id: Uuid::now_v7(),
            title,
            content,
            author_id: actor.id.clone(),
            created_at: Utc::now(),
        };
        self.repo.insert_post(post.clone()).await?;
        tracing::info!(post_id = %post.id, author = %actor.id, "blog post published");
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<BlogPost> {
        self.repo
            .get_post(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("BlogPost", id))
    }

    /// The blog index, creation-ordered.
    pub async fn list(&self) -> Result<Vec<BlogPost>> {
        self.repo.list_posts().await
    }

    /// Removes the article and every like referencing it.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<()> {
        authorize(Action::DeleteBlogPost, actor, None)?;
        let likes_removed = self.repo.remove_post_with_likes(id).await?;
        tracing::info!(post_id = %id, likes_removed, actor = %actor.id, "blog post deleted");
        Ok(())
    }
}
