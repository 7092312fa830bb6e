//! # Content Hierarchy Manager
//!
//! Categories own threads, threads own posts. Creation validates the
//! immediate parent; deletion cascades through the store's tree-delete
//! contracts so no orphaned descendant row survives. Thread details are
//! enriched with author display names through the identity directory.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use configs::ContentLimits;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Actor, Category, ForumThread, Post};
use domains::ports::{CascadeOutcome, ForumRepo, MediaStorage, UserDirectory};

use crate::policy::{authorize, Action};
use crate::validation::require_text;

/// Display name used when the directory cannot resolve an author id.
const UNKNOWN_AUTHOR: &str = "unknown";

/// An uploaded attachment as it arrives from the outer surface.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

/// A post paired with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub post: Post,
    pub author_name: String,
}

/// A thread with its posts in creation order, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDetails {
    pub thread: ForumThread,
    pub posts: Vec<PostView>,
}

/// A category with its threads in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDetails {
    pub category: Category,
    pub threads: Vec<ForumThread>,
}

#[derive(Clone)]
pub struct ForumService {
    forum: Arc<dyn ForumRepo>,
    directory: Arc<dyn UserDirectory>,
    media: Arc<dyn MediaStorage>,
    limits: ContentLimits,
}

impl ForumService {
    pub fn new(
        forum: Arc<dyn ForumRepo>,
        directory: Arc<dyn UserDirectory>,
        media: Arc<dyn MediaStorage>,
        limits: ContentLimits,
    ) -> Self {
        Self {
            forum,
            directory,
            media,
            limits,
        }
    }

    pub async fn create_category(
        &self,
        actor: &Actor,
        name: &str,
        description: &str,
    ) -> Result<Category> {
        authorize(Action::CreateCategory, actor, None)?;
        let name = require_text("name", name, self.limits.max_name)?;
        let description = require_text("description", description, self.limits.max_content)?;

        let category = Category {
            id: Uuid::now_v7(),
            name,
            description,
            created_at: Utc::now(),
        };
        self.forum.insert_category(category.clone()).await?;
        tracing::info!(category_id = %category.id, actor = %actor.id, "category created");
        Ok(category)
    }

    /// All categories, creation-ordered.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.forum.list_categories().await
    }

    pub async fn category_details(&self, id: Uuid) -> Result<CategoryDetails> {
        let (category, threads) = self
            .forum
            .get_category_with_threads(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Category", id))?;
        Ok(CategoryDetails { category, threads })
    }

    /// Removes the category, its threads, and their posts in one unit.
    pub async fn delete_category(&self, actor: &Actor, id: Uuid) -> Result<CascadeOutcome> {
        authorize(Action::DeleteCategory, actor, None)?;
        let outcome = self.forum.delete_category_tree(id).await?;
        tracing::info!(
            category_id = %id,
            threads_removed = outcome.threads_removed,
            posts_removed = outcome.posts_removed,
            actor = %actor.id,
            "category deleted"
        );
        Ok(outcome)
    }

    pub async fn create_thread(
        &self,
        actor: &Actor,
        category_id: Uuid,
        title: &str,
    ) -> Result<ForumThread> {
        authorize(Action::CreateThread, actor, None)?;
        let title = require_text("title", title, self.limits.max_title)?;

        let thread = ForumThread {
            id: Uuid::now_v7(),
            category_id,
            title,
            created_at: Utc::now(),
        };
        // The store re-checks the parent inside the insert, so a racing
        // category cascade cannot orphan this row.
        self.forum.insert_thread(thread.clone()).await?;
        tracing::info!(thread_id = %thread.id, category_id = %category_id, actor = %actor.id, "thread created");
        Ok(thread)
    }

    /// The thread plus its posts, each post carrying its author's
    /// display name ("unknown" when the directory has no entry).
    pub async fn thread_details(&self, id: Uuid) -> Result<ThreadDetails> {
        let (thread, posts) = self
            .forum
            .get_thread_with_posts(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Thread", id))?;

        // One directory lookup per distinct author.
        let mut names: HashMap<String, String> = HashMap::new();
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            if !names.contains_key(&post.author_id) {
                let resolved = self
                    .directory
                    .find_by_id(&post.author_id)
                    .await?
                    .map(|account| account.username)
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                names.insert(post.author_id.clone(), resolved);
            }
            let author_name = names[&post.author_id].clone();
            views.push(PostView { post, author_name });
        }
        Ok(ThreadDetails {
            thread,
            posts: views,
        })
    }

    /// Threads carry no author of their own, so this is admin-only in
    /// practice: the owner slot of the policy check stays empty.
    pub async fn delete_thread(&self, actor: &Actor, id: Uuid) -> Result<usize> {
        authorize(Action::DeleteThread, actor, None)?;
        let posts_removed = self.forum.delete_thread_tree(id).await?;
        tracing::info!(thread_id = %id, posts_removed, actor = %actor.id, "thread deleted");
        Ok(posts_removed)
    }

    pub async fn create_post(
        &self,
        actor: &Actor,
        thread_id: Uuid,
        content: &str,
        attachment: Option<Upload>,
    ) -> Result<Post> {
        // 1. Policy and input checks, nothing persisted yet
        authorize(Action::CreatePost, actor, None)?;
        let content = require_text("content", content, self.limits.max_content)?;
        if let Some(upload) = &attachment {
            let guessed = mime_guess::from_path(&upload.filename).first();
            let is_image = guessed
                .as_ref()
                .map(|m| m.type_() == mime::IMAGE)
                .unwrap_or(false);
            if !is_image {
                return Err(PlatformError::Validation(format!(
                    "attachment {} is not an image",
                    upload.filename
                )));
            }
        }

        // 2. Parent must exist before we touch the media store
        if self.forum.get_thread(thread_id).await?.is_none() {
            return Err(PlatformError::not_found("Thread", thread_id));
        }

        // 3. Store the attachment, then the row
        let image_path = match attachment {
            Some(upload) => Some(self.media.save_upload(upload.data, &upload.filename).await?),
            None => None,
        };
        let post = Post {
            id: Uuid::now_v7(),
            thread_id,
            author_id: actor.id.clone(),
            content,
            image_path,
            created_at: Utc::now(),
        };
        self.forum.insert_post(post.clone()).await?;
        tracing::info!(post_id = %post.id, thread_id = %thread_id, actor = %actor.id, "post created");
        Ok(post)
    }

    /// Admin or the post's author.
    pub async fn delete_post(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let post = self
            .forum
            .get_post(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Post", id))?;
        authorize(Action::DeletePost, actor, Some(&post.author_id))?;

        self.forum.delete_post(id).await?;
        tracing::info!(post_id = %id, actor = %actor.id, "post deleted");
        Ok(())
    }
}
