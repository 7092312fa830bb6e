//! # In-Memory Forum Store
//!
//! Three BTreeMap tables (categories, threads, posts) behind one
//! `RwLock`. Cascading deletes enumerate live descendants under the
//! write guard and remove bottom-up, so a failed parent lookup removes
//! nothing and readers never see an orphaned child row.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Category, ForumThread, Post};
use domains::ports::{CascadeOutcome, ForumRepo};

#[derive(Default)]
struct ForumTables {
    categories: BTreeMap<Uuid, Category>,
    threads: BTreeMap<Uuid, ForumThread>,
    posts: BTreeMap<Uuid, Post>,
}

impl ForumTables {
    fn threads_in(&self, category_id: Uuid) -> Vec<Uuid> {
        self.threads
            .values()
            .filter(|t| t.category_id == category_id)
            .map(|t| t.id)
            .collect()
    }

    fn posts_in(&self, thread_id: Uuid) -> Vec<Uuid> {
        self.posts
            .values()
            .filter(|p| p.thread_id == thread_id)
            .map(|p| p.id)
            .collect()
    }
}

/// In-memory [`ForumRepo`] for the category → thread → post hierarchy.
#[derive(Default)]
pub struct MemoryForumRepo {
    tables: RwLock<ForumTables>,
}

impl MemoryForumRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ForumTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ForumTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ForumRepo for MemoryForumRepo {
    async fn insert_category(&self, category: Category) -> Result<()> {
        self.write().categories.insert(category.id, category);
        Ok(())
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.read().categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.read().categories.values().cloned().collect())
    }

    async fn get_category_with_threads(
        &self,
        id: Uuid,
    ) -> Result<Option<(Category, Vec<ForumThread>)>> {
        let tables = self.read();
        let category = match tables.categories.get(&id) {
            Some(c) => c.clone(),
            None => return Ok(None),
        };
        let threads = tables
            .threads
            .values()
            .filter(|t| t.category_id == id)
            .cloned()
            .collect();
        Ok(Some((category, threads)))
    }

    /// The full cascade under one write guard: posts of every thread in
    /// the category, then the threads, then the category row.
    async fn delete_category_tree(&self, id: Uuid) -> Result<CascadeOutcome> {
        let mut tables = self.write();
        if !tables.categories.contains_key(&id) {
            return Err(PlatformError::not_found("Category", id));
        }

        // 1. Enumerate live descendants while the tables are frozen
        let thread_ids = tables.threads_in(id);
        let post_ids: Vec<Uuid> = thread_ids
            .iter()
            .flat_map(|tid| tables.posts_in(*tid))
            .collect();

        // 2. Remove bottom-up
        for pid in &post_ids {
            tables.posts.remove(pid);
        }
        for tid in &thread_ids {
            tables.threads.remove(tid);
        }
        tables.categories.remove(&id);

        let outcome = CascadeOutcome {
            threads_removed: thread_ids.len(),
            posts_removed: post_ids.len(),
        };
        tracing::debug!(
            category_id = %id,
            threads = outcome.threads_removed,
            posts = outcome.posts_removed,
            "category tree removed"
        );
        Ok(outcome)
    }

    async fn insert_thread(&self, thread: ForumThread) -> Result<()> {
        let mut tables = self.write();
        // Parent check shares the guard with the insert, so a concurrent
        // category cascade cannot slip a thread in underneath it.
        if !tables.categories.contains_key(&thread.category_id) {
            return Err(PlatformError::not_found("Category", thread.category_id));
        }
        tables.threads.insert(thread.id, thread);
        Ok(())
    }

    async fn get_thread(&self, id: Uuid) -> Result<Option<ForumThread>> {
        Ok(self.read().threads.get(&id).cloned())
    }

    async fn get_thread_with_posts(&self, id: Uuid) -> Result<Option<(ForumThread, Vec<Post>)>> {
        let tables = self.read();
        let thread = match tables.threads.get(&id) {
            Some(t) => t.clone(),
            None => return Ok(None),
        };
        let posts = tables
            .posts
            .values()
            .filter(|p| p.thread_id == id)
            .cloned()
            .collect();
        Ok(Some((thread, posts)))
    }

    async fn delete_thread_tree(&self, id: Uuid) -> Result<usize> {
        let mut tables = self.write();
        if !tables.threads.contains_key(&id) {
            return Err(PlatformError::not_found("Thread", id));
        }

        let post_ids = tables.posts_in(id);
        for pid in &post_ids {
            tables.posts.remove(pid);
        }
        tables.threads.remove(&id);

        tracing::debug!(thread_id = %id, posts = post_ids.len(), "thread tree removed");
        Ok(post_ids.len())
    }

    async fn insert_post(&self, post: Post) -> Result<()> {
        let mut tables = self.write();
        if !tables.threads.contains_key(&post.thread_id) {
            return Err(PlatformError::not_found("Thread", post.thread_id));
        }
        tables.posts.insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.read().posts.get(&id).cloned())
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let mut tables = self.write();
        match tables.posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(PlatformError::not_found("Post", id)),
        }
    }
}
