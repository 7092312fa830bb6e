//! # In-Memory Blog Store
//!
//! BTreeMap tables behind one `RwLock`, mirroring the relational layout:
//! a posts table, a likes table, and a unique index on the
//! (post_id, user_id) pair. Uuid v7 keys make map iteration creation
//! order, so the "list in creation order" contract falls out of the key.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{BlogPost, Like};
use domains::ports::BlogRepo;

#[derive(Default)]
struct BlogTables {
    posts: BTreeMap<Uuid, BlogPost>,
    likes: BTreeMap<Uuid, Like>,
    /// Unique index on the like pair, pointing at the like row.
    like_index: HashMap<(Uuid, String), Uuid>,
}

/// In-memory [`BlogRepo`]. Every operation takes the table lock exactly
/// once, so compound operations are atomic and the pair uniqueness check
/// cannot race with a concurrent insert.
#[derive(Default)]
pub struct MemoryBlogRepo {
    tables: RwLock<BlogTables>,
}

impl MemoryBlogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BlogTables> {
        // A poisoned lock only means a panic elsewhere; the tables stay usable.
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BlogTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BlogRepo for MemoryBlogRepo {
    async fn insert_post(&self, post: BlogPost) -> Result<()> {
        self.write().posts.insert(post.id, post);
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<BlogPost>> {
        Ok(self.read().posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>> {
        Ok(self.read().posts.values().cloned().collect())
    }

    /// Removes the post and its likes under a single write guard so no
    /// reader ever observes a like pointing at a missing post.
    async fn remove_post_with_likes(&self, id: Uuid) -> Result<usize> {
        let mut tables = self.write();
        if !tables.posts.contains_key(&id) {
            return Err(PlatformError::not_found("BlogPost", id));
        }

        // 1. Enumerate the likes referencing this post
        let like_ids: Vec<Uuid> = tables
            .likes
            .values()
            .filter(|like| like.post_id == id)
            .map(|like| like.id)
            .collect();

        // 2. Remove them bottom-up, index entries included
        for like_id in &like_ids {
            if let Some(like) = tables.likes.remove(like_id) {
                tables.like_index.remove(&(like.post_id, like.user_id));
            }
        }

        // 3. Remove the post itself
        tables.posts.remove(&id);
        tracing::debug!(post_id = %id, likes_removed = like_ids.len(), "blog post removed");
        Ok(like_ids.len())
    }

    async fn insert_like(&self, like: Like) -> Result<()> {
        let mut tables = self.write();
        // The post check and the uniqueness check share the guard with
        // the insert, matching the single-transaction contract.
        if !tables.posts.contains_key(&like.post_id) {
            return Err(PlatformError::not_found("BlogPost", like.post_id));
        }
        let pair = (like.post_id, like.user_id.clone());
        if tables.like_index.contains_key(&pair) {
            return Err(PlatformError::Conflict(format!(
                "user {} already likes post {}",
                like.user_id, like.post_id
            )));
        }
        tables.like_index.insert(pair, like.id);
        tables.likes.insert(like.id, like);
        Ok(())
    }

    async fn get_like(&self, id: Uuid) -> Result<Option<Like>> {
        Ok(self.read().likes.get(&id).cloned())
    }

    async fn remove_like(&self, id: Uuid) -> Result<()> {
        let mut tables = self.write();
        match tables.likes.remove(&id) {
            Some(like) => {
                tables.like_index.remove(&(like.post_id, like.user_id));
                Ok(())
            }
            None => Err(PlatformError::not_found("Like", id)),
        }
    }

    async fn count_likes(&self, post_id: Uuid) -> Result<u64> {
        let count = self
            .read()
            .likes
            .values()
            .filter(|like| like.post_id == post_id)
            .count();
        Ok(count as u64)
    }

    async fn find_like(&self, post_id: Uuid, user_id: &str) -> Result<Option<Like>> {
        let tables = self.read();
        let row = tables
            .like_index
            .get(&(post_id, user_id.to_string()))
            .and_then(|like_id| tables.likes.get(like_id))
            .cloned();
        Ok(row)
    }
}
