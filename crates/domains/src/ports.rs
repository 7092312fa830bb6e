//! # Core Ports
//!
//! The narrow interfaces through which the core reaches its external
//! collaborators: the transactional store (split per entity family), the
//! identity directory, and the file store. Adapters implement these;
//! services only ever see the traits.
//!
//! Compound operations documented as atomic must be all-or-nothing in
//! every implementation: either the whole group of rows changes or none
//! of it does, and concurrent calls against the same rows serialize.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    BlogPost, Category, Chat, ForumThread, Like, Message, Post, Role, UserAccount,
};

/// Row counts removed by a category cascade, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CascadeOutcome {
    pub threads_removed: usize,
    pub posts_removed: usize,
}

/// Persistence contract for blog posts and their likes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn insert_post(&self, post: BlogPost) -> Result<()>;
    async fn get_post(&self, id: Uuid) -> Result<Option<BlogPost>>;
    /// All posts in creation order.
    async fn list_posts(&self) -> Result<Vec<BlogPost>>;
    /// Removes the post and every like referencing it in one atomic unit.
    /// Returns the number of likes removed; `NotFound` if the post is absent.
    async fn remove_post_with_likes(&self, id: Uuid) -> Result<usize>;

    /// Inserts a like, enforcing the (post_id, user_id) uniqueness
    /// constraint in the same atomic step: `Conflict` when the pair
    /// already exists, `NotFound` when the post does not.
    async fn insert_like(&self, like: Like) -> Result<()>;
    async fn get_like(&self, id: Uuid) -> Result<Option<Like>>;
    /// `NotFound` if no like with that id exists.
    async fn remove_like(&self, id: Uuid) -> Result<()>;
    async fn count_likes(&self, post_id: Uuid) -> Result<u64>;
    async fn find_like(&self, post_id: Uuid, user_id: &str) -> Result<Option<Like>>;
}

/// Persistence contract for the category → thread → post hierarchy.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ForumRepo: Send + Sync {
    async fn insert_category(&self, category: Category) -> Result<()>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;
    /// All categories in creation order.
    async fn list_categories(&self) -> Result<Vec<Category>>;
    /// The category plus its threads in creation order.
    async fn get_category_with_threads(
        &self,
        id: Uuid,
    ) -> Result<Option<(Category, Vec<ForumThread>)>>;
    /// Cascading removal: enumerates the category's live threads and
    /// their posts, removes them bottom-up (posts, then threads, then
    /// the category) in one atomic unit. `NotFound` if the category is
    /// absent; on any error nothing is removed.
    async fn delete_category_tree(&self, id: Uuid) -> Result<CascadeOutcome>;

    /// `NotFound` if the declared category is gone by the time the row
    /// lands (the parent check is part of the same atomic step).
    async fn insert_thread(&self, thread: ForumThread) -> Result<()>;
    async fn get_thread(&self, id: Uuid) -> Result<Option<ForumThread>>;
    /// The thread plus its posts in creation order.
    async fn get_thread_with_posts(&self, id: Uuid) -> Result<Option<(ForumThread, Vec<Post>)>>;
    /// Cascading removal of the thread and its posts, bottom-up, in one
    /// atomic unit. Returns the number of posts removed.
    async fn delete_thread_tree(&self, id: Uuid) -> Result<usize>;

    /// `NotFound` if the declared thread is gone by the time the row lands.
    async fn insert_post(&self, post: Post) -> Result<()>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>>;
    /// `NotFound` if no post with that id exists.
    async fn delete_post(&self, id: Uuid) -> Result<()>;
}

/// Persistence contract for support chats and their messages.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ChatRepo: Send + Sync {
    /// Inserts a chat, enforcing at most one active chat per unordered
    /// participant pair in the same atomic step: `Conflict` when an
    /// active chat already connects the pair.
    async fn insert_chat(&self, chat: Chat) -> Result<()>;
    async fn find_active_between(&self, user_a: &str, user_b: &str) -> Result<Option<Chat>>;
    async fn get_chat(&self, id: Uuid) -> Result<Option<Chat>>;
    /// The chat plus its messages in chronological order.
    async fn get_chat_with_messages(&self, id: Uuid) -> Result<Option<(Chat, Vec<Message>)>>;
    /// Chats the user participates in, creation-ordered.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Chat>>;
    /// Stamps the end time. First write wins; ending an already-ended
    /// chat leaves the original stamp. `NotFound` if the chat is absent.
    async fn end_chat(&self, id: Uuid, ended_at: DateTime<Utc>) -> Result<()>;
    /// Appends a message, re-verifying inside the same atomic step that
    /// the chat exists (`NotFound`) and is still active (`InvalidState`).
    async fn append_message(&self, message: Message) -> Result<Message>;
}

/// Identity and role directory, the read/write surface of the external
/// identity system. Principal resolution happens outside this core; the
/// directory only answers lookups and records role assignments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>>;
    async fn find_by_name(&self, username: &str) -> Result<Option<UserAccount>>;
    /// Replaces the user's whole role set. `NotFound` for an unknown id.
    async fn set_roles(&self, id: &str, roles: Vec<Role>) -> Result<()>;
}

/// File storage contract for post attachments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Saves raw bytes and returns the stored path recorded on the post.
    /// Failures surface as `Storage` and must leave no partial file
    /// visible to readers.
    async fn save_upload(&self, data: Bytes, filename: &str) -> Result<String>;
}
