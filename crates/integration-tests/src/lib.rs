//! # integration-tests
//! hearth/crates/integration-tests/src/lib.rs
//!
//! Shared fixtures for the scenario tests: every service wired over one
//! in-memory store, plus the standard cast of callers. The directory is
//! seeded so author enrichment and the admin screens have real accounts
//! to resolve.

use std::sync::Arc;

use configs::ContentLimits;
use domains::models::{Actor, Role};
use identity_adapters::MemoryUserDirectory;
use services::{AccountService, BlogService, ChatService, ForumService, LikeService};
use storage_adapters::{MemoryBlogRepo, MemoryChatRepo, MemoryForumRepo, MemoryMediaStorage};

/// The whole platform over shared in-memory adapters.
pub struct Platform {
    pub blog: BlogService,
    pub likes: LikeService,
    pub forum: ForumService,
    pub chat: ChatService,
    pub accounts: AccountService,
    pub media: Arc<MemoryMediaStorage>,
    pub directory: Arc<MemoryUserDirectory>,
}

pub fn platform() -> Platform {
    let limits = ContentLimits::default();
    let blog_repo = Arc::new(MemoryBlogRepo::new());
    let forum_repo = Arc::new(MemoryForumRepo::new());
    let chat_repo = Arc::new(MemoryChatRepo::new());
    let media = Arc::new(MemoryMediaStorage::new());
    let directory = Arc::new(
        MemoryUserDirectory::new()
            .with_user("admin-1", "root", vec![Role::Admin])
            .with_user("dev-1", "poster", vec![Role::Dev, Role::Standard])
            .with_user("member-1", "alice", vec![Role::Standard])
            .with_user("member-2", "bob", vec![Role::Standard]),
    );

    Platform {
        blog: BlogService::new(blog_repo.clone(), limits.clone()),
        likes: LikeService::new(blog_repo),
        forum: ForumService::new(
            forum_repo,
            directory.clone(),
            media.clone(),
            limits.clone(),
        ),
        chat: ChatService::new(chat_repo, limits),
        accounts: AccountService::new(directory.clone()),
        media,
        directory,
    }
}

/// Seeded admin ("root").
pub fn admin() -> Actor {
    Actor::new("admin-1", vec![Role::Admin])
}

/// Seeded staff writer ("poster").
pub fn dev() -> Actor {
    Actor::new("dev-1", vec![Role::Dev, Role::Standard])
}

/// Seeded plain member ("alice").
pub fn alice() -> Actor {
    Actor::new("member-1", vec![Role::Standard])
}

/// Seeded plain member ("bob").
pub fn bob() -> Actor {
    Actor::new("member-2", vec![Role::Standard])
}
