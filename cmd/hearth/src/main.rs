//! # Hearth Binary
//!
//! Assembles the core over the bundled adapters, seeds the directory,
//! and walks the main flows once: blog and likes, the forum hierarchy,
//! a support chat, and an account role update. The web surface is a
//! separate deployment; this entry point boots and smokes the core.

use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use domains::models::{Actor, Role};
use identity_adapters::MemoryUserDirectory;
use services::{
    AccountService, BlogService, ChatService, ForumService, LikeService, NewBlogPost, Upload,
};
use storage_adapters::{LocalMediaStorage, MemoryBlogRepo, MemoryChatRepo, MemoryForumRepo};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging and configuration
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let config = configs::load()?;

    // 2. Adapters
    let blog_repo = Arc::new(MemoryBlogRepo::new());
    let forum_repo = Arc::new(MemoryForumRepo::new());
    let chat_repo = Arc::new(MemoryChatRepo::new());
    let media = Arc::new(LocalMediaStorage::new(&config.media.upload_dir));
    let directory = Arc::new(
        MemoryUserDirectory::new()
            .with_user("admin-1", "root", vec![Role::Admin])
            .with_user("dev-1", "poster", vec![Role::Dev, Role::Standard])
            .with_user("member-1", "alice", vec![Role::Standard])
            .with_user("member-2", "bob", vec![Role::Standard]),
    );

    // 3. Services
    let blog = BlogService::new(blog_repo.clone(), config.limits.clone());
    let likes = LikeService::new(blog_repo);
    let forum = ForumService::new(
        forum_repo,
        directory.clone(),
        media,
        config.limits.clone(),
    );
    let support = ChatService::new(chat_repo, config.limits.clone());
    let accounts = AccountService::new(directory);

    tracing::info!("🚀 Hearth core assembled, walking the main flows");

    let admin = Actor::new("admin-1", vec![Role::Admin]);
    let dev = Actor::new("dev-1", vec![Role::Dev, Role::Standard]);
    let alice = Actor::new("member-1", vec![Role::Standard]);
    let bob = Actor::new("member-2", vec![Role::Standard]);

    // 4. Blog and likes
    let post = blog
        .create(
            &dev,
            NewBlogPost {
                title: "Welcome to Hearth".into(),
                content: "The platform is up.".into(),
            },
        )
        .await?;
    let alices_like = likes.like(&alice, post.id).await?;
    likes.like(&bob, post.id).await?;
    tracing::info!(count = likes.like_count(post.id).await?, "likes recorded");
    likes.unlike(&alice, alices_like.id).await?;

    // 5. Forum hierarchy, one post with an attachment
    let category = forum
        .create_category(&admin, "General", "Anything goes")
        .await?;
    let thread = forum
        .create_thread(&alice, category.id, "Introductions")
        .await?;
    forum
        .create_post(
            &bob,
            thread.id,
            "glad to be here",
            Some(Upload {
                filename: "wave.png".into(),
                data: Bytes::from_static(b"\x89PNG\r\n"),
            }),
        )
        .await?;
    let details = forum.thread_details(thread.id).await?;
    tracing::info!(
        thread = %details.thread.title,
        posts = details.posts.len(),
        "thread rendered"
    );

    // 6. Support chat
    let chat = support.start(&alice, "member-2").await?;
    support.post_message(&alice, chat.id, "anyone from support around?").await?;
    support.post_message(&bob, chat.id, "right here").await?;
    support.end(&alice, chat.id).await?;
    tracing::info!(
        messages = support.details(chat.id).await?.messages.len(),
        "chat closed"
    );

    // 7. Account admin
    accounts
        .update_roles(&admin, "member-2", vec![Role::Standard, Role::Dev])
        .await?;
    if let Some(account) = accounts.search(Some("bob")).await? {
        tracing::info!(user = %account.username, roles = ?account.roles, "roles updated");
    }

    tracing::info!("walk-through complete");
    Ok(())
}
