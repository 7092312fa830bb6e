//! # services
//! hearth/crates/services/src/lib.rs
//!
//! The engagement and lifecycle core of the Hearth platform: the access
//! policy table, shared input validation, and the managers for blog
//! posts, likes, the forum hierarchy, support chats, and account roles.
//! Everything here speaks to the outside world through the ports in
//! `domains`; callers identify themselves with an explicit [`Actor`]
//! on every operation.
//!
//! [`Actor`]: domains::models::Actor

pub mod accounts;
pub mod blog;
pub mod chat;
pub mod forum;
pub mod likes;
pub mod policy;
pub mod validation;

pub use accounts::AccountService;
pub use blog::{BlogService, NewBlogPost};
pub use chat::{ChatDetails, ChatService};
pub use forum::{CategoryDetails, ForumService, PostView, ThreadDetails, Upload};
pub use likes::{LikeService, LikeState};
pub use policy::{authorize, can_perform, Action};
