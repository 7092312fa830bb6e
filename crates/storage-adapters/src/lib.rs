//! # storage-adapters
//! hearth/crates/storage-adapters/src/lib.rs
//!
//! Concrete implementations of the persistence ports in `domains`. The
//! in-memory repos model the store as relational tables behind a lock:
//! compound operations (cascades, uniqueness checks) run under a single
//! write guard, which is the in-memory equivalent of one transaction.
//! Guards are never held across an await point.

pub mod blog;
pub mod chat;
pub mod forum;
pub mod media;

pub use blog::MemoryBlogRepo;
pub use chat::MemoryChatRepo;
pub use forum::MemoryForumRepo;
pub use media::{LocalMediaStorage, MemoryMediaStorage};
