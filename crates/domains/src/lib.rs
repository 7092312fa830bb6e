//! hearth/crates/domains/src/lib.rs
//!
//! The central domain definitions for Hearth: entities, the port traits
//! every adapter implements, and the shared error taxonomy.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
