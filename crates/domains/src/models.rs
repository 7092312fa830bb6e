//! # Domain Models
//!
//! These structs represent the core entities of the Hearth platform.
//! Entity ids are UUID v7, so id order is creation order; user ids are
//! opaque strings owned by the external identity system and are only
//! ever referenced here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role set understood by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full moderation rights: categories, thread/post removal, accounts.
    Admin,
    /// Staff writers ("Dev" in the original role vocabulary): blog authorship.
    Dev,
    /// Any signed-in member.
    Standard,
}

/// The calling principal, passed explicitly into every core operation.
///
/// There is deliberately no ambient "current user" anywhere in this
/// workspace; whoever drives the services resolves the caller once and
/// hands the result down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Opaque identity id from the external identity system.
    pub id: String,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self { id: id.into(), roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_dev(&self) -> bool {
        self.has_role(Role::Dev)
    }
}

/// Directory view of a user, as resolved through the `UserDirectory` port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub roles: Vec<Role>,
}

/// A staff-authored blog entry. Likes reference the post by id; deleting
/// the post removes them in the same unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// One user's like on one blog post. The (post_id, user_id) pair is
/// unique for as long as the row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Top level of the forum hierarchy. Owns its threads: removing a
/// category removes every thread in it and their posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A discussion thread within a category. Threads carry no author of
/// their own; ownership lives on the individual posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumThread {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// The fundamental unit of forum conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub author_id: String,
    pub content: String,
    /// Stored path of the attached image, handled by MediaStorage.
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A two-party support session. Active while `ended_at` is `None`;
/// ending is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user1_id: String,
    pub user2_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Chat {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// True when this chat connects the given unordered pair.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.user1_id == a && self.user2_id == b) || (self.user1_id == b && self.user2_id == a)
    }

    /// Returns the participant id matching `user_id`, if that user
    /// belongs to this chat. Feeds the resource-owner slot of the access
    /// policy for two-party resources.
    pub fn participant(&self, user_id: &str) -> Option<&str> {
        if self.user1_id == user_id {
            Some(&self.user1_id)
        } else if self.user2_id == user_id {
            Some(&self.user2_id)
        } else {
            None
        }
    }
}

/// One line of a support chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_role_checks() {
        let admin = Actor::new("a1", vec![Role::Admin]);
        assert!(admin.is_admin());
        assert!(!admin.is_dev());

        let staff = Actor::new("d1", vec![Role::Standard, Role::Dev]);
        assert!(staff.is_dev());
        assert!(staff.has_role(Role::Standard));
        assert!(!staff.is_admin());
    }

    #[test]
    fn chat_pair_is_unordered() {
        let chat = Chat {
            id: Uuid::now_v7(),
            user1_id: "alice".into(),
            user2_id: "bob".into(),
            started_at: Utc::now(),
            ended_at: None,
        };
        assert!(chat.connects("alice", "bob"));
        assert!(chat.connects("bob", "alice"));
        assert!(!chat.connects("alice", "carol"));
        assert_eq!(chat.participant("bob"), Some("bob"));
        assert_eq!(chat.participant("carol"), None);
    }

    #[test]
    fn chat_activity_follows_end_stamp() {
        let mut chat = Chat {
            id: Uuid::now_v7(),
            user1_id: "u1".into(),
            user2_id: "u2".into(),
            started_at: Utc::now(),
            ended_at: None,
        };
        assert!(chat.is_active());
        chat.ended_at = Some(Utc::now());
        assert!(!chat.is_active());
    }
}
