//! # Access Policy Evaluator
//!
//! One table for every gated operation in the core. Services never embed
//! role checks of their own; they name the action, hand over the caller
//! and (where the rule needs it) the resource owner, and branch on the
//! answer. Keeping the table in one place is what makes the rules
//! auditable.

use domains::error::{PlatformError, Result};
use domains::models::Actor;

/// Every mutating operation the policy table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateBlogPost,
    DeleteBlogPost,
    CreateCategory,
    DeleteCategory,
    CreateThread,
    DeleteThread,
    CreatePost,
    DeletePost,
    Like,
    Unlike,
    StartChat,
    EndChat,
    PostMessage,
    ManageAccounts,
}

impl Action {
    /// Human-readable phrase for logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::CreateBlogPost => "create blog post",
            Action::DeleteBlogPost => "delete blog post",
            Action::CreateCategory => "create category",
            Action::DeleteCategory => "delete category",
            Action::CreateThread => "create thread",
            Action::DeleteThread => "delete thread",
            Action::CreatePost => "create post",
            Action::DeletePost => "delete post",
            Action::Like => "like",
            Action::Unlike => "unlike",
            Action::StartChat => "start chat",
            Action::EndChat => "end chat",
            Action::PostMessage => "post message",
            Action::ManageAccounts => "manage accounts",
        }
    }
}

/// Pure allow/deny predicate. No I/O, no side effects.
///
/// `resource_owner` is the owning user id for owner-sensitive rules
/// (post author, like owner, chat participant); pass `None` when the
/// action has no owner or the owner is unknown, which makes the
/// owner-or-admin rules collapse to admin-only.
///
/// The only error is `Validation`, for a caller id that is empty after
/// trimming; every well-formed caller gets a plain allow or deny.
pub fn can_perform(action: Action, actor: &Actor, resource_owner: Option<&str>) -> Result<bool> {
    if actor.id.trim().is_empty() {
        return Err(PlatformError::Validation("caller id is empty".into()));
    }
    // Past this point the caller counts as authenticated.

    let owns = |owner: Option<&str>| owner.is_some_and(|o| o == actor.id);

    let allowed = match action {
        Action::CreateBlogPost | Action::DeleteBlogPost => actor.is_dev(),
        Action::CreateCategory | Action::DeleteCategory | Action::ManageAccounts => {
            actor.is_admin()
        }
        Action::CreateThread
        | Action::CreatePost
        | Action::Like
        | Action::StartChat
        | Action::PostMessage => true,
        Action::DeleteThread | Action::DeletePost | Action::EndChat => {
            actor.is_admin() || owns(resource_owner)
        }
        Action::Unlike => owns(resource_owner),
    };
    Ok(allowed)
}

/// Predicate plus the uniform failure path: denials log at `warn` and
/// come back as `Unauthorized`. Every mutating service operation goes
/// through here before it touches a port.
pub fn authorize(action: Action, actor: &Actor, resource_owner: Option<&str>) -> Result<()> {
    if can_perform(action, actor, resource_owner)? {
        return Ok(());
    }
    tracing::warn!(action = action.as_str(), actor_id = %actor.id, "access denied");
    Err(PlatformError::Unauthorized(format!(
        "{} may not {}",
        actor.id,
        action.as_str()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::models::Role;

    fn admin() -> Actor {
        Actor::new("admin-1", vec![Role::Admin])
    }

    fn dev() -> Actor {
        Actor::new("dev-1", vec![Role::Dev])
    }

    fn member() -> Actor {
        Actor::new("member-1", vec![Role::Standard])
    }

    fn allowed(action: Action, actor: &Actor, owner: Option<&str>) -> bool {
        can_perform(action, actor, owner).unwrap()
    }

    #[test]
    fn blog_authorship_is_dev_only() {
        assert!(allowed(Action::CreateBlogPost, &dev(), None));
        assert!(allowed(Action::DeleteBlogPost, &dev(), None));
        assert!(!allowed(Action::CreateBlogPost, &admin(), None));
        assert!(!allowed(Action::DeleteBlogPost, &member(), None));
    }

    #[test]
    fn category_and_accounts_are_admin_only() {
        for action in [
            Action::CreateCategory,
            Action::DeleteCategory,
            Action::ManageAccounts,
        ] {
            assert!(allowed(action, &admin(), None));
            assert!(!allowed(action, &dev(), None));
            assert!(!allowed(action, &member(), None));
        }
    }

    #[test]
    fn authenticated_actions_admit_any_member() {
        for action in [
            Action::CreateThread,
            Action::CreatePost,
            Action::Like,
            Action::StartChat,
            Action::PostMessage,
        ] {
            assert!(allowed(action, &member(), None));
            assert!(allowed(action, &admin(), None));
        }
    }

    #[test]
    fn owner_or_admin_rules() {
        for action in [Action::DeleteThread, Action::DeletePost, Action::EndChat] {
            assert!(allowed(action, &member(), Some("member-1")));
            assert!(allowed(action, &admin(), Some("someone-else")));
            assert!(!allowed(action, &member(), Some("someone-else")));
            // No known owner collapses to admin-only.
            assert!(!allowed(action, &member(), None));
            assert!(allowed(action, &admin(), None));
        }
    }

    #[test]
    fn unlike_is_owner_only_even_for_admins() {
        assert!(allowed(Action::Unlike, &member(), Some("member-1")));
        assert!(!allowed(Action::Unlike, &admin(), Some("member-1")));
        assert!(!allowed(Action::Unlike, &member(), None));
    }

    #[test]
    fn empty_caller_id_is_malformed_input() {
        let ghost = Actor::new("  ", vec![Role::Admin]);
        let err = can_perform(Action::Like, &ghost, None).unwrap_err();
        assert!(matches!(err, PlatformError::Validation(_)));
    }

    #[test]
    fn authorize_translates_denial() {
        let err = authorize(Action::CreateCategory, &member(), None).unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized(_)));
        assert!(authorize(Action::CreateCategory, &admin(), None).is_ok());
    }
}
