//! # Account Admin
//!
//! The admin-facing slice of the identity directory: look a user up by
//! username and rewrite their role set. Password and credential flows
//! live with the external identity system, not here.

use std::sync::Arc;

use domains::error::{PlatformError, Result};
use domains::models::{Actor, Role, UserAccount};
use domains::ports::UserDirectory;

use crate::policy::{authorize, Action};

#[derive(Clone)]
pub struct AccountService {
    directory: Arc<dyn UserDirectory>,
}

impl AccountService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Username search behind the admin screen. A missing query is the
    /// bare search page, so it yields no result rather than an error; a
    /// query that matches nobody is `NotFound`.
    pub async fn search(&self, query: Option<&str>) -> Result<Option<UserAccount>> {
        let Some(raw) = query else {
            return Ok(None);
        };
        let username = raw.trim();
        match self.directory.find_by_name(username).await? {
            Some(account) => Ok(Some(account)),
            None => Err(PlatformError::not_found("User", username)),
        }
    }

    /// Replaces a user's whole role set. Admin-only.
    pub async fn update_roles(
        &self,
        actor: &Actor,
        user_id: &str,
        roles: Vec<Role>,
    ) -> Result<()> {
        authorize(Action::ManageAccounts, actor, None)?;
        self.directory.set_roles(user_id, roles.clone()).await?;
        tracing::info!(user_id = %user_id, ?roles, actor = %actor.id, "roles updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::MockUserDirectory;

    fn admin() -> Actor {
        Actor::new("admin-1", vec![Role::Admin])
    }

    #[tokio::test]
    async fn no_query_is_no_result() {
        let directory = MockUserDirectory::new();
        let found = AccountService::new(Arc::new(directory))
            .search(None)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let mut directory = MockUserDirectory::new();
        directory.expect_find_by_name().returning(|_| Ok(None));

        let err = AccountService::new(Arc::new(directory))
            .search(Some("nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotFound("User", _)));
    }

    #[tokio::test]
    async fn search_trims_the_query() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_find_by_name()
            .withf(|name| name == "alice")
            .returning(|_| {
                Ok(Some(UserAccount {
                    id: "u1".into(),
                    username: "alice".into(),
                    roles: vec![Role::Standard],
                }))
            });

        let found = AccountService::new(Arc::new(directory))
            .search(Some("  alice  "))
            .await
            .unwrap();
        assert_eq!(found.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn role_updates_are_admin_gated() {
        // No expectations: a denied call must not reach the directory.
        let directory = MockUserDirectory::new();
        let err = AccountService::new(Arc::new(directory))
            .update_roles(
                &Actor::new("member-1", vec![Role::Standard]),
                "u1",
                vec![Role::Admin],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn admin_update_writes_the_whole_set() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_set_roles()
            .withf(|id, roles| id == "u1" && roles == &[Role::Standard, Role::Dev])
            .once()
            .returning(|_, _| Ok(()));

        AccountService::new(Arc::new(directory))
            .update_roles(&admin(), "u1", vec![Role::Standard, Role::Dev])
            .await
            .unwrap();
    }
}
