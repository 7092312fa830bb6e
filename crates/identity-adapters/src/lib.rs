//! # identity-adapters
//!
//! In-process implementation of the `UserDirectory` port. The real
//! identity system lives outside this workspace; this adapter stands in
//! for it during assembly and tests, holding accounts in a concurrent
//! map and answering the same lookups the external directory would.
//!
//! Credential and password handling deliberately do not exist here;
//! that whole concern stays with the external identity system.

use dashmap::DashMap;

use async_trait::async_trait;
use domains::{PlatformError, Result, Role, UserAccount, UserDirectory};

/// Seedable in-memory user directory.
///
/// Role updates go through the port (`set_roles`); seeding happens at
/// assembly time through [`MemoryUserDirectory::with_user`].
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<String, UserAccount>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding: `MemoryUserDirectory::new().with_user(...)`.
    pub fn with_user(
        self,
        id: impl Into<String>,
        username: impl Into<String>,
        roles: Vec<Role>,
    ) -> Self {
        let id = id.into();
        self.users.insert(
            id.clone(),
            UserAccount {
                id,
                username: username.into(),
                roles,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_by_name(&self, username: &str) -> Result<Option<UserAccount>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().username == username)
            .map(|entry| entry.value().clone()))
    }

    async fn set_roles(&self, id: &str, roles: Vec<Role>) -> Result<()> {
        match self.users.get_mut(id) {
            Some(mut entry) => {
                tracing::info!(user = id, ?roles, "role set replaced");
                entry.value_mut().roles = roles;
                Ok(())
            }
            None => Err(PlatformError::not_found("User", id)),
        }
    }
}
