//! # In-Memory Chat Store
//!
//! Chats and messages as BTreeMap tables behind one `RwLock`. The
//! single-active-chat-per-pair rule and the "chat still active" check
//! for message appends run under the same guard as their writes, which
//! is what lets the services treat them as transactional constraints.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Chat, Message};
use domains::ports::ChatRepo;

#[derive(Default)]
struct ChatTables {
    chats: BTreeMap<Uuid, Chat>,
    messages: BTreeMap<Uuid, Message>,
}

impl ChatTables {
    fn active_between(&self, a: &str, b: &str) -> Option<&Chat> {
        self.chats
            .values()
            .find(|c| c.is_active() && c.connects(a, b))
    }
}

/// In-memory [`ChatRepo`].
#[derive(Default)]
pub struct MemoryChatRepo {
    tables: RwLock<ChatTables>,
}

impl MemoryChatRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, ChatTables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChatTables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ChatRepo for MemoryChatRepo {
    async fn insert_chat(&self, chat: Chat) -> Result<()> {
        let mut tables = self.write();
        // Pair scan and insert share the guard; two racing starts for
        // the same pair serialize here and the loser gets Conflict.
        if tables.active_between(&chat.user1_id, &chat.user2_id).is_some() {
            return Err(PlatformError::Conflict(format!(
                "active chat already connects {} and {}",
                chat.user1_id, chat.user2_id
            )));
        }
        tables.chats.insert(chat.id, chat);
        Ok(())
    }

    async fn find_active_between(&self, user_a: &str, user_b: &str) -> Result<Option<Chat>> {
        Ok(self.read().active_between(user_a, user_b).cloned())
    }

    async fn get_chat(&self, id: Uuid) -> Result<Option<Chat>> {
        Ok(self.read().chats.get(&id).cloned())
    }

    async fn get_chat_with_messages(&self, id: Uuid) -> Result<Option<(Chat, Vec<Message>)>> {
        let tables = self.read();
        let chat = match tables.chats.get(&id) {
            Some(c) => c.clone(),
            None => return Ok(None),
        };
        // v7 message ids iterate in send order.
        let messages = tables
            .messages
            .values()
            .filter(|m| m.chat_id == id)
            .cloned()
            .collect();
        Ok(Some((chat, messages)))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        Ok(self
            .read()
            .chats
            .values()
            .filter(|c| c.participant(user_id).is_some())
            .cloned()
            .collect())
    }

    async fn end_chat(&self, id: Uuid, ended_at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.write();
        match tables.chats.get_mut(&id) {
            Some(chat) => {
                // First write wins; a second end keeps the original stamp.
                if chat.ended_at.is_none() {
                    chat.ended_at = Some(ended_at);
                }
                Ok(())
            }
            None => Err(PlatformError::not_found("Chat", id)),
        }
    }

    async fn append_message(&self, message: Message) -> Result<Message> {
        let mut tables = self.write();
        match tables.chats.get(&message.chat_id) {
            None => Err(PlatformError::not_found("Chat", message.chat_id)),
            Some(chat) if !chat.is_active() => Err(PlatformError::InvalidState(format!(
                "chat {} has ended",
                chat.id
            ))),
            Some(_) => {
                tables.messages.insert(message.id, message.clone());
                Ok(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn chat_between(a: &str, b: &str) -> Chat {
        Chat {
            id: Uuid::now_v7(),
            user1_id: a.into(),
            user2_id: b.into(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    fn message_in(chat_id: Uuid, sender: &str, content: &str) -> Message {
        Message {
            id: Uuid::now_v7(),
            chat_id,
            sender_id: sender.into(),
            content: content.into(),
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn one_active_chat_per_pair_either_order() {
        let repo = MemoryChatRepo::new();
        repo.insert_chat(chat_between("alice", "bob")).await.unwrap();

        // Same pair reversed still counts as the same pair.
        let err = repo
            .insert_chat(chat_between("bob", "alice"))
            .await
            .expect_err("second active chat for the pair must fail");
        assert!(matches!(err, PlatformError::Conflict(_)));

        // A different pair is fine.
        repo.insert_chat(chat_between("alice", "carol")).await.unwrap();
    }

    #[tokio::test]
    async fn ended_chat_frees_the_pair() {
        let repo = MemoryChatRepo::new();
        let first = chat_between("alice", "bob");
        repo.insert_chat(first.clone()).await.unwrap();
        repo.end_chat(first.id, Utc::now()).await.unwrap();

        assert!(repo
            .find_active_between("alice", "bob")
            .await
            .unwrap()
            .is_none());
        repo.insert_chat(chat_between("alice", "bob"))
            .await
            .expect("pair must be free after the chat ends");
    }

    #[tokio::test]
    async fn end_is_first_write_wins() {
        let repo = MemoryChatRepo::new();
        let chat = chat_between("alice", "bob");
        repo.insert_chat(chat.clone()).await.unwrap();

        let first_stamp = Utc::now();
        repo.end_chat(chat.id, first_stamp).await.unwrap();
        repo.end_chat(chat.id, first_stamp + chrono::Duration::hours(1))
            .await
            .unwrap();

        let stored = repo.get_chat(chat.id).await.unwrap().unwrap();
        assert_eq!(stored.ended_at, Some(first_stamp));
    }

    #[tokio::test]
    async fn append_rejects_ended_and_missing_chats() {
        let repo = MemoryChatRepo::new();
        let chat = chat_between("alice", "bob");
        repo.insert_chat(chat.clone()).await.unwrap();
        repo.append_message(message_in(chat.id, "alice", "hi"))
            .await
            .unwrap();

        repo.end_chat(chat.id, Utc::now()).await.unwrap();
        let err = repo
            .append_message(message_in(chat.id, "bob", "too late"))
            .await
            .expect_err("ended chat must reject messages");
        assert!(matches!(err, PlatformError::InvalidState(_)));

        let err = repo
            .append_message(message_in(Uuid::now_v7(), "bob", "nowhere"))
            .await
            .expect_err("missing chat must reject messages");
        assert!(matches!(err, PlatformError::NotFound("Chat", _)));
    }

    #[tokio::test]
    async fn transcript_keeps_send_order() {
        let repo = MemoryChatRepo::new();
        let chat = chat_between("alice", "bob");
        repo.insert_chat(chat.clone()).await.unwrap();
        for content in ["one", "two", "three"] {
            repo.append_message(message_in(chat.id, "alice", content))
                .await
                .unwrap();
        }

        let (_, messages) = repo
            .get_chat_with_messages(chat.id)
            .await
            .unwrap()
            .expect("chat must exist");
        let contents: Vec<String> = messages.into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn list_for_user_sees_both_sides() {
        let repo = MemoryChatRepo::new();
        let ab = chat_between("alice", "bob");
        let ac = chat_between("alice", "carol");
        repo.insert_chat(ab.clone()).await.unwrap();
        repo.insert_chat(ac.clone()).await.unwrap();

        assert_eq!(repo.list_for_user("alice").await.unwrap().len(), 2);
        let bobs = repo.list_for_user("bob").await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].id, ab.id);
        assert!(repo.list_for_user("dave").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn racing_starts_for_one_pair_admit_one_chat() {
        let repo = Arc::new(MemoryChatRepo::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_chat(chat_between("alice", "bob")).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(repo.list_for_user("alice").await.unwrap().len(), 1);
    }
}
