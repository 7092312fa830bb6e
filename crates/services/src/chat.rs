//! # Chat Session Lifecycle
//!
//! Two-party support sessions: Active until an end stamp lands, then
//! terminal. One active session per unordered pair; `start` returns the
//! existing session instead of duplicating it, and the store's
//! uniqueness contract backstops the race where two starts pass the
//! lookup together.

use std::sync::Arc;

use chrono::Utc;
use configs::ContentLimits;
use uuid::Uuid;

use domains::error::{PlatformError, Result};
use domains::models::{Actor, Chat, Message};
use domains::ports::ChatRepo;

use crate::policy::{authorize, Action};
use crate::validation::require_text;

/// A chat with its transcript in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDetails {
    pub chat: Chat,
    pub messages: Vec<Message>,
}

#[derive(Clone)]
pub struct ChatService {
    repo: Arc<dyn ChatRepo>,
    limits: ContentLimits,
}

impl ChatService {
    pub fn new(repo: Arc<dyn ChatRepo>, limits: ContentLimits) -> Self {
        Self { repo, limits }
    }

    /// Opens a session with `other_user_id`, or returns the active one
    /// that already connects the pair.
    pub async fn start(&self, actor: &Actor, other_user_id: &str) -> Result<Chat> {
        authorize(Action::StartChat, actor, None)?;
        let other = other_user_id.trim();
        if other.is_empty() {
            return Err(PlatformError::Validation(
                "chat partner id is required".into(),
            ));
        }

        // 1. Reuse an active session when one exists
        if let Some(existing) = self.repo.find_active_between(&actor.id, other).await? {
            tracing::debug!(chat_id = %existing.id, "reusing active chat");
            return Ok(existing);
        }

        // 2. Otherwise open a new one; the unique-insert is the race backstop
        let chat = Chat {
            id: Uuid::now_v7(),
            user1_id: actor.id.clone(),
            user2_id: other.to_string(),
            started_at: Utc::now(),
            ended_at: None,
        };
        match self.repo.insert_chat(chat.clone()).await {
            Ok(()) => {
                tracing::info!(chat_id = %chat.id, user1 = %chat.user1_id, user2 = %chat.user2_id, "chat started");
                Ok(chat)
            }
            // Lost the race: hand back the chat the winner created.
            Err(PlatformError::Conflict(reason)) => {
                tracing::debug!(%reason, "chat insert lost a start race, refetching");
                self.repo
                    .find_active_between(&actor.id, other)
                    .await?
                    .ok_or(PlatformError::Conflict(reason))
            }
            Err(other_err) => Err(other_err),
        }
    }

    /// Stamps the end time. Participants and admins only; ending an
    /// already-ended chat succeeds without touching the stamp.
    pub async fn end(&self, actor: &Actor, chat_id: Uuid) -> Result<()> {
        let chat = self
            .repo
            .get_chat(chat_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Chat", chat_id))?;
        authorize(Action::EndChat, actor, chat.participant(&actor.id))?;

        if !chat.is_active() {
            tracing::debug!(chat_id = %chat_id, "chat already ended");
            return Ok(());
        }
        self.repo.end_chat(chat_id, Utc::now()).await?;
        tracing::info!(chat_id = %chat_id, actor = %actor.id, "chat ended");
        Ok(())
    }

    pub async fn details(&self, chat_id: Uuid) -> Result<ChatDetails> {
        let (chat, messages) = self
            .repo
            .get_chat_with_messages(chat_id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Chat", chat_id))?;
        Ok(ChatDetails { chat, messages })
    }

    /// Appends a line to an active chat. The store re-checks existence
    /// and activity inside the append.
    pub async fn post_message(
        &self,
        actor: &Actor,
        chat_id: Uuid,
        content: &str,
    ) -> Result<Message> {
        authorize(Action::PostMessage, actor, None)?;
        let content = require_text("message", content, self.limits.max_message)?;

        let message = Message {
            id: Uuid::now_v7(),
            chat_id,
            sender_id: actor.id.clone(),
            content,
            sent_at: Utc::now(),
        };
        let stored = self.repo.append_message(message).await?;
        tracing::info!(message_id = %stored.id, chat_id = %chat_id, sender = %actor.id, "message posted");
        Ok(stored)
    }

    /// The chats a user participates in, creation-ordered.
    pub async fn chats_for(&self, user_id: &str) -> Result<Vec<Chat>> {
        self.repo.list_for_user(user_id).await
    }
}
