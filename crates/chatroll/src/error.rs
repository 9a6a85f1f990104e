//! Error types for the messenger store.

use chatroll_core::{ChatId, CoreError, UserId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Construction of a user or message content failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// No chat with this id.
    #[error("chat not found: {0}")]
    ChatNotFound(ChatId),

    /// The search pattern did not compile.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Sender is not a member, under [`SenderPolicy::MembersOnly`](crate::SenderPolicy).
    #[error("sender {sender} is not a member of chat {chat_id}")]
    UnknownSender { chat_id: ChatId, sender: UserId },

    /// An input record could not be turned into a chat.
    #[error("invalid record for chat {chat_id}: {reason}")]
    InvalidRecord { chat_id: ChatId, reason: String },

    /// Input JSON could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
