//! Message: a timestamped, attributed content record.

use crate::content::MessageContent;
use crate::types::{Timestamp, UserId};

/// An immutable chat message.
///
/// The sender is referenced by raw user id and is not required to be a
/// current member of the chat holding the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    timestamp: Timestamp,
    sender: UserId,
    content: MessageContent,
}

impl Message {
    pub fn new(
        timestamp: impl Into<Timestamp>,
        sender: impl Into<UserId>,
        content: MessageContent,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            content,
        }
    }

    /// Shorthand for a text message.
    pub fn text(
        timestamp: impl Into<Timestamp>,
        sender: impl Into<UserId>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(timestamp, sender, MessageContent::text(text))
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn sender(&self) -> &UserId {
        &self.sender
    }

    pub fn content(&self) -> &MessageContent {
        &self.content
    }
}
