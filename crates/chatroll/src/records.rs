//! Serde input records for building a store.
//!
//! The input is a map from chat id to a [`ChatRecord`]:
//!
//! ```json
//! {
//!   "chat_id1": {
//!     "members": [{ "id": "user_id1", "phone": "+79854321234" }],
//!     "messages": [
//!       { "timestamp": "timestamp1_1", "sender": "user_id1",
//!         "content": { "kind": "text", "data": "text1_1" } },
//!       { "timestamp": "timestamp1_2", "sender": "user_id1",
//!         "content": { "kind": "binary", "path": "cat.png" } }
//!     ]
//!   }
//! }
//! ```
//!
//! Inline binary `data` is hex-encoded.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chatroll_core::{
    Chat, ChatId, ContentKind, ContentSource, MembershipReport, Message, MessageContent,
    PhoneNormalizer, User,
};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Construction input: chat id to chat record.
pub type ChatRecords = BTreeMap<ChatId, ChatRecord>;

/// One chat's members and messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatRecord {
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

/// A raw `(user id, phone)` membership entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberRecord {
    pub id: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageRecord {
    pub timestamp: String,
    pub sender: String,
    pub content: ContentRecord,
}

/// A payload given inline (`data`) or by `path`. Exactly one must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentRecord {
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ContentRecord {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            data: Some(data.into()),
            path: None,
        }
    }

    pub fn binary_path(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: ContentKind::Binary,
            data: None,
            path: Some(path.into()),
        }
    }

    pub fn binary_inline(bytes: &[u8]) -> Self {
        Self {
            kind: ContentKind::Binary,
            data: Some(hex::encode(bytes)),
            path: None,
        }
    }

    fn to_source(&self, chat_id: &ChatId, config: &StoreConfig) -> Result<ContentSource> {
        let mut source = ContentSource::empty();

        if let Some(data) = &self.data {
            source = match self.kind {
                ContentKind::Text => source.with_inline(data.clone().into_bytes()),
                ContentKind::Binary => {
                    let bytes = hex::decode(data).map_err(|e| StoreError::InvalidRecord {
                        chat_id: chat_id.clone(),
                        reason: format!("binary data is not valid hex: {e}"),
                    })?;
                    source.with_inline(bytes)
                }
            };
        }

        if let Some(path) = &self.path {
            source = source.with_path(config.resolve_content_path(path));
        }

        Ok(source)
    }
}

impl ChatRecord {
    /// Build a chat, normalizing every member and loading every payload.
    ///
    /// Duplicate members are not an error; they show up in the report.
    pub(crate) fn into_chat(
        self,
        chat_id: &ChatId,
        normalizer: &PhoneNormalizer,
        config: &StoreConfig,
    ) -> Result<(Chat, MembershipReport)> {
        let users = self
            .members
            .into_iter()
            .map(|m| User::with_normalizer(m.id, m.phone, normalizer))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut chat = Chat::new();
        let report = chat.add_members(users);

        for record in self.messages {
            let source = record.content.to_source(chat_id, config)?;
            let content = MessageContent::load(record.content.kind, source)?;
            chat.append_message(Message::new(record.timestamp, record.sender, content));
        }

        Ok((chat, report))
    }
}
