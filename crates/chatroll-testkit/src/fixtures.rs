//! Test fixtures and helpers.
//!
//! The sample messenger data lives here as a constructor, never as shared
//! module state: every call returns fresh values.

use chatroll::{
    Chat, ChatId, ChatRecord, ChatRecords, ContentRecord, MemberRecord, Message, MessageRecord,
    MessengerStore, PhoneNormalizer, StoreConfig, User,
};

/// Helper for building users, chats, and stores under one region.
pub struct TestFixture {
    pub normalizer: PhoneNormalizer,
    pub config: StoreConfig,
}

impl TestFixture {
    /// A fixture using the default (RU) configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        let normalizer = config
            .normalizer()
            .expect("fixture config must name a known region");
        Self { normalizer, config }
    }

    /// Build a user; panics on an invalid phone.
    pub fn user(&self, id: &str, phone: &str) -> User {
        User::with_normalizer(id, phone, &self.normalizer)
            .unwrap_or_else(|e| panic!("fixture phone {phone:?} is invalid: {e}"))
    }

    /// Build a chat with the given members and text messages
    /// `(timestamp, sender, text)`.
    pub fn chat(&self, members: Vec<User>, messages: &[(&str, &str, &str)]) -> Chat {
        let mut chat = Chat::new();
        chat.add_members(members);
        for (timestamp, sender, text) in messages {
            chat.append_message(Message::text(*timestamp, *sender, *text));
        }
        chat
    }

    /// Build a store from `(chat id, chat)` pairs.
    pub fn store(&self, chats: Vec<(&str, Chat)>) -> MessengerStore {
        MessengerStore::new(
            chats
                .into_iter()
                .map(|(id, chat)| (ChatId::from(id), chat)),
            self.config.clone(),
        )
        .expect("fixture store must build")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn member(id: &str, phone: &str) -> MemberRecord {
    MemberRecord {
        id: id.to_string(),
        phone: phone.to_string(),
    }
}

fn text(timestamp: &str, sender: &str, data: &str) -> MessageRecord {
    MessageRecord {
        timestamp: timestamp.to_string(),
        sender: sender.to_string(),
        content: ContentRecord::text(data),
    }
}

/// The sample messenger: two chats, three subscribers.
///
/// `user_id1` appears in both chats with differently formatted phones that
/// normalize to the same identity.
pub fn sample_records() -> ChatRecords {
    let mut records = ChatRecords::new();
    records.insert(
        ChatId::from("chat_id1"),
        ChatRecord {
            members: vec![
                member("user_id1", "+7 985 432 12 34"),
                member("user_id2", "8 342 456 23 54"),
            ],
            messages: vec![
                text("timestamp1_1", "user_id1", "text1_1"),
                text("timestamp1_2", "user_id2", "text1_2"),
                text("timestamp1_3", "user_id1", "text1_3"),
            ],
        },
    );
    records.insert(
        ChatId::from("chat_id2"),
        ChatRecord {
            members: vec![
                member("user_id1", "8(985)4321234"),
                member("user_id3", "79162342359"),
            ],
            messages: vec![
                text("timestamp2_1", "user_id1", "text2_1"),
                text("timestamp2_2", "user_id3", "text2_2"),
                text("timestamp2_3", "user_id1", "text2_3"),
            ],
        },
    );
    records
}

/// [`sample_records`] as a JSON document.
pub fn sample_json() -> String {
    serde_json::to_string_pretty(&sample_records()).expect("sample records serialize")
}

/// A store built from [`sample_records`] with the default configuration.
pub fn sample_store() -> MessengerStore {
    MessengerStore::from_records(sample_records(), StoreConfig::default())
        .expect("sample records are valid")
}
