//! # Chatroll
//!
//! The unified API for Chatroll: a toy messaging store that deduplicates
//! users by normalized phone number, compares user sets across messenger
//! instances, searches message text, and finds chats shared by a set of
//! users.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatroll::{ChatId, MessengerStore, StoreConfig};
//!
//! fn example(json: &str) -> chatroll::Result<()> {
//!     let store = MessengerStore::from_json(json, StoreConfig::default())?;
//!
//!     // Unique subscribers across every chat
//!     println!("{} unique users", store.identity_count());
//!
//!     // Chats that contain this subscriber, whatever the raw id
//!     let me = store.user("*", "+79854321234")?;
//!     for chat_id in store.shared_chats([&me]) {
//!         println!("shared: {chat_id}");
//!     }
//!
//!     // Newest-first text search
//!     for hit in store.find_regex(&ChatId::from("chat_id1"), "text1")? {
//!         println!("{} at {}: {}", hit.sender, hit.timestamp, hit.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `chatroll::core` - Core primitives (Identity, User, Chat, MessageContent, ...)

pub mod config;
pub mod error;
pub mod messenger;
pub mod records;

pub use chatroll_core as core;

pub use config::{SenderPolicy, StoreConfig, DEFAULT_PATTERN_SIZE_LIMIT};
pub use error::{Result, StoreError};
pub use messenger::MessengerStore;
pub use records::{ChatRecord, ChatRecords, ContentRecord, MemberRecord, MessageRecord};

pub use chatroll_core::{
    Chat, ChatId, ContentKind, ContentSource, CoreError, Identity, MatchRecord, MemberOutcome,
    MemberStatus, MembershipReport, Message, MessageContent, PhoneNormalizer, TextMatches,
    Timestamp, User, UserId,
};
