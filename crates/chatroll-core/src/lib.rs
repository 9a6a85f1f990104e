//! # Chatroll Core
//!
//! Pure primitives for Chatroll: phone-derived identities, users, message
//! content, and chats.
//!
//! Apart from the one-time read of file-backed binary content, this crate
//! does no I/O and keeps no shared state.
//!
//! ## Key Types
//!
//! - [`Identity`] - Canonical phone-derived key; equal for every spelling of one subscriber
//! - [`PhoneNormalizer`] - Raw phone string to [`Identity`] under a default region
//! - [`User`] - Raw user id bound to an identity; compares by identity only
//! - [`MessageContent`] - Closed set of payload kinds (text, binary)
//! - [`Chat`] - Members unique by identity plus a chronological message log
//!
//! ## Search
//!
//! [`Chat::search_text`] yields [`MatchRecord`]s newest-first, lazily, and
//! only for text content.

pub mod chat;
pub mod content;
pub mod error;
pub mod message;
pub mod phone;
pub mod types;
pub mod user;

pub use chat::{Chat, MatchRecord, MemberOutcome, MemberStatus, MembershipReport, TextMatches};
pub use content::{ContentKind, ContentSource, MessageContent};
pub use error::{CoreError, Result};
pub use message::Message;
pub use phone::{normalize, PhoneNormalizer, DEFAULT_REGION};
pub use types::{ChatId, Identity, Timestamp, UserId};
pub use user::User;
