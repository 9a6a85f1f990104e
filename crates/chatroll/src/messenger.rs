//! The MessengerStore: chats plus the set of identities across them.
//!
//! The store owns its chats, so every membership change goes through it and
//! the cached identity set never goes stale: additions update it in place,
//! chat replacement rebuilds it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{BitAnd, BitOr, Sub};

use chatroll_core::{
    Chat, ChatId, Identity, MemberStatus, MembershipReport, Message, PhoneNormalizer, TextMatches,
    User,
};
use regex::{Regex, RegexBuilder};

use crate::config::{SenderPolicy, StoreConfig};
use crate::error::{Result, StoreError};
use crate::records::ChatRecords;

/// A collection of chats with set algebra over their member identities.
///
/// Stores compare and order by the *number* of unique identities, not by set
/// content: two stores with disjoint identity sets of equal size are equal.
#[derive(Debug, Clone)]
pub struct MessengerStore {
    chats: BTreeMap<ChatId, Chat>,
    identities: BTreeSet<Identity>,
    normalizer: PhoneNormalizer,
    config: StoreConfig,
}

impl MessengerStore {
    /// Build a store from ready-made chats.
    pub fn new(
        chats: impl IntoIterator<Item = (ChatId, Chat)>,
        config: StoreConfig,
    ) -> Result<Self> {
        let normalizer = config.normalizer()?;
        let mut store = Self {
            chats: chats.into_iter().collect(),
            identities: BTreeSet::new(),
            normalizer,
            config,
        };
        store.rebuild_identities();

        tracing::info!(
            chats = store.chats.len(),
            identities = store.identities.len(),
            "messenger store built"
        );
        Ok(store)
    }

    /// Build a store from input records.
    ///
    /// Aborts on the first construction-time error (invalid phone, bad
    /// content source, unreadable content). Duplicate members are reported
    /// through logging and skipped.
    pub fn from_records(records: ChatRecords, config: StoreConfig) -> Result<Self> {
        let normalizer = config.normalizer()?;
        let mut chats = BTreeMap::new();

        for (chat_id, record) in records {
            let (chat, report) = record
                .into_chat(&chat_id, &normalizer, &config)
                .map_err(|e| {
                    tracing::warn!(chat = %chat_id, error = %e, "rejected chat record");
                    e
                })?;
            log_report(&chat_id, &report);
            chats.insert(chat_id, chat);
        }

        Self::new(chats, config)
    }

    /// Build a store from a JSON document of chat records.
    pub fn from_json(json: &str, config: StoreConfig) -> Result<Self> {
        let records: ChatRecords = serde_json::from_str(json)?;
        Self::from_records(records, config)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The normalizer users for this store should be built with.
    pub fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    /// Create a user under this store's region.
    pub fn user(&self, id: &str, phone: &str) -> Result<User> {
        Ok(User::with_normalizer(id, phone, &self.normalizer)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity set algebra
    // ─────────────────────────────────────────────────────────────────────────

    /// All identities that are members of at least one chat.
    pub fn unique_identities(&self) -> &BTreeSet<Identity> {
        &self.identities
    }

    pub fn identity_count(&self) -> usize {
        self.identities.len()
    }

    pub fn contains_identity(&self, identity: &Identity) -> bool {
        self.identities.contains(identity)
    }

    /// Identities in either store.
    pub fn union(&self, other: &Self) -> BTreeSet<Identity> {
        self.identities.union(&other.identities).cloned().collect()
    }

    /// Identities in both stores.
    pub fn intersection(&self, other: &Self) -> BTreeSet<Identity> {
        self.identities
            .intersection(&other.identities)
            .cloned()
            .collect()
    }

    /// Identities in `self` but not in `other`.
    pub fn difference(&self, other: &Self) -> BTreeSet<Identity> {
        self.identities
            .difference(&other.identities)
            .cloned()
            .collect()
    }

    fn rebuild_identities(&mut self) {
        self.identities = self
            .chats
            .values()
            .flat_map(|chat| chat.member_identities().cloned())
            .collect();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chats and membership
    // ─────────────────────────────────────────────────────────────────────────

    pub fn chat(&self, chat_id: &ChatId) -> Option<&Chat> {
        self.chats.get(chat_id)
    }

    /// Chat ids in ascending order.
    pub fn chat_ids(&self) -> impl Iterator<Item = &ChatId> {
        self.chats.keys()
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    /// Insert or replace a chat, returning the previous one.
    pub fn insert_chat(&mut self, chat_id: ChatId, chat: Chat) -> Option<Chat> {
        let previous = self.chats.insert(chat_id, chat);
        self.rebuild_identities();
        previous
    }

    /// Add users to a chat, reporting each as added or duplicate.
    pub fn add_members(
        &mut self,
        chat_id: &ChatId,
        users: impl IntoIterator<Item = User>,
    ) -> Result<MembershipReport> {
        let chat = self
            .chats
            .get_mut(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        let report = chat.add_members(users);
        for outcome in report.added() {
            self.identities.insert(outcome.identity.clone());
        }

        log_report(chat_id, &report);
        Ok(report)
    }

    /// Append a message to a chat, subject to the sender policy.
    pub fn append_message(&mut self, chat_id: &ChatId, message: Message) -> Result<()> {
        let chat = self
            .chats
            .get_mut(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))?;

        if self.config.sender_policy == SenderPolicy::MembersOnly
            && !chat.members().any(|m| m.id() == message.sender())
        {
            return Err(StoreError::UnknownSender {
                chat_id: chat_id.clone(),
                sender: message.sender().clone(),
            });
        }

        chat.append_message(message);
        Ok(())
    }

    /// Chats whose members include every given user's identity.
    ///
    /// Extra members are fine. An empty `users` matches every chat.
    pub fn shared_chats<'u>(&self, users: impl IntoIterator<Item = &'u User>) -> Vec<&ChatId> {
        let wanted: BTreeSet<&Identity> = users.into_iter().map(User::identity).collect();

        self.chats
            .iter()
            .filter(|(_, chat)| chat.contains_all(wanted.iter().copied()))
            .map(|(chat_id, _)| chat_id)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────

    /// Search a chat's text messages, newest first.
    pub fn search<'a>(&'a self, chat_id: &ChatId, pattern: &'a Regex) -> Result<TextMatches<'a>> {
        Ok(self.get_chat(chat_id)?.search_text(pattern))
    }

    /// Compile `pattern` and search a chat's text messages, newest first.
    ///
    /// The pattern is unanchored: any substring match counts.
    pub fn find_regex(&self, chat_id: &ChatId, pattern: &str) -> Result<TextMatches<'_>> {
        let chat = self.get_chat(chat_id)?;
        let regex = RegexBuilder::new(pattern)
            .size_limit(self.config.pattern_size_limit)
            .build()?;
        Ok(chat.search_text_owned(regex))
    }

    fn get_chat(&self, chat_id: &ChatId) -> Result<&Chat> {
        self.chats
            .get(chat_id)
            .ok_or_else(|| StoreError::ChatNotFound(chat_id.clone()))
    }
}

fn log_report(chat_id: &ChatId, report: &MembershipReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            MemberStatus::Added => {
                tracing::debug!(chat = %chat_id, user = %outcome.user_id, "member added");
            }
            MemberStatus::Duplicate { existing } => {
                tracing::warn!(
                    chat = %chat_id,
                    user = %outcome.user_id,
                    existing = %existing,
                    identity = %outcome.identity,
                    "member already present"
                );
            }
        }
    }
}

impl PartialEq for MessengerStore {
    fn eq(&self, other: &Self) -> bool {
        self.identity_count() == other.identity_count()
    }
}

impl Eq for MessengerStore {}

impl PartialOrd for MessengerStore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MessengerStore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity_count().cmp(&other.identity_count())
    }
}

impl BitOr for &MessengerStore {
    type Output = BTreeSet<Identity>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for &MessengerStore {
    type Output = BTreeSet<Identity>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}

impl Sub for &MessengerStore {
    type Output = BTreeSet<Identity>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}
