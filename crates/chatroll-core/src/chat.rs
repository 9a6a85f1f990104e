//! Chat: members unique by identity plus an append-only message log.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::iter::Rev;
use std::slice;

use regex::Regex;
use serde::Serialize;

use crate::content::MessageContent;
use crate::message::Message;
use crate::types::{Identity, Timestamp, UserId};
use crate::user::User;

/// A named collection of users and their chronological messages.
///
/// Membership is keyed by [`Identity`]; the message log preserves insertion
/// order, which is taken to be chronological.
#[derive(Debug, Clone, Default)]
pub struct Chat {
    members: BTreeMap<Identity, User>,
    messages: Vec<Message>,
}

/// What happened to one user passed to [`Chat::add_members`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MemberStatus {
    /// The user was inserted.
    Added,
    /// A member with the same identity was already present. Non-fatal.
    Duplicate { existing: UserId },
}

/// Per-user outcome of a membership change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberOutcome {
    pub user_id: UserId,
    pub identity: Identity,
    #[serde(flatten)]
    pub status: MemberStatus,
}

/// Outcomes of a batch membership change, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipReport {
    pub outcomes: Vec<MemberOutcome>,
}

impl MembershipReport {
    /// Outcomes for users that were inserted.
    pub fn added(&self) -> impl Iterator<Item = &MemberOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == MemberStatus::Added)
    }

    /// Outcomes for users skipped as duplicates.
    pub fn duplicates(&self) -> impl Iterator<Item = &MemberOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, MemberStatus::Duplicate { .. }))
    }

    pub fn added_count(&self) -> usize {
        self.added().count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates().count()
    }
}

/// A message matching a search pattern.
///
/// Only text content is searched, so `text` is always the payload of
/// `content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRecord<'a> {
    pub sender: &'a UserId,
    pub timestamp: &'a Timestamp,
    #[serde(skip)]
    pub content: &'a MessageContent,
    pub text: &'a str,
}

/// Lazy, newest-first scan over a chat's text messages.
///
/// Created by [`Chat::search_text`]. Each call starts a fresh scan.
#[derive(Debug, Clone)]
pub struct TextMatches<'a> {
    messages: Rev<slice::Iter<'a, Message>>,
    pattern: Cow<'a, Regex>,
}

impl<'a> Iterator for TextMatches<'a> {
    type Item = MatchRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for message in self.messages.by_ref() {
            let Some(text) = message.content().searchable_text() else {
                continue;
            };
            if self.pattern.is_match(text) {
                return Some(MatchRecord {
                    sender: message.sender(),
                    timestamp: message.timestamp(),
                    content: message.content(),
                    text,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.messages.size_hint().1)
    }
}

impl Chat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add users, skipping any whose identity is already a member.
    ///
    /// Never fails; each user gets an outcome in the returned report.
    pub fn add_members(&mut self, users: impl IntoIterator<Item = User>) -> MembershipReport {
        let mut report = MembershipReport::default();

        for user in users {
            let status = match self.members.get(user.identity()) {
                Some(existing) => MemberStatus::Duplicate {
                    existing: existing.id().clone(),
                },
                None => MemberStatus::Added,
            };

            report.outcomes.push(MemberOutcome {
                user_id: user.id().clone(),
                identity: user.identity().clone(),
                status: status.clone(),
            });

            if status == MemberStatus::Added {
                self.members.insert(user.identity().clone(), user);
            }
        }

        report
    }

    /// Append a message. The sender is not checked against membership.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Scan text messages newest-first for `pattern` (unanchored).
    pub fn search_text<'a>(&'a self, pattern: &'a Regex) -> TextMatches<'a> {
        TextMatches {
            messages: self.messages.iter().rev(),
            pattern: Cow::Borrowed(pattern),
        }
    }

    /// Like [`Chat::search_text`], taking ownership of the pattern.
    pub fn search_text_owned(&self, pattern: Regex) -> TextMatches<'_> {
        TextMatches {
            messages: self.messages.iter().rev(),
            pattern: Cow::Owned(pattern),
        }
    }

    /// Members in identity order.
    pub fn members(&self) -> impl Iterator<Item = &User> {
        self.members.values()
    }

    pub fn member_identities(&self) -> impl Iterator<Item = &Identity> {
        self.members.keys()
    }

    /// The member holding `identity`, if any.
    pub fn member(&self, identity: &Identity) -> Option<&User> {
        self.members.get(identity)
    }

    pub fn contains(&self, user: &User) -> bool {
        self.members.contains_key(user.identity())
    }

    /// Whether every identity in `identities` is a member.
    pub fn contains_all<'i>(&self, identities: impl IntoIterator<Item = &'i Identity>) -> bool {
        identities
            .into_iter()
            .all(|identity| self.members.contains_key(identity))
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;
    use proptest::prelude::*;

    fn user(id: &str, phone: &str) -> User {
        User::new(id, phone, "RU").unwrap()
    }

    fn sample_chat() -> Chat {
        let mut chat = Chat::new();
        chat.add_members([user("u1", "+79854321234"), user("u2", "83424562354")]);
        chat.append_message(Message::text("t1", "u1", "hello world"));
        chat.append_message(Message::new(
            "t2",
            "u2",
            MessageContent::binary(b"hello binary".to_vec()),
        ));
        chat.append_message(Message::text("t3", "u2", "say hello again"));
        chat.append_message(Message::text("t4", "u1", "bye"));
        chat
    }

    #[test]
    fn test_add_members_reports_duplicates() {
        let mut chat = Chat::new();
        let report = chat.add_members([
            user("u1", "+7 985 432 12 34"),
            user("u2", "8 342 456 23 54"),
            user("alias", "8(985)4321234"),
        ]);

        assert_eq!(chat.member_count(), 2);
        assert_eq!(report.added_count(), 2);
        assert_eq!(report.duplicate_count(), 1);

        let dup = report.duplicates().next().unwrap();
        assert_eq!(dup.user_id, UserId::from("alias"));
        assert_eq!(
            dup.status,
            MemberStatus::Duplicate {
                existing: UserId::from("u1")
            }
        );
    }

    #[test]
    fn test_readding_leaves_count_unchanged() {
        let mut chat = sample_chat();
        let before = chat.member_count();

        let report = chat.add_members([user("other-id", "89854321234")]);

        assert_eq!(chat.member_count(), before);
        assert_eq!(report.added_count(), 0);
        // The first member record is kept.
        let kept = chat.member(&report.outcomes[0].identity).unwrap();
        assert_eq!(kept.id().as_str(), "u1");
    }

    #[test]
    fn test_search_newest_first() {
        let chat = sample_chat();
        let pattern = Regex::new("hello").unwrap();

        let hits: Vec<_> = chat.search_text(&pattern).collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].timestamp.as_str(), "t3");
        assert_eq!(hits[0].text, "say hello again");
        assert_eq!(hits[0].content.kind(), ContentKind::Text);
        assert_eq!(hits[0].content.payload(), b"say hello again");
        assert_eq!(hits[1].timestamp.as_str(), "t1");
        assert_eq!(hits[1].sender.as_str(), "u1");
    }

    #[test]
    fn test_search_skips_binary() {
        let chat = sample_chat();
        let pattern = Regex::new("binary").unwrap();
        assert_eq!(chat.search_text(&pattern).count(), 0);
    }

    #[test]
    fn test_search_no_match_is_empty() {
        let chat = sample_chat();
        let pattern = Regex::new("^nothing here$").unwrap();
        assert!(chat.search_text(&pattern).next().is_none());
    }

    #[test]
    fn test_search_is_restartable_and_lazy() {
        let chat = sample_chat();
        let pattern = Regex::new("l+").unwrap();

        let first: Vec<_> = chat.search_text(&pattern).take(1).collect();
        assert_eq!(first[0].timestamp.as_str(), "t3");

        let again: Vec<_> = chat.search_text(&pattern).collect();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_owned_pattern_search() {
        let chat = sample_chat();
        let hits: Vec<_> = chat
            .search_text_owned(Regex::new("bye").unwrap())
            .map(|m| m.timestamp.clone())
            .collect();
        assert_eq!(hits, vec![Timestamp::from("t4")]);
    }

    #[test]
    fn test_orphaned_sender_allowed() {
        let mut chat = sample_chat();
        chat.append_message(Message::text("t5", "ghost", "hello from nowhere"));

        let pattern = Regex::new("nowhere").unwrap();
        let hit = chat.search_text(&pattern).next().unwrap();
        assert_eq!(hit.sender.as_str(), "ghost");
    }

    #[test]
    fn test_contains_all() {
        let chat = sample_chat();
        let u1 = user("x", "+79854321234");
        let u3 = user("u3", "79162342359");

        assert!(chat.contains_all([u1.identity()]));
        assert!(!chat.contains_all([u1.identity(), u3.identity()]));
        assert!(chat.contains_all(std::iter::empty::<&Identity>()));
    }

    #[test]
    fn test_contains_matches_by_identity() {
        let chat = sample_chat();

        assert!(chat.contains(&user("someone-else", "8 (985) 432-12-34")));
        assert!(!chat.contains(&user("u3", "79162342359")));
    }

    proptest! {
        #[test]
        fn test_matches_strictly_newest_first(
            texts in prop::collection::vec("[ab]{0,4}", 0..20),
            binary_every in 2usize..5,
        ) {
            let mut chat = Chat::new();
            for (i, text) in texts.iter().enumerate() {
                let content = if i % binary_every == 0 {
                    MessageContent::binary(text.clone().into_bytes())
                } else {
                    MessageContent::text(text.clone())
                };
                chat.append_message(Message::new(format!("{i:03}"), "u", content));
            }

            let pattern = Regex::new("a").unwrap();
            let stamps: Vec<_> = chat.search_text(&pattern).map(|m| m.timestamp.clone()).collect();

            prop_assert!(stamps.windows(2).all(|w| w[0] > w[1]));
            let expected = texts
                .iter()
                .enumerate()
                .filter(|(i, t)| i % binary_every != 0 && t.contains('a'))
                .count();
            prop_assert_eq!(stamps.len(), expected);
        }
    }
}
