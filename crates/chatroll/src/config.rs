//! Store configuration.

use std::path::{Path, PathBuf};

use chatroll_core::{PhoneNormalizer, DEFAULT_REGION};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default compiled-size limit for search patterns (1 MiB).
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Whether messages may reference senders outside the chat's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderPolicy {
    /// Any sender id is accepted, like an address book kept apart from history.
    #[default]
    Unchecked,
    /// The sender id must belong to a current member.
    MembersOnly,
}

/// Configuration for a [`MessengerStore`](crate::MessengerStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Region used to parse phone numbers written without a country code.
    pub region: String,
    /// Base directory for relative binary content paths in input records.
    pub content_root: Option<PathBuf>,
    /// Sender membership policy for appended messages.
    pub sender_policy: SenderPolicy,
    /// Compiled-size limit for patterns passed to `find_regex`.
    pub pattern_size_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            content_root: None,
            sender_policy: SenderPolicy::Unchecked,
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
        }
    }
}

impl StoreConfig {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = Some(root.into());
        self
    }

    pub fn with_sender_policy(mut self, policy: SenderPolicy) -> Self {
        self.sender_policy = policy;
        self
    }

    /// Build the phone normalizer for the configured region.
    pub fn normalizer(&self) -> Result<PhoneNormalizer> {
        Ok(PhoneNormalizer::new(&self.region)?)
    }

    /// Resolve a content path against `content_root` when it is relative.
    pub fn resolve_content_path(&self, path: &Path) -> PathBuf {
        match &self.content_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.region, "RU");
        assert_eq!(config.sender_policy, SenderPolicy::Unchecked);
        assert!(config.normalizer().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"sender_policy": "members_only"}"#).unwrap();
        assert_eq!(config.sender_policy, SenderPolicy::MembersOnly);
        assert_eq!(config.region, "RU");
        assert_eq!(config.pattern_size_limit, DEFAULT_PATTERN_SIZE_LIMIT);
    }

    #[test]
    fn test_resolve_content_path() {
        let config = StoreConfig::default().with_content_root("/data/media");
        assert_eq!(
            config.resolve_content_path(Path::new("cat.png")),
            PathBuf::from("/data/media/cat.png")
        );
        assert_eq!(
            config.resolve_content_path(Path::new("/abs/dog.png")),
            PathBuf::from("/abs/dog.png")
        );
    }

    #[test]
    fn test_unknown_region_rejected() {
        assert!(StoreConfig::default().with_region("ZZZ").normalizer().is_err());
    }
}
