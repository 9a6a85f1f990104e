//! Message content: a closed set of payload kinds.
//!
//! Content is validated and materialized once, at construction. Binary
//! payloads sourced from a path are read eagerly; the file handle never
//! outlives [`MessageContent::load`].

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The kind of payload a message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// UTF-8 text. The only searchable kind.
    Text,
    /// Opaque bytes, e.g. an image.
    Binary,
}

/// Where a payload comes from: inline bytes or a file path.
///
/// Exactly one of the two must be set by the time the content is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSource {
    inline: Option<Bytes>,
    path: Option<PathBuf>,
}

impl ContentSource {
    /// A source with no data at all. Loading it always fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An inline payload.
    pub fn inline(data: impl Into<Bytes>) -> Self {
        Self {
            inline: Some(data.into()),
            path: None,
        }
    }

    /// A payload read from `path` at load time.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            inline: None,
            path: Some(path.into()),
        }
    }

    /// Set the inline payload, keeping any path.
    pub fn with_inline(mut self, data: impl Into<Bytes>) -> Self {
        self.inline = Some(data.into());
        self
    }

    /// Set the path, keeping any inline payload.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A validated message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Binary(Bytes),
}

impl MessageContent {
    /// Text content from an inline string.
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text(data.into())
    }

    /// Binary content from inline bytes.
    pub fn binary(data: impl Into<Bytes>) -> Self {
        Self::Binary(data.into())
    }

    /// Binary content read from a file.
    pub fn binary_from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_payload(path.as_ref()).map(Self::Binary)
    }

    /// Validate `source` for `kind` and materialize the payload.
    ///
    /// - Text needs inline data that is valid UTF-8 and no path.
    /// - Binary needs exactly one of inline data or a path; a path is read now.
    pub fn load(kind: ContentKind, source: ContentSource) -> Result<Self> {
        match (kind, source.inline, source.path) {
            (ContentKind::Text, Some(data), None) => String::from_utf8(data.to_vec())
                .map(Self::Text)
                .map_err(|_| CoreError::ContentSource("text payload is not valid UTF-8".into())),
            (ContentKind::Text, _, Some(path)) => Err(CoreError::ContentSource(format!(
                "text content must be inline, got path {}",
                path.display()
            ))),
            (ContentKind::Text, None, None) => Err(CoreError::ContentSource(
                "text content requires inline data".into(),
            )),
            (ContentKind::Binary, Some(_), Some(_)) => Err(CoreError::ContentSource(
                "binary content has both inline data and a path".into(),
            )),
            (ContentKind::Binary, Some(data), None) => Ok(Self::Binary(data)),
            (ContentKind::Binary, None, Some(path)) => Self::binary_from_path(path),
            (ContentKind::Binary, None, None) => Err(CoreError::ContentSource(
                "binary content requires inline data or a path".into(),
            )),
        }
    }

    /// The kind tag.
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Binary(_) => ContentKind::Binary,
        }
    }

    /// The raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => &b[..],
        }
    }

    /// Text eligible for search. `None` for binary payloads.
    pub fn searchable_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Binary(_) => None,
        }
    }
}

fn read_payload(path: &Path) -> Result<Bytes> {
    fs::read(path)
        .map(Bytes::from)
        .map_err(|source| CoreError::ContentLoad {
            path: path.to_path_buf(),
            source,
        })
}
