//! User: a raw user reference bound to a normalized identity.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::error::Result;
use crate::phone::PhoneNormalizer;
use crate::types::{Identity, UserId};

/// A chat member.
///
/// Equality, ordering and hashing are defined by [`Identity`] alone, so two
/// users with different raw ids but the same subscriber number collide.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    phone: String,
    identity: Identity,
}

impl User {
    /// Create a user, normalizing `phone` under `region`.
    pub fn new(id: impl Into<UserId>, phone: impl Into<String>, region: &str) -> Result<Self> {
        Self::with_normalizer(id, phone, &PhoneNormalizer::new(region)?)
    }

    /// Create a user with an existing normalizer.
    pub fn with_normalizer(
        id: impl Into<UserId>,
        phone: impl Into<String>,
        normalizer: &PhoneNormalizer,
    ) -> Result<Self> {
        let phone = phone.into();
        let identity = normalizer.normalize(&phone)?;
        Ok(Self {
            id: id.into(),
            phone,
            identity,
        })
    }

    /// The raw user id.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// The phone string as supplied.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// The normalized identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl PartialOrd for User {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for User {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity.cmp(&other.identity)
    }
}
