use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use super::EnhancementKinds;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{6}$").expect("valid slug pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// Six lowercase alphanumerics forming the local-part of a user's inbound address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserSlug(String);

impl UserSlug {
    pub fn parse(raw: &str) -> Option<Self> {
        SLUG_PATTERN.is_match(raw).then(|| Self(raw.to_string()))
    }

    /// Extracts the slug from a recipient such as `Notes <ab12cd@in.example.com>`.
    pub fn from_recipient(recipient: &str) -> Option<Self> {
        let address = match (recipient.rfind('<'), recipient.rfind('>')) {
            (Some(start), Some(end)) if start < end => &recipient[start + 1..end],
            _ => recipient,
        };
        let (local, _domain) = address.trim().split_once('@')?;
        Self::parse(local)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub slug: UserSlug,
    pub approved: bool,
    pub enhancement_kinds: EnhancementKinds,
    pub api_key: Option<String>,
}

/// Who is calling, resolved once at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Caller {
    Authenticated(User),
    Anonymous,
}

impl Caller {
    pub fn user(&self) -> Option<&User> {
        match self {
            Caller::Authenticated(user) => Some(user),
            Caller::Anonymous => None,
        }
    }
}
