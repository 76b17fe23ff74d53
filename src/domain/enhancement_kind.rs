use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementKind {
    Cleanup,
    Summary,
}

impl EnhancementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhancementKind::Cleanup => "cleanup",
            EnhancementKind::Summary => "summary",
        }
    }

    /// Label used in enhancement email subjects.
    pub fn label(&self) -> &'static str {
        match self {
            EnhancementKind::Cleanup => "Cleaned",
            EnhancementKind::Summary => "Summary",
        }
    }
}

impl FromStr for EnhancementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cleanup" => Ok(EnhancementKind::Cleanup),
            "summary" => Ok(EnhancementKind::Summary),
            other => Err(format!("Invalid enhancement kind: {}", other)),
        }
    }
}

impl fmt::Display for EnhancementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered, duplicate-free set of enhancement kinds. Insertion order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<EnhancementKind>", into = "Vec<EnhancementKind>")]
pub struct EnhancementKinds(Vec<EnhancementKind>);

impl EnhancementKinds {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, kind: EnhancementKind) -> bool {
        if self.0.contains(&kind) {
            return false;
        }
        self.0.push(kind);
        true
    }

    pub fn contains(&self, kind: EnhancementKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = EnhancementKind> + '_ {
        self.0.iter().copied()
    }

    /// Comma-separated storage form, e.g. `cleanup,summary`.
    pub fn serialize(&self) -> String {
        self.0
            .iter()
            .map(EnhancementKind::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parses the storage form. Blank input yields an empty set.
    pub fn parse(raw: &str) -> Result<Self, String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(EnhancementKind::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from)
    }
}

impl From<Vec<EnhancementKind>> for EnhancementKinds {
    fn from(kinds: Vec<EnhancementKind>) -> Self {
        let mut set = Self::new();
        for kind in kinds {
            set.insert(kind);
        }
        set
    }
}

impl From<EnhancementKinds> for Vec<EnhancementKind> {
    fn from(kinds: EnhancementKinds) -> Self {
        kinds.0
    }
}

impl FromIterator<EnhancementKind> for EnhancementKinds {
    fn from_iter<I: IntoIterator<Item = EnhancementKind>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}
