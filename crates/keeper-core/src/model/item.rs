//! List items and their identity/priority value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::model::project::Project;

/// Error returned when parsing an enum-like value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// Unique, immutable item identifier.
///
/// Backed by a UUIDv7 so ids sort in creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Mint a fresh time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Raw bytes, used as the SQLite primary key.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Rebuild an id from stored bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Item priority, `A` (highest) through `Z`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub struct Priority(char);

impl Priority {
    /// # Errors
    ///
    /// Returns [`ParseEnumError`] unless `letter` is an ASCII uppercase
    /// `A..=Z`.
    pub fn new(letter: char) -> Result<Self, ParseEnumError> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter))
        } else {
            Err(ParseEnumError {
                expected: "priority",
                got: letter.to_string(),
            })
        }
    }

    #[must_use]
    pub const fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for Priority {
    type Error = ParseEnumError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Self::new(letter)
    }
}

impl From<Priority> for char {
    fn from(p: Priority) -> Self {
        p.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

/// A single list entry.
///
/// `completed` and `archived` are pure functions of the timestamps — there
/// is no separate boolean to drift out of sync. Only the registry's command
/// engine mutates an item after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub(crate) id: ItemId,
    pub(crate) description: String,
    pub(crate) priority: Option<Priority>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) completed_at: Option<DateTime<Utc>>,
    pub(crate) archived_at: Option<DateTime<Utc>>,
    pub(crate) project: Project,
    pub(crate) recurring: bool,
}

impl Item {
    /// New active item under the null project, created now.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            description: description.into(),
            priority: None,
            created_at: Utc::now(),
            completed_at: None,
            archived_at: None,
            project: Project::null(),
            recurring: false,
        }
    }

    #[must_use]
    pub fn with_project(mut self, project: Project) -> Self {
        self.project = project;
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Rebuild an item from persisted fields. Used by the store's `load`.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn from_parts(
        id: ItemId,
        description: String,
        priority: Option<Priority>,
        created_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
        archived_at: Option<DateTime<Utc>>,
        project: Project,
        recurring: bool,
    ) -> Self {
        Self {
            id,
            description,
            priority,
            created_at,
            completed_at,
            archived_at,
            project,
            recurring,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub const fn recurring(&self) -> bool {
        self.recurring
    }

    /// Completed iff a completion instant is recorded.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Archived iff an archival instant is recorded.
    #[must_use]
    pub const fn archived(&self) -> bool {
        self.archived_at.is_some()
    }
}

impl fmt::Display for Item {
    /// todo.txt-style line:
    /// `x (A) 2016-05-20T.. 2016-04-30T.. measure space +^chapel rec:true`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pieces: Vec<String> = Vec::new();
        if self.completed() {
            pieces.push("x".to_string());
        }
        if let Some(priority) = self.priority {
            pieces.push(format!("({priority})"));
        }
        if let Some(completed_at) = self.completed_at {
            pieces.push(completed_at.to_rfc3339());
        }
        pieces.push(self.created_at.to_rfc3339());
        pieces.push(self.description.clone());
        let project = self.project.to_string();
        if !project.is_empty() {
            pieces.push(project);
        }
        if let Some(archived_at) = self.archived_at {
            pieces.push(format!("archived:{}", archived_at.to_rfc3339()));
        }
        if self.recurring {
            pieces.push("rec:true".to_string());
        }
        f.write_str(&pieces.join(" "))
    }
}
