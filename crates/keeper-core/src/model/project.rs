//! Hierarchical project namespace.
//!
//! A [`Project`] is a dotted name (`grocery.produce`) plus a kind tag. It
//! scopes items and addresses broadcast channels. Containment is decided
//! segment-wise over the split name, never over the raw string, so `gro`
//! can never swallow `grocery`.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::item::ParseEnumError;

/// The kind tag carried by every project name.
///
/// `Null` is the wildcard: it contains every project regardless of kind,
/// and is itself contained by nothing but an identical `Null` project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Null,
    Todo,
    Checklist,
    Ref,
}

impl ProjectKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Todo => "todo",
            Self::Checklist => "checklist",
            Self::Ref => "ref",
        }
    }

    /// Display prefix used in the todo.txt-style rendering.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Null => "",
            Self::Todo => "+",
            Self::Checklist => "+^",
            Self::Ref => "+#",
        }
    }

    /// Stable integer code for SQLite storage.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Null => 0,
            Self::Todo => 1,
            Self::Checklist => 2,
            Self::Ref => 3,
        }
    }

    /// Inverse of [`Self::code`].
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Null),
            1 => Some(Self::Todo),
            2 => Some(Self::Checklist),
            3 => Some(Self::Ref),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "todo" => Ok(Self::Todo),
            "checklist" => Ok(Self::Checklist),
            "ref" => Ok(Self::Ref),
            _ => Err(ParseEnumError {
                expected: "project kind",
                got: s.to_string(),
            }),
        }
    }
}

/// Immutable project value: dotted hierarchical name + kind.
///
/// Equality is exact on both fields. The display prefix never participates
/// in equality or containment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    name: String,
    kind: ProjectKind,
}

impl Project {
    pub fn new(name: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The wildcard project: empty name, `Null` kind.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            name: String::new(),
            kind: ProjectKind::Null,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ProjectKind {
        self.kind
    }

    /// Name segments; the empty name has no segments.
    #[must_use]
    pub fn name_parts(&self) -> Vec<&str> {
        if self.name.is_empty() {
            Vec::new()
        } else {
            self.name.split('.').collect()
        }
    }

    /// Number of name segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.name_parts().len()
    }

    /// Whether `other` lives inside this project's subtree.
    ///
    /// `Null` acts as a wildcard and contains everything. Otherwise the
    /// kinds must match and this project's segments must be a prefix of
    /// `other`'s. A project can never contain one that is more general:
    /// `grocery` contains `grocery.produce`, not the other way around.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        if self.kind != ProjectKind::Null && self.kind != other.kind {
            return false;
        }

        let mine = self.name_parts();
        let theirs = other.name_parts();
        if mine.len() > theirs.len() {
            return false;
        }

        mine.iter().zip(theirs.iter()).all(|(a, b)| a == b)
    }

    /// Keep only the first `num_parts` segments; truncating past the end
    /// returns the full name unchanged.
    #[must_use]
    pub fn truncate(&self, num_parts: usize) -> Self {
        let parts = self.name_parts();
        let kept = &parts[..num_parts.min(parts.len())];
        Self::new(kept.join("."), self.kind)
    }

    /// The deepest project containing every input.
    ///
    /// Returns the [`Self::null`] project for an empty input or when the
    /// inputs span more than one kind; otherwise the longest shared
    /// segment prefix, tagged with the shared kind.
    #[must_use]
    pub fn common_root<'a, I>(projects: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let ps: Vec<&Self> = projects.into_iter().collect();
        let Some(first) = ps.first() else {
            return Self::null();
        };

        let kind = first.kind;
        if ps.iter().any(|p| p.kind != kind) {
            return Self::null();
        }

        let partss: Vec<Vec<&str>> = ps.iter().map(|p| p.name_parts()).collect();
        let shortest = partss
            .iter()
            .min_by_key(|parts| parts.len())
            .map_or_else(Vec::new, Clone::clone);

        for (i, value) in shortest.iter().enumerate() {
            if partss.iter().any(|parts| parts[i] != *value) {
                return Self::new(shortest[..i].join("."), kind);
            }
        }

        // Every input starts with the entire shortest name.
        Self::new(shortest.join("."), kind)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.name)
    }
}
