use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, Range};

use crate::{CoreError, Result};

/// Named category of sensitive data (`email`, `credit_card`, ...)
///
/// Stored in snake_case. Spaces and hyphens in the input become underscores,
/// so `"Credit Card"` and `"credit-card"` name the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityType(String);

impl EntityType {
    pub fn new(name: &str) -> Result<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        let valid = normalized
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase())
            && !normalized.ends_with('_')
            && !normalized.contains("__")
            && normalized
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if valid {
            Ok(Self(normalized))
        } else {
            Err(CoreError::InvalidEntityType(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label used inside placeholders: `credit_card` -> `CREDIT_CARD`
    pub fn label(&self) -> String {
        self.0.to_ascii_uppercase()
    }

    /// Human-readable form handed to translators: `credit_card` -> `credit card`
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        value.0
    }
}

/// How an accepted match is written back into the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Replace with a reversible `[TYPE_n]` placeholder
    #[default]
    Placeholder,
    /// Replace with the character-class shape of the value; not reversible
    Normalize,
}

/// A raw detection, before conflict resolution.
///
/// Offsets are byte offsets into the original UTF-8 text, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub start: usize,
    pub end: usize,
    pub value: String,
    pub entity_type: EntityType,
    pub priority: i32,
    pub mode: SubstitutionMode,
}

impl CandidateMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &Range<usize>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A candidate that survived conflict resolution.
///
/// Only the resolver constructs these; a set of accepted matches from one run
/// is pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AcceptedMatch(CandidateMatch);

impl AcceptedMatch {
    pub fn accept(candidate: CandidateMatch) -> Self {
        Self(candidate)
    }

    pub fn into_inner(self) -> CandidateMatch {
        self.0
    }
}

impl Deref for AcceptedMatch {
    type Target = CandidateMatch;

    fn deref(&self) -> &CandidateMatch {
        &self.0
    }
}
