//! Core data models for notekeep.
//!
//! A [`Note`] is the only persisted entity. Its identifier is a [`NoteId`],
//! a time-ordered UUIDv7 assigned by the service when the note is created.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Opaque, immutable identifier of a note.
///
/// New identifiers are UUIDv7 so that ids sort in creation order. Parsing
/// accepts any well-formed UUID text; anything else is rejected with
/// [`Error::InvalidIdentifier`], which callers must keep distinct from
/// [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh identifier for a new note.
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an identifier received from a client.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        raw.parse()
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for NoteId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A stored note.
///
/// `title` and `content` are always trimmed and non-empty, and `title` is at
/// most [`crate::validation::MAX_TITLE_CHARS`] characters. `created_at` is set
/// once when the note is created and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
