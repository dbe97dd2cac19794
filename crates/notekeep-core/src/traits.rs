//! Core traits for notekeep abstractions.
//!
//! The HTTP layer only ever talks to a `dyn NoteRepository`, so the store
//! backend is chosen once at startup and injected into the handlers.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Note, NoteId};
use crate::search::NoteFilter;
use crate::validation::{NewNote, NotePatch};

/// Repository for note CRUD operations.
///
/// Each call is independent; no transaction spans two calls.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Number of notes matching `filter`.
    async fn count(&self, filter: &NoteFilter) -> Result<u64>;

    /// Up to `limit` notes matching `filter`, newest `created_at` first,
    /// after skipping `skip` matches.
    async fn list(&self, filter: &NoteFilter, skip: u64, limit: u64) -> Result<Vec<Note>>;

    /// Fetch a note. Fails with `Error::NotFound` if no note has `id`.
    async fn fetch(&self, id: NoteId) -> Result<Note>;

    /// Insert a new note, assigning its id and creation time.
    async fn insert(&self, note: NewNote) -> Result<Note>;

    /// Apply `patch` and return the updated note.
    async fn update(&self, id: NoteId, patch: NotePatch) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, id: NoteId) -> Result<()>;
}
