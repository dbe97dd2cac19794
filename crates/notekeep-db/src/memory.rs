//! In-memory note repository.
//!
//! Holds notes in process memory with the same ordering, filtering, and
//! failure semantics as [`crate::PgNoteRepository`]. Selected with
//! `DATABASE_URL=memory://` and used to drive the HTTP layer in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use notekeep_core::{Error, NewNote, Note, NoteFilter, NoteId, NotePatch, NoteRepository, Result};

/// Connection string that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// In-memory implementation of NoteRepository.
///
/// Clones share the same underlying collection.
#[derive(Clone, Default)]
pub struct MemoryNoteRepository {
    notes: Arc<RwLock<Vec<Note>>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-built notes, keeping their ids and timestamps.
    pub async fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let repo = Self::new();
        repo.notes.write().await.extend(notes);
        repo
    }
}

/// Newest first; ids break ties so the order is total.
fn newest_first(a: &Note, b: &Note) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn to_index(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn count(&self, filter: &NoteFilter) -> Result<u64> {
        let notes = self.notes.read().await;
        let total = notes
            .iter()
            .filter(|n| filter.matches(&n.title, &n.content))
            .count();
        Ok(total as u64)
    }

    async fn list(&self, filter: &NoteFilter, skip: u64, limit: u64) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut matching: Vec<&Note> = notes
            .iter()
            .filter(|n| filter.matches(&n.title, &n.content))
            .collect();
        matching.sort_by(|a, b| newest_first(a, b));

        Ok(matching
            .into_iter()
            .skip(to_index(skip))
            .take(to_index(limit))
            .cloned()
            .collect())
    }

    async fn fetch(&self, id: NoteId) -> Result<Note> {
        let notes = self.notes.read().await;
        notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    async fn insert(&self, note: NewNote) -> Result<Note> {
        let note = Note {
            id: NoteId::new(),
            title: note.title().to_string(),
            content: note.content().to_string(),
            created_at: Utc::now(),
        };
        self.notes.write().await.push(note.clone());
        debug!(
            subsystem = "db",
            component = "memory_store",
            op = "insert",
            note_id = %note.id,
            "Inserted note"
        );
        Ok(note)
    }

    async fn update(&self, id: NoteId, patch: NotePatch) -> Result<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(Error::NotFound(id))?;

        if let Some(title) = patch.title() {
            note.title = title.to_string();
        }
        if let Some(content) = patch.content() {
            note.content = content.to_string();
        }
        Ok(note.clone())
    }

    async fn delete(&self, id: NoteId) -> Result<()> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}
