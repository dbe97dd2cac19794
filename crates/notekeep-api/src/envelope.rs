//! Success envelopes. Failures use [`crate::error::ErrorBody`].

use notekeep_core::{Note, Pagination};
use serde::Serialize;

/// `{"success": true, "data": <note>}`
#[derive(Debug, Serialize)]
pub struct NoteEnvelope {
    pub success: bool,
    pub data: Note,
}

impl NoteEnvelope {
    pub fn new(data: Note) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// A page of notes with its pagination metadata. `count` is the number of
/// notes in this page, not the total.
#[derive(Debug, Serialize)]
pub struct NotePageEnvelope {
    pub success: bool,
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Note>,
}

impl NotePageEnvelope {
    pub fn new(data: Vec<Note>, pagination: Pagination) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination,
            data,
        }
    }
}

/// `{"success": true, "message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: &'static str,
}

impl MessageEnvelope {
    pub fn new(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
