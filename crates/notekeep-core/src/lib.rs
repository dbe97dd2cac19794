//! # notekeep-core
//!
//! Core types, traits, and rules for the notekeep notes service.
//!
//! This crate holds everything that does not depend on a particular store or
//! transport: the [`Note`] model and its identifier, write validation, the
//! pagination helper, the search filter, the error taxonomy, and the
//! [`NoteRepository`] trait implemented by the store backends.

pub mod error;
pub mod models;
pub mod pagination;
pub mod search;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{Note, NoteId};
pub use pagination::{paginate, PageWindow, Pagination};
pub use search::{contains_pattern, escape_like, NoteFilter};
pub use traits::NoteRepository;
pub use validation::{NewNote, NotePatch, ValidationError, Violation, MAX_TITLE_CHARS};
