//! Write-time validation for note payloads.
//!
//! [`NewNote`] and [`NotePatch`] can only be built through their validating
//! constructors, so every repository write receives input that already
//! satisfies the note schema:
//!
//! | Field     | Rules                                        |
//! |-----------|----------------------------------------------|
//! | `title`   | required, trimmed, at most 100 characters    |
//! | `content` | required, trimmed, no length limit           |
//!
//! All violated constraints are reported together in a [`ValidationError`].

use std::fmt;

use serde::Serialize;

/// Maximum title length, counted in characters after trimming.
pub const MAX_TITLE_CHARS: usize = 100;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title cannot be more than 100 characters";
pub const CONTENT_REQUIRED: &str = "Content is required";

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// One or more schema constraints violated by a write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// True if any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Note validation failed: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn check_title(raw: Option<&str>, violations: &mut Vec<Violation>) -> String {
    let title = raw.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        violations.push(Violation {
            field: "title",
            message: TITLE_REQUIRED,
        });
    } else if title.chars().count() > MAX_TITLE_CHARS {
        violations.push(Violation {
            field: "title",
            message: TITLE_TOO_LONG,
        });
    }
    title.to_string()
}

fn check_content(raw: Option<&str>, violations: &mut Vec<Violation>) -> String {
    let content = raw.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        violations.push(Violation {
            field: "content",
            message: CONTENT_REQUIRED,
        });
    }
    content.to_string()
}

fn finish<T>(value: T, violations: Vec<Violation>) -> Result<T, ValidationError> {
    if violations.is_empty() {
        Ok(value)
    } else {
        tracing::debug!(
            subsystem = "core",
            component = "validation",
            violation_count = violations.len(),
            "Rejected note payload"
        );
        Err(ValidationError { violations })
    }
}

/// Validated payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    title: String,
    content: String,
}

impl NewNote {
    /// Trim and validate both fields. Missing fields count as empty.
    pub fn new(title: Option<&str>, content: Option<&str>) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let title = check_title(title, &mut violations);
        let content = check_content(content, &mut violations);
        finish(Self { title, content }, violations)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Validated partial update. Fields left as `None` are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    title: Option<String>,
    content: Option<String>,
}

impl NotePatch {
    /// Trim and validate whichever fields are supplied, with the same rules
    /// as [`NewNote::new`].
    pub fn new(title: Option<&str>, content: Option<&str>) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let title = title.map(|t| check_title(Some(t), &mut violations));
        let content = content.map(|c| check_content(Some(c), &mut violations));
        finish(Self { title, content }, violations)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
