//! Query string and request body types.
//!
//! Numeric paging parameters are kept as raw strings: the pagination helper
//! decides how to read them, so a value like `page=abc` falls back to the
//! default instead of failing deserialization.

use std::ops::Deref;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Query parameters for `GET /notes`.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters for `GET /notes/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchNotesQuery {
    /// Case-insensitive substring to look for in title or content
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A text field that also accepts JSON numbers and booleans, stored as
/// their JSON text (`42` becomes `"42"`). Arrays and objects are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexibleText(String);

impl Deref for FlexibleText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FlexibleText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(FlexibleText(s)),
            Value::Number(n) => Ok(FlexibleText(n.to_string())),
            Value::Bool(b) => Ok(FlexibleText(b.to_string())),
            Value::Null => Err(de::Error::custom("expected text, found null")),
            Value::Array(_) => Err(de::Error::custom("expected text, found an array")),
            Value::Object(_) => Err(de::Error::custom("expected text, found an object")),
        }
    }
}

/// Body of `POST /notes` and `PUT /notes/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct NoteBody {
    pub title: Option<FlexibleText>,
    pub content: Option<FlexibleText>,
}

impl NoteBody {
    /// Title if present and non-empty (before trimming).
    pub fn given_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|s| !s.is_empty())
    }

    /// Content if present and non-empty (before trimming).
    pub fn given_content(&self) -> Option<&str> {
        self.content.as_deref().filter(|s| !s.is_empty())
    }
}
