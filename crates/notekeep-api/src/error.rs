//! Mapping of store failures to HTTP responses.
//!
//! Every failure is rendered as the JSON envelope
//! `{"success": false, "message": ..., "error"?: ...}`.
//!
//! | Failure | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | `InvalidIdentifier` | 400 |
//! | `Validation` | 400 |
//! | missing input, malformed body | 400 |
//! | anything else during create/update | 400 |
//! | anything else during list/search/get/delete | 500 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notekeep_core::Error;
use serde::Serialize;
use tracing::{debug, error};

pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const INVALID_NOTE_ID: &str = "Invalid note ID format";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const BODY_TOO_LARGE: &str = "Request body too large";

/// The note operation a failure happened in. Decides the failure message and
/// the status for unclassified store errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOp {
    List,
    Search,
    Get,
    Create,
    Update,
    Delete,
}

impl NoteOp {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteOp::List => "list",
            NoteOp::Search => "search",
            NoteOp::Get => "get",
            NoteOp::Create => "create",
            NoteOp::Update => "update",
            NoteOp::Delete => "delete",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            NoteOp::List => "Failed to retrieve notes",
            NoteOp::Search => "Failed to search notes",
            NoteOp::Get => "Failed to retrieve note",
            NoteOp::Create => "Failed to create note",
            NoteOp::Update => "Failed to update note",
            NoteOp::Delete => "Failed to delete note",
        }
    }

    /// Writes report unclassified failures as client errors.
    fn is_write(self) -> bool {
        matches!(self, NoteOp::Create | NoteOp::Update)
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    BadRequest {
        message: &'static str,
        detail: Option<String>,
    },
    Internal {
        message: &'static str,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: &'static str) -> Self {
        ApiError::BadRequest {
            message,
            detail: None,
        }
    }

    /// Classify a core error raised while performing `op`.
    ///
    /// Validation detail is always returned since it describes the client's
    /// own input. Other internal detail is returned only when `expose_detail`
    /// is set.
    pub fn from_store(op: NoteOp, err: Error, expose_detail: bool) -> Self {
        match err {
            Error::NotFound(id) => {
                debug!(subsystem = "api", component = "notes", op = op.as_str(), note_id = %id, "Note not found");
                ApiError::NotFound(NOTE_NOT_FOUND)
            }
            Error::InvalidIdentifier(raw) => {
                debug!(subsystem = "api", component = "notes", op = op.as_str(), raw_id = %raw, "Invalid note id");
                ApiError::bad_request(INVALID_NOTE_ID)
            }
            Error::Validation(v) => {
                debug!(subsystem = "api", component = "notes", op = op.as_str(), error = %v, "Validation failed");
                ApiError::BadRequest {
                    message: op.failure_message(),
                    detail: Some(v.to_string()),
                }
            }
            other => {
                error!(
                    subsystem = "api",
                    component = "notes",
                    op = op.as_str(),
                    error_kind = other.kind(),
                    error = %other,
                    "Note operation failed"
                );
                let message = op.failure_message();
                let detail = expose_detail.then(|| other.to_string());
                if op.is_write() {
                    ApiError::BadRequest { message, detail }
                } else {
                    ApiError::Internal { message, detail }
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: &'static str, error: Option<String>) -> Self {
        Self {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(message) => ErrorBody::new(message, None),
            ApiError::BadRequest { message, detail } | ApiError::Internal { message, detail } => {
                ErrorBody::new(message, detail)
            }
        };
        (status, Json(body)).into_response()
    }
}
