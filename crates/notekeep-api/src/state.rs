//! Shared application state and store selection.

use std::sync::Arc;

use notekeep_core::{Error, NoteRepository};
use notekeep_db::{log_pool_metrics, Database, MemoryNoteRepository, MEMORY_DATABASE_URL};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{ApiError, NoteOp};

/// Application state shared across handlers.
///
/// Built once at startup; the store is injected rather than reached through
/// a global.
#[derive(Clone)]
pub struct AppState {
    /// The note store backend.
    pub notes: Arc<dyn NoteRepository>,
    /// Echo internal failure detail in error envelopes (development only).
    pub expose_errors: bool,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteRepository>, expose_errors: bool) -> Self {
        Self {
            notes,
            expose_errors,
        }
    }

    /// Classify a failure of `op` for the response.
    pub fn fail(&self, op: NoteOp, err: Error) -> ApiError {
        ApiError::from_store(op, err, self.expose_errors)
    }
}

/// Open the store named by `DATABASE_URL`.
pub async fn connect_store(config: &ApiConfig) -> notekeep_core::Result<Arc<dyn NoteRepository>> {
    if config.database_url == MEMORY_DATABASE_URL {
        info!(
            subsystem = "api",
            component = "store",
            "Using in-memory note store"
        );
        return Ok(Arc::new(MemoryNoteRepository::new()));
    }

    info!(subsystem = "api", component = "store", "Connecting to database...");
    let db = Database::connect_with_config(&config.database_url, &config.pool).await?;
    info!(subsystem = "api", component = "store", "Database connected");
    log_pool_metrics(db.pool());

    if config.run_migrations {
        info!(subsystem = "api", component = "store", "Running database migrations...");
        db.migrate().await?;
        info!(subsystem = "api", component = "store", "Database migrations complete");
    }

    Ok(Arc::new(db.notes))
}
