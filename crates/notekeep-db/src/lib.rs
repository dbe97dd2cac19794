//! # notekeep-db
//!
//! Store backends for notekeep.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteRepository`], the PostgreSQL note store
//! - [`MemoryNoteRepository`], an in-process store with the same semantics
//! - Schema migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use notekeep_db::{Database, NewNote, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notekeep").await?;
//!
//!     let note = db.notes.insert(NewNote::new(Some("Hello"), Some("world"))?).await?;
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use notekeep_core::*;

pub use memory::{MemoryNoteRepository, MEMORY_DATABASE_URL};
pub use notes::PgNoteRepository;
pub use pool::{connect_pool, log_pool_metrics, PoolConfig};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for CRUD operations.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the default pool settings.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, &PoolConfig::default()).await
    }

    /// Connect with explicit pool settings.
    pub async fn connect_with_config(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = connect_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
