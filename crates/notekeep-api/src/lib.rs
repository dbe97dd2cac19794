//! # notekeep-api
//!
//! HTTP handler layer for the notekeep notes service.
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/notes?page=&limit=` | paginated list, newest first |
//! | GET | `/notes/search?query=&page=&limit=` | paginated substring search |
//! | GET | `/notes/:id` | single note |
//! | POST | `/notes` | create |
//! | PUT | `/notes/:id` | update title and/or content |
//! | DELETE | `/notes/:id` | delete |
//! | GET | `/` | liveness text |
//! | GET | `/health` | health JSON |
//!
//! Every JSON response carries `success`; failures add `message` and, where
//! allowed, `error`.

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query_types;
pub mod router;
pub mod state;
pub mod telemetry;

pub use config::ApiConfig;
pub use error::{ApiError, NoteOp};
pub use router::build_router;
pub use state::{connect_store, AppState};
