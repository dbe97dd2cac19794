//! Tracing subscriber setup.
//!
//! Events carry `subsystem` (`api`, `db`, `core`), `component` and `op`
//! fields, plus `note_id`, `query`, `result_count` or `duration_ms` where
//! they apply.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Store failures surfaced as 5xx, handler panics |
//! | WARN  | Config fallbacks, pool exhaustion |
//! | INFO  | Startup, shutdown, writes |
//! | DEBUG | Reads, rejected input, pool metrics |

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogConfig, LogFormat};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "notekeep_api=debug,notekeep_db=debug,tower_http=debug";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer and must live as long as the
/// process logs to a file.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(ref path) = config.file {
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("notekeep-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match config.format {
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init(),
            LogFormat::Text => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(config.ansi.unwrap_or(false)), // no ANSI in files by default
                )
                .init(),
        }
        Some(guard)
    } else {
        match config.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
            LogFormat::Text => {
                let mut layer = tracing_subscriber::fmt::layer();
                if let Some(ansi) = config.ansi {
                    layer = layer.with_ansi(ansi);
                }
                registry.with(layer).init();
            }
        }
        None
    }
}
