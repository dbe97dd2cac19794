//! PostgreSQL connection pool.
//!
//! The service holds one pool for its whole lifetime. Every knob here is
//! settable from the environment (see `notekeep-api`'s config), and the
//! defaults suit a single small instance.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use notekeep_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Sizing and timeouts for the note store's pool.
///
/// `min_connections` never exceeds `max_connections`, and `max_connections`
/// is at least 1. `None` timeouts mean connections are never reaped for
/// that reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request waits for a free connection before failing.
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            idle_timeout: Some(DEFAULT_IDLE_TIMEOUT),
            max_lifetime: Some(DEFAULT_MAX_LIFETIME),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n.min(self.max_connections);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

/// Open a pool against `database_url`, failing if the first connection
/// cannot be established.
pub async fn connect_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();
    debug!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        ?config,
        "Opening note store pool"
    );

    let pool = config
        .options()
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        pool_size = pool.size(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Note store pool ready"
    );
    Ok(pool)
}

/// Log pool occupancy, warning when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();
    debug!(
        subsystem = "db",
        component = "pool",
        pool_size = size,
        pool_idle = idle,
        "Pool occupancy"
    );
    if size > 0 && idle == 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "All pooled connections are in use"
        );
    }
}
