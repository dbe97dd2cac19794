//! Service configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `5000` |
//! | `DATABASE_URL` | `postgres://localhost/notekeep` (`memory://` for the in-memory store) |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `DATABASE_MIN_CONNECTIONS` | `1` |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `DATABASE_IDLE_TIMEOUT_SECS` | `600` (`0` disables) |
//! | `DATABASE_MAX_LIFETIME_SECS` | `1800` (`0` disables) |
//! | `RUN_MIGRATIONS` | `true` |
//! | `APP_ENV` | `production` |
//! | `ALLOWED_ORIGINS` | `*` |
//! | `LOG_FORMAT` | `text` |
//! | `LOG_FILE` | unset (stdout) |
//! | `LOG_ANSI` | auto |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use notekeep_core::Error;
use notekeep_db::{pool, PoolConfig};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/notekeep";

/// Deployment mode. Only development echoes internal error detail to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn exposes_error_detail(self) -> bool {
        self == Environment::Development
    }
}

/// CORS origin policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Daily-rotated log file; stdout when unset.
    pub file: Option<PathBuf>,
    /// Override ANSI colors (auto-detected when unset).
    pub ansi: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool: PoolConfig,
    pub run_migrations: bool,
    pub environment: Environment,
    pub allowed_origins: AllowedOrigins,
    pub log: LogConfig,
    /// Problems found while reading the environment. Logged once tracing is up.
    pub warnings: Vec<String>,
}

/// Read `key` through `parse`. Unset keeps `default` silently; a rejected
/// value keeps it with a warning.
fn read<T: fmt::Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
    warnings: &mut Vec<String>,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            warnings.push(format!("Invalid {} '{}', using {}", key, raw, default));
            default
        }),
    }
}

fn positive<T: std::str::FromStr + PartialOrd + Default>(raw: &str) -> Option<T> {
    raw.parse().ok().filter(|n| *n > T::default())
}

/// Seconds, where 0 turns the timeout off.
fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn read_pool(lookup: &impl Fn(&str) -> Option<String>, warnings: &mut Vec<String>) -> PoolConfig {
    let max = read(
        lookup,
        "DATABASE_MAX_CONNECTIONS",
        pool::DEFAULT_MAX_CONNECTIONS,
        positive,
        warnings,
    );
    let min = read(
        lookup,
        "DATABASE_MIN_CONNECTIONS",
        pool::DEFAULT_MIN_CONNECTIONS,
        |raw| raw.parse().ok(),
        warnings,
    );
    let acquire = read(
        lookup,
        "DATABASE_ACQUIRE_TIMEOUT_SECS",
        pool::DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
        positive,
        warnings,
    );
    let idle = read(
        lookup,
        "DATABASE_IDLE_TIMEOUT_SECS",
        pool::DEFAULT_IDLE_TIMEOUT.as_secs(),
        |raw| raw.parse().ok(),
        warnings,
    );
    let lifetime = read(
        lookup,
        "DATABASE_MAX_LIFETIME_SECS",
        pool::DEFAULT_MAX_LIFETIME.as_secs(),
        |raw| raw.parse().ok(),
        warnings,
    );

    PoolConfig::new()
        .max_connections(max)
        .min_connections(min)
        .acquire_timeout(Duration::from_secs(acquire))
        .idle_timeout(optional_secs(idle))
        .max_lifetime(optional_secs(lifetime))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_allowed_origins(raw: &str, warnings: &mut Vec<String>) -> AllowedOrigins {
    if raw.trim().is_empty() || raw.split(',').any(|s| s.trim() == "*") {
        return AllowedOrigins::Any;
    }

    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warnings.push(format!("Invalid CORS origin '{}': {}", trimmed, e));
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        AllowedOrigins::Any
    } else {
        AllowedOrigins::List(origins)
    }
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Invalid values fall back to their
    /// defaults and are recorded in `warnings`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let port = read(&lookup, "PORT", DEFAULT_PORT, |raw| raw.parse().ok(), &mut warnings);
        let pool = read_pool(&lookup, &mut warnings);
        let run_migrations = read(&lookup, "RUN_MIGRATIONS", true, parse_bool, &mut warnings);

        let environment = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw).unwrap_or_else(|| {
                warnings.push(format!("Unknown APP_ENV '{}', using production", raw));
                Environment::Production
            }),
            None => Environment::Production,
        };

        let allowed_origins = parse_allowed_origins(
            &lookup("ALLOWED_ORIGINS").unwrap_or_default(),
            &mut warnings,
        );

        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("text") | None => LogFormat::Text,
            Some(other) => {
                warnings.push(format!("Unknown LOG_FORMAT '{}', using text", other));
                LogFormat::Text
            }
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            pool,
            run_migrations,
            environment,
            allowed_origins,
            log: LogConfig {
                format,
                file: lookup("LOG_FILE")
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                ansi: lookup("LOG_ANSI").as_deref().and_then(parse_bool),
            },
            warnings,
        }
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid HOST '{}': {}", self.host, e)))
    }
}
