//! Runtime settings from environment variables.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_LOG_FILTER: &str = "client_records=info,client_records_server=info,tower_http=info";

/// Backing store for client records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Process-local and lost on exit. Only selected explicitly.
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreKind,
    /// PostgreSQL connection string. Required for `StoreKind::Postgres`.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub max_page_size: u32,
    /// Create the database and the `clients` table when missing.
    pub auto_create_schema: bool,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Settings {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr = parse_or(get("BIND_ADDR"), "BIND_ADDR", DEFAULT_BIND_ADDR.parse().ok())?;
        let db_max_connections: u32 = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", Some(DEFAULT_DB_MAX_CONNECTIONS))?;
        let max_page_size: u32 = parse_or(get("MAX_PAGE_SIZE"), "MAX_PAGE_SIZE", Some(DEFAULT_MAX_PAGE_SIZE))?;
        if db_max_connections == 0 {
            return Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value: "0".into() });
        }
        if max_page_size == 0 {
            return Err(ConfigError::Invalid { key: "MAX_PAGE_SIZE", value: "0".into() });
        }
        let store = match get("CLIENT_STORE") {
            None => StoreKind::Postgres,
            Some(v) => parse_store(&v).ok_or(ConfigError::Invalid { key: "CLIENT_STORE", value: v })?,
        };
        let database_url = get("DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing { key: "DATABASE_URL" });
        }
        let auto_create_schema = match get("AUTO_CREATE_SCHEMA") {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid { key: "AUTO_CREATE_SCHEMA", value: v })?,
        };

        Ok(Settings {
            store,
            database_url,
            bind_addr,
            db_max_connections,
            max_page_size,
            auto_create_schema,
            log_filter: get("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: Option<T>) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => default.ok_or(ConfigError::Invalid { key, value: String::new() }),
    }
}

fn parse_store(v: &str) -> Option<StoreKind> {
    match v.to_lowercase().as_str() {
        "postgres" | "postgresql" => Some(StoreKind::Postgres),
        "memory" => Some(StoreKind::Memory),
        _ => None,
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
