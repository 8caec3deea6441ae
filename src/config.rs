//! Runtime configuration, sourced from `HOSTBOOK_*` environment variables
//! with CLI overrides applied by the binary. Unparseable values fall back to
//! the defaults rather than aborting startup.

use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port (env: HOSTBOOK_HTTP_PORT, default 8000).
    pub http_port: u16,
    /// Root folder for the file store (env: HOSTBOOK_DB_FOLDER, default "dbs").
    pub db_root: String,
    /// Which store backend to run (env: HOSTBOOK_STORE, "file" or "memory").
    pub backend: StoreBackend,
    /// Bearer token lifetime in seconds (env: HOSTBOOK_SESSION_TTL_SECS).
    pub session_ttl_secs: u64,
    /// Cap on list responses (env: HOSTBOOK_LIST_LIMIT, default 100).
    pub list_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8000,
            db_root: "dbs".to_string(),
            backend: StoreBackend::File,
            session_ttl_secs: 3600,
            list_limit: 100,
        }
    }
}

fn parse_port_env(name: &str) -> Option<u16> {
    match env::var(name) {
        Ok(val) => val.parse::<u16>().ok(),
        Err(_) => None,
    }
}

fn parse_u64_env(name: &str) -> Option<u64> {
    match env::var(name) {
        Ok(val) => val.parse::<u64>().ok(),
        Err(_) => None,
    }
}

fn parse_backend_env(name: &str) -> Option<StoreBackend> {
    match env::var(name) {
        Ok(v) => match v.to_lowercase().as_str() {
            "file" => Some(StoreBackend::File),
            "memory" | "mem" => Some(StoreBackend::Memory),
            _ => None,
        },
        Err(_) => None,
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            http_port: parse_port_env("HOSTBOOK_HTTP_PORT").unwrap_or(defaults.http_port),
            db_root: env::var("HOSTBOOK_DB_FOLDER").ok().unwrap_or(defaults.db_root),
            backend: parse_backend_env("HOSTBOOK_STORE").unwrap_or(defaults.backend),
            session_ttl_secs: parse_u64_env("HOSTBOOK_SESSION_TTL_SECS")
                .unwrap_or(defaults.session_ttl_secs),
            list_limit: parse_u64_env("HOSTBOOK_LIST_LIMIT")
                .map(|v| v as usize)
                .unwrap_or(defaults.list_limit),
        }
    }
}
