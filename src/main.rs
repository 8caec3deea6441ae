use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use hostbook::config::{Config, StoreBackend};

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_arg_value(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!(
            "hostbook server\n\nUSAGE:\n  hostbook [--http-port N] [--db-folder PATH] [--store file|memory]\n\nOPTIONS:\n  --http-port N       HTTP API port (env: HOSTBOOK_HTTP_PORT, default 8000)\n  --db-folder PATH    File store root folder (env: HOSTBOOK_DB_FOLDER, default dbs)\n  --store BACKEND     Store backend, file or memory (env: HOSTBOOK_STORE, default file)\n\nENVIRONMENT:\n  HOSTBOOK_SESSION_TTL_SECS   Bearer token lifetime (default 3600)\n  HOSTBOOK_LIST_LIMIT         Cap on list responses (default 100)\n"
        );
        return Ok(());
    }

    // CLI arguments override environment
    let mut cfg = Config::from_env();
    if let Some(p) = parse_arg_value(&args, "--http-port").and_then(|v| v.parse::<u16>().ok()) {
        cfg.http_port = p;
    }
    if let Some(root) = parse_arg_value(&args, "--db-folder") {
        cfg.db_root = root;
    }
    if let Some(backend) = parse_arg_value(&args, "--store") {
        match backend.to_lowercase().as_str() {
            "file" => cfg.backend = StoreBackend::File,
            "memory" | "mem" => cfg.backend = StoreBackend::Memory,
            other => tracing::warn!("unknown --store value '{}', keeping {:?}", other, cfg.backend),
        }
    }

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "hostbook",
        "hostbook starting: RUST_LOG='{}', http_port={}, store={:?}, db_root='{}'",
        rust_log, cfg.http_port, cfg.backend, cfg.db_root
    );

    hostbook::server::run_with_config(cfg).await
}
