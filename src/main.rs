//! Vitals entry point.
//!
//! `vitals serve` (the default) initializes tracing, loads configuration from
//! TOML and the environment, builds the database pool, sets up the Axum router
//! and runs the HTTP server. `vitals probe` polls a running instance instead.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitals::client::{HealthStatus, StatusClient};
use vitals::config::{
    AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER, DEFAULT_PROBE_URL,
};
use vitals::db::create_pool;
use vitals::http::start_server;
use vitals::{create_router, AppState};

/// Vitals: liveness and database readiness probes over HTTP
#[derive(Parser, Debug)]
#[command(name = "vitals", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "vitals=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Poll a running backend and exit non-zero unless it reports "ok"
    Probe {
        /// Backend base URL
        #[arg(long, default_value = DEFAULT_PROBE_URL)]
        url: String,

        /// Delay between checks in milliseconds
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,

        /// Number of checks to perform
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format is known
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    if !Path::new(&args.config).exists() {
        tracing::info!(path = %args.config, "Config file not found, using defaults");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Probe {
            url,
            interval_ms,
            count,
        } => {
            let client = StatusClient::new(url)?;
            let status = client
                .poll(Duration::from_millis(interval_ms), count.max(1))
                .await;
            println!("Backend status: {}", status);
            if status == HealthStatus::Ok {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        user = %config.database.user,
        max_connections = config.database.max_connections,
        check_timeout_seconds = config.database.check_timeout_seconds,
        "Database configured"
    );

    let pool = create_pool(&config.database);
    let http_config = config.http.clone();

    let state = AppState::new(config, Arc::new(pool));
    let app = create_router(state);

    start_server(app, &http_config).await?;

    Ok(())
}
