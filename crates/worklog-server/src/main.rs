//! Worklog HTTP server.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use worklog_server::http;
use worklog_server::{AppState, Config};

/// Worklog HTTP server.
#[derive(Parser, Debug)]
#[command(name = "worklog-server", about = "Worklog HTTP server")]
struct Args {
    /// Host to bind
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1")]
    addr: String,

    /// Port to bind
    #[arg(long, env = "SERVER_PORT", default_value_t = 8080)]
    port: u16,

    /// Comma-separated origins allowed by CORS
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:4173,http://localhost:5173"
    )]
    allowed_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("worklog=info,tower_http=info")),
        )
        .with_target(true)
        .init();

    let config = Config {
        bind_addr: format!("{}:{}", args.addr, args.port),
        ..Config::default()
    }
    .with_allowed_origins(
        args.allowed_origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty()),
    );

    let addr: SocketAddr = config.bind_addr.parse()?;
    info!(
        addr = %addr,
        origins = ?config.allowed_origins,
        "Starting worklog server"
    );

    let state = AppState::with_config(config);
    let router = http::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
