use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use clientbook_web::config::WebConfig;
use clientbook_web::state::AppState;

#[derive(Parser)]
#[command(name = "clientbook", about = "Customer registration web app")]
struct Cli {
    /// Path to config file (default: ~/.config/clientbook/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override the SQLite database path
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = WebConfig::load(cli.config.as_ref())?;
    if let Some(port) = cli.port {
        config.http_port = port;
    }
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    info!(db = %config.db_path.display(), port = config.http_port, "loaded config");

    let state = AppState::open(&config.db_path)?;
    let app = clientbook_web::build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.http_port));
    info!("clientbook listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
