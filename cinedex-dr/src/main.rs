//! cinedex-dr (Database Review) - Read-only database inspection service
//!
//! Provides a web UI and JSON API for inspecting cinedex.db contents with
//! validated filters, aggregate statistics, and export. Listens on port
//! 5732; connections are strictly read-only.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use cinedex_dr::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "cinedex-dr", about = "cinedex database review service")]
struct Args {
    /// Root folder holding the shared database
    #[arg(long, short = 'r')]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = cinedex_common::config::load_toml_config("cinedex-dr")?;

    // Initialize tracing subscriber; RUST_LOG overrides the TOML log level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting cinedex-dr (Database Review) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder =
        cinedex_common::config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = root_folder.join(cinedex_common::config::DATABASE_FILE_NAME);
    info!("Database path: {}", db_path.display());

    // Connect with read-only mode
    let pool = match cinedex_dr::db::connect_readonly(&db_path).await {
        Ok(pool) => {
            info!("Connected to database (read-only)");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    // Create application state and router
    let state = AppState::new(pool);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:5732").await?;
    info!("cinedex-dr listening on http://127.0.0.1:5732");
    info!("Health check: http://127.0.0.1:5732/health");

    axum::serve(listener, app).await?;

    Ok(())
}
