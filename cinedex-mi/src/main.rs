//! cinedex-mi - Movie Ingest service
//!
//! Looks up movie metadata from OMDb, classifies it, and writes the shared
//! cinedex database. Serves the ingest API and a minimal HTML entry page on
//! port 5731.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use cinedex_mi::services::OmdbClient;
use cinedex_mi::AppState;

#[derive(Debug, Parser)]
#[command(name = "cinedex-mi", about = "cinedex movie ingest service")]
struct Args {
    /// Root folder holding the shared database
    #[arg(long, short = 'r')]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml_config = cinedex_common::config::load_toml_config("cinedex-mi")?;

    // Initialize tracing; RUST_LOG overrides the TOML log level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting cinedex-mi (Movie Ingest) v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Resolve root folder and open the shared database
    let root_folder =
        cinedex_common::config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = cinedex_common::config::ensure_root_folder(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db_pool = cinedex_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    // Resolve the OMDb API key; the service still starts without one so the
    // key can be configured through the settings endpoint
    let omdb = match cinedex_mi::config::resolve_omdb_api_key(&db_pool, &toml_config).await {
        Ok((key, source)) => {
            if source != "database" {
                let toml_path = cinedex_common::config::toml_config_path("cinedex-mi");
                cinedex_mi::config::migrate_key_to_database(
                    key.clone(),
                    source,
                    &db_pool,
                    &toml_path,
                )
                .await?;
            }
            Some(OmdbClient::new(key).map_err(|e| anyhow::anyhow!("OMDb client: {}", e))?)
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    // Create application state and router
    let state = AppState::new(db_pool, omdb);
    let app = cinedex_mi::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:5731").await?;
    info!("Listening on http://127.0.0.1:5731");
    info!("Health check: http://127.0.0.1:5731/health");

    axum::serve(listener, app).await?;

    Ok(())
}
