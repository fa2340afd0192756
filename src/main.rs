use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use kinetra::api::server::start_api_server;
use kinetra::config::{self, ModelConfig};
use kinetra::db::sqlite::{count_tables, open_database};
use kinetra::state::AppState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Kinetra starting v{}", config::APP_VERSION);

    if let Err(e) = run() {
        tracing::error!("Fatal: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::db_path_from_env();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Migrate before accepting requests.
    let conn = open_database(&db_path)?;
    let tables = count_tables(&conn)?;
    tracing::info!(path = %db_path.display(), tables, "Database ready");
    drop(conn);

    let model_config = ModelConfig::from_env();
    if model_config.is_configured() {
        tracing::info!(model = %model_config.model, "Model endpoint configured");
    } else {
        tracing::warn!("No model credential set, programs will use the static fallback");
    }

    // The blocking HTTP client inside the generator must be built outside
    // the async runtime.
    let state = Arc::new(AppState::new(db_path, &model_config));

    if let Ok(owner) = std::env::var("KINETRA_DEV_OWNER") {
        match Uuid::parse_str(&owner) {
            Ok(owner_id) => {
                let token = state.issue_session(owner_id);
                tracing::info!(owner_id = %owner_id, token = %token, "Issued development session token");
            }
            Err(_) => {
                tracing::warn!("KINETRA_DEV_OWNER is not a valid UUID, skipping dev session");
            }
        }
    }

    let bind_addr =
        std::env::var("KINETRA_BIND").unwrap_or_else(|_| config::DEFAULT_BIND_ADDR.to_string());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let server = start_api_server(state, &bind_addr).await?;
        tracing::info!(addr = %server.addr, "Kinetra ready");

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }
        tracing::info!("Shutting down");
        server.shutdown_and_wait().await;
        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
