//! Authenticated ingest, verified storage, and public read API for signet
//! artifacts.

mod config;
mod error;
mod handlers;
mod logging;
mod state;
mod storage;

use axum::routing::{get, post};
use axum::Router;
use config::RelayConfig;
use error::{RelayError, Result};
use state::RelayState;
use std::path::Path;
use std::sync::Arc;
use storage::Storage;
use tower_http::trace::TraceLayer;

const LOG_DIR: &str = "./logs";
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Load the configured public key, bootstrapping a fresh example keypair if
/// none exists yet so a from-scratch deployment can start without a manual
/// keygen step.
fn load_or_bootstrap_public_key(path: &Path) -> Result<signet_core::VerifyingKey> {
    if path.exists() {
        let pem = std::fs::read_to_string(path).map_err(|source| RelayError::PublicKeyLoad {
            path: path.to_path_buf(),
            source: signet_core::CoreError::Io(source),
        })?;
        return signet_core::parse_public_key_pem(&pem).map_err(|source| RelayError::PublicKeyLoad {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::warn!(
        path = %path.display(),
        "no public key found, bootstrapping an example keypair for this deployment"
    );
    let signing_key = signet_core::generate_keypair(&mut rand::rngs::OsRng);
    let verifying_key = signing_key.verifying_key();

    std::fs::write(path, signet_core::encode_public_key_pem(&verifying_key))
        .map_err(RelayError::Storage)?;
    std::fs::write("deploy-private.key", signet_core::encode_private_key_pem(&signing_key))
        .map_err(RelayError::Storage)?;

    tracing::warn!("bootstrap keypair written; move deploy-private.key to the publisher machine");
    Ok(verifying_key)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init(Path::new(LOG_DIR))?;

    let config = RelayConfig::load()?;
    tracing::info!(port = config.port, storage = %config.storage_dir.display(), "starting signet-relay");

    let public_key = load_or_bootstrap_public_key(&config.public_key_path)?;
    let storage = Storage::new(config.storage_dir.clone())?;

    let state = Arc::new(RelayState {
        storage,
        public_key,
        token: config.token,
        download_filename: "signet-artifact".to_string(),
    });

    let app = Router::new()
        .route("/upload", post(handlers::upload))
        .route("/latest", get(handlers::latest))
        .route("/download", get(handlers::download))
        .route("/health", get(handlers::health))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(RelayError::Bind)?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
