use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{cors_layer, router, AppState};
use hub_core::config::{content_dir_from_env_value, upload_dir_from_env_value};
use hub_core::{ContentService, CoreConfig};

/// Main entry point for the Learning Hub server
///
/// Serves the REST API, the OpenAPI document and raw content files from one listener.
///
/// # Environment Variables
/// - `HUB_REST_ADDR`: server address (default: "0.0.0.0:3001")
/// - `CONTENT_DIR`: content root, must exist (default: "./content")
/// - `UPLOAD_TMP_DIR`: scratch directory for uploads (default: system temp dir)
/// - `ADMIN_API_KEY`: admin key for mutations; unset refuses every mutation
/// - `HUB_CORS_ORIGIN`: single allowed CORS origin (default: permissive)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the content directory or scratch directory is unusable,
/// - the server address cannot be parsed or bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("learning_hub_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("hub_core=info".parse()?)
                .add_directive("hub_files=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("HUB_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3001".into())
        .parse()
        .context("HUB_REST_ADDR is not a socket address")?;

    let content_dir = content_dir_from_env_value(std::env::var("CONTENT_DIR").ok());
    let upload_dir = upload_dir_from_env_value(std::env::var("UPLOAD_TMP_DIR").ok());
    let cfg = CoreConfig::new(content_dir, upload_dir).context("invalid content configuration")?;

    let admin_api_key = std::env::var("ADMIN_API_KEY").ok();
    if admin_api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        tracing::warn!("ADMIN_API_KEY is not set, content changes are disabled");
    }
    let cors = cors_layer(std::env::var("HUB_CORS_ORIGIN").ok().as_deref())
        .context("HUB_CORS_ORIGIN is not a valid origin")?;

    tracing::info!(
        content_root = %cfg.content_root().display(),
        scratch = %cfg.upload_scratch_dir().display(),
        "++ Starting Learning Hub on {}",
        addr
    );

    let state = AppState::new(ContentService::new(Arc::new(cfg)), admin_api_key);
    let app = router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
