use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use common::storage::TempUploadStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::AppConfig;
use server::recognition::{CommandMatcher, Recognizer};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = server::database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    server::seed::seed_profiles(&db)
        .await
        .context("Failed to seed profiles")?;

    tokio::fs::create_dir_all(&config.recognition.reference_dir)
        .await
        .context("Failed to create reference photo directory")?;
    let uploads = TempUploadStore::new(
        config.storage.upload_dir.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to create upload directory")?;

    let recognition = &config.recognition;
    info!(
        command = %recognition.command,
        reference_dir = %recognition.reference_dir.display(),
        model = recognition.model.as_str(),
        detector = recognition.detector.as_str(),
        distance_metric = recognition.distance_metric.as_str(),
        threshold = ?recognition.threshold,
        anti_spoofing = recognition.anti_spoofing,
        "Recognition configured"
    );
    let recognizer = Recognizer::new(
        Arc::new(CommandMatcher::from_config(recognition)),
        recognition.clone(),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        uploads: Arc::new(uploads),
        recognizer: Arc::new(recognizer),
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
