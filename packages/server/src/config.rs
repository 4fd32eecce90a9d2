use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::recognition::RecognitionConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. A single `"*"` allows any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Scratch directory for uploads awaiting recognition.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    /// HTML file served at `/`.
    pub index_page: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub recognition: RecognitionConfig,
    pub web: WebConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5001)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://instance/users.db?mode=rwc")?
            .set_default("storage.upload_dir", "images")?
            .set_default("storage.max_upload_size", 16 * 1024 * 1024)?
            .set_default("recognition.command", "deepface-find")?
            .set_default("recognition.reference_dir", "photos_db")?
            .set_default("recognition.model", "Facenet512")?
            .set_default("recognition.detector", "retinaface")?
            .set_default("recognition.distance_metric", "cosine")?
            .set_default("recognition.threshold", 0.7)?
            .set_default("recognition.anti_spoofing", true)?
            .set_default("web.index_page", "templates/index.html")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FACEID__RECOGNITION__THRESHOLD)
            .add_source(Environment::with_prefix("FACEID").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
