use std::sync::Arc;

use common::storage::TempUploadStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::recognition::Recognizer;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub uploads: Arc<TempUploadStore>,
    pub recognizer: Arc<Recognizer>,
}
