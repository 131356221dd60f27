use std::sync::Arc;

use crate::config::Config;
use crate::media::MediaUploadUrlResolver;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media: Arc<MediaUploadUrlResolver>,
}

// Content hierarchy: section -> module -> program.
// These rows are owned by the content service; this crate only reads them.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Program {
    pub id: uuid::Uuid,
    pub title: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct ProgramModule {
    pub id: uuid::Uuid,
    pub program_id: uuid::Uuid,
    pub title: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct ProgramModuleSection {
    pub id: uuid::Uuid,
    pub program_module_id: uuid::Uuid,
    pub title: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
