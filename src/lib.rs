// Program Media - presigned upload credentials for program content

pub mod config;
pub mod db;
pub mod media;
pub mod models;
pub mod routes;
pub mod storage;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use media::{MediaUploadUrlResolver, UploadSettings};
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
