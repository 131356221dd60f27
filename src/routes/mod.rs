//! API Routes
//!
//! - `/api/programs/media-upload-url` - Presigned POST for program media uploads
//! - `/api/health` - Health checks

pub mod health;
pub mod media;

use axum::Router;
use crate::models::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(media::router(state))
        .merge(health::router())
        .layer(TraceLayer::new_for_http())
}
