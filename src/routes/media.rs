use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use crate::models::AppState;
use crate::types::{GetProgramMediaInput, MediaUploadError, MediaUploadUrl};
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/programs/media-upload-url", post(get_media_upload_url))
        .with_state(state)
}

async fn get_media_upload_url(
    State(state): State<AppState>,
    payload: Result<Json<GetProgramMediaInput>, JsonRejection>,
) -> Response {
    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected media upload url request");
            let body = serde_json::json!({ "error": rejection.body_text() });
            return (rejection.status(), Json(body)).into_response();
        }
    };

    info!(
        section_id = %input.section_id,
        content_type = %input.content_type,
        "Media upload url requested"
    );

    match state.media.get_media_upload_url(&input).await {
        Ok(upload) => Json::<MediaUploadUrl>(upload).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for MediaUploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            MediaUploadError::UnsupportedContentType(_) => StatusCode::BAD_REQUEST,
            MediaUploadError::Credential(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
