use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;
use crate::utils::filename::validate_flat_filename;

#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    operation_id = "landingPage",
    summary = "Landing page",
    responses(
        (status = 200, description = "HTML page", content_type = "text/html", body = String),
        (status = 404, description = "Page not configured (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    match tokio::fs::read_to_string(&state.config.web.index_page).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("Landing page not found".into()))
        }
        Err(e) => Err(AppError::internal(format!("IO error: {e}"))),
    }
}

#[utoipa::path(
    get,
    path = "/photos_db/{filename}",
    tag = "Pages",
    operation_id = "referencePhoto",
    summary = "Serve a reference photo",
    params(("filename" = String, Path, description = "Reference photo file name")),
    responses(
        (status = 200, description = "Photo bytes"),
        (status = 400, description = "Invalid file name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn reference_photo(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let filename =
        validate_flat_filename(&filename).map_err(|e| AppError::Validation(e.message().into()))?;
    let path = state.config.recognition.reference_dir.join(filename);

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Photo not found".into()));
        }
        Err(e) => return Err(AppError::internal(format!("IO error: {e}"))),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|e| AppError::internal(e.to_string()))
}
