use axum::Json;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use chrono::Local;
use common::storage::image_extension;
use tracing::{info, instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::identity::{self, ResolveError};
use crate::models::identify::{IdentifyResponse, UserProfileResponse};
use crate::recognition::MatchResult;
use crate::state::AppState;

pub const MSG_NO_FILE: &str = "Файл не загружен";
pub const MSG_UNSUPPORTED_FORMAT: &str = "Неподдерживаемый формат файла";
pub const MSG_USER_NOT_FOUND: &str = "Пользователь не найден";
pub const MSG_INVALID_ID: &str = "Неверный формат ID";
pub const MSG_PROFILE_NOT_FOUND: &str = "Данные пользователя не найдены";

/// Multipart framing on top of the largest accepted photo.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn identify_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_size as usize + MULTIPART_OVERHEAD)
}

/// The `photo` part of an identification request.
struct PhotoUpload {
    filename: String,
    extension: String,
    data: Bytes,
}

/// Pull the `photo` field out of the form, validating its filename first.
async fn read_photo(multipart: &mut Multipart) -> Result<PhotoUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("photo") {
            continue; // Ignore unknown fields.
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation(MSG_NO_FILE.into()));
        }

        let extension = image_extension(&filename)
            .ok_or_else(|| AppError::Validation(MSG_UNSUPPORTED_FORMAT.into()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;

        return Ok(PhotoUpload {
            filename,
            extension,
            data,
        });
    }

    Err(AppError::Validation(MSG_NO_FILE.into()))
}

#[utoipa::path(
    post,
    path = "/identify",
    tag = "Identification",
    operation_id = "identify",
    summary = "Identify a person by photo",
    description = "Matches the uploaded face against the reference photo directory and returns \
        the profile of the closest match. The `photo` multipart field is required and must be \
        a PNG or JPEG file.",
    request_body(content_type = "multipart/form-data", description = "Photo in the `photo` field"),
    responses(
        (status = 200, description = "Person identified", body = IdentifyResponse),
        (status = 400, description = "Missing file, unsupported format or malformed reference ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Spoof detected (SPOOF_DETECTED)", body = ErrorBody),
        (status = 404, description = "No match or no profile for the match (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Upload could not be stored (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn identify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IdentifyResponse>, AppError> {
    let photo = read_photo(&mut multipart).await?;
    info!(filename = %photo.filename, size = photo.data.len(), "Photo received");

    let upload = state.uploads.store(&photo.data, &photo.extension).await?;
    let result = state.recognizer.identify(upload.path()).await;
    upload.release().await;

    let reference = match result {
        MatchResult::Matched { reference } => reference,
        MatchResult::SpoofRejected { message } => return Err(AppError::SpoofDetected(message)),
        MatchResult::NoMatch | MatchResult::Failed { .. } => {
            return Err(AppError::NotFound(MSG_USER_NOT_FOUND.into()));
        }
    };

    let profile = identity::resolve(&state.db, &reference)
        .await
        .map_err(|e| match e {
            ResolveError::Invalid { .. } => AppError::Validation(MSG_INVALID_ID.into()),
            ResolveError::NotFound(id) => {
                warn!(id, reference = %reference, "Matched reference has no profile");
                AppError::NotFound(MSG_PROFILE_NOT_FOUND.into())
            }
            ResolveError::Db(e) => e.into(),
        })?;

    info!(id = profile.id, "Person identified");

    Ok(Json(IdentifyResponse::success(
        UserProfileResponse::from_model(profile, Local::now()),
    )))
}
