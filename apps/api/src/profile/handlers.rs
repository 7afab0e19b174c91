//! Axum route handlers for the Profile API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::cv::ExtractedCVData;
use crate::extraction::extract_structured;
use crate::generation::facts::VerifiedFacts;
use crate::models::profile::ProfileRow;
use crate::profile::store::{self, ProfileInput};
use crate::profile::upload::{delete_cv, extract_pdf_text, is_pdf, store_cv, MAX_CV_BYTES};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CvExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CvExtractResponse {
    pub data: VerifiedFacts,
}

#[derive(Debug, Serialize)]
pub struct CvUploadResponse {
    pub profile: ProfileRow,
    pub text: String,
    /// Present when the upload asked for `extract=true`.
    pub extracted: Option<VerifiedFacts>,
}

/// POST /api/v1/profile
///
/// Creates the profile, or replaces every field of the one with the same email.
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> Result<Json<ProfileRow>, AppError> {
    input.validate().map_err(AppError::Validation)?;
    let profile = store::upsert_by_email(&state.db, &input).await?;
    info!("Saved profile {} ({})", profile.id, profile.email);
    Ok(Json(profile))
}

/// GET /api/v1/profile/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = store::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;
    Ok(Json(profile))
}

/// POST /api/v1/profile/cv/extract
///
/// CV text → verified profile facts. Nothing is persisted; the client reviews first.
pub async fn handle_extract_cv(
    State(state): State<AppState>,
    Json(request): Json<CvExtractRequest>,
) -> Result<Json<CvExtractResponse>, AppError> {
    let extracted: ExtractedCVData =
        extract_structured(&state.gateway, &request.text, None).await?;
    Ok(Json(CvExtractResponse {
        data: extracted.verified(),
    }))
}

/// POST /api/v1/profile/:id/cv
///
/// Multipart fields: `cv` (PDF file, required), `extract` ("true" to also run CV extraction).
/// Extraction runs before anything is stored, so a failed request leaves the profile as it was.
/// The previously stored file is removed once the profile points at the new one.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<CvUploadResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    let mut extract = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                if !is_pdf(content_type.as_deref(), file_name.as_deref()) {
                    return Err(AppError::Validation("Only PDF CVs are supported".to_string()));
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                if data.len() > MAX_CV_BYTES {
                    return Err(AppError::Validation(format!(
                        "CV is too large (max {} MB)",
                        MAX_CV_BYTES / (1024 * 1024)
                    )));
                }
                file = Some(data);
            }
            "extract" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read field: {e}")))?;
                extract = value.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let data = file.ok_or_else(|| AppError::Validation("A 'cv' file is required".to_string()))?;

    let text = extract_pdf_text(data.clone()).await?;
    let extracted = if extract {
        let data: ExtractedCVData = extract_structured(&state.gateway, &text, None).await?;
        Some(data.verified())
    } else {
        None
    };

    let previous = store::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?
        .cv_file_url;

    let bucket = &state.config.s3_bucket;
    let key = store_cv(&state.s3, bucket, id, data).await?;
    let profile = match store::set_cv_file_url(&state.db, id, &key).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            delete_cv(&state.s3, bucket, &key).await;
            return Err(AppError::NotFound(format!("Profile {id} not found")));
        }
        Err(e) => {
            delete_cv(&state.s3, bucket, &key).await;
            return Err(e.into());
        }
    };

    if let Some(old_key) = previous.filter(|old| *old != key) {
        delete_cv(&state.s3, bucket, &old_key).await;
    }

    Ok(Json(CvUploadResponse {
        profile,
        text,
        extracted,
    }))
}
