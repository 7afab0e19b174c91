//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_structured;
use crate::extraction::job::ExtractedJobData;
use crate::jobs::store::{self, NewJobPost};
use crate::models::job::JobPostRow;
use crate::profile::store::find_by_email;
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub job: NewJobPost,
}

#[derive(Debug, Deserialize)]
pub struct ExtractFieldsRequest {
    pub content: String,
    pub source_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractFieldsResponse {
    pub data: ExtractedJobData,
}

/// Page snapshot sent by the browser extension.
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub user_email: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html: Option<String>,
    pub text: String,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<JobPostRow>, AppError> {
    request.job.validate().map_err(AppError::Validation)?;
    let job = store::create(&state.db, request.user_id, &request.job).await?;
    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobPostRow>>, AppError> {
    Ok(Json(store::list_for_user(&state.db, params.user_id).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobPostRow>, AppError> {
    let job = store::get(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
///
/// Applications for the job are deleted with it.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !store::delete_with_applications(&state.db, params.user_id, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("Deleted job {id} and its applications");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/extract-fields
///
/// Pasted posting → structured fields for the add-job form. Nothing is persisted.
pub async fn handle_extract_fields(
    State(state): State<AppState>,
    Json(request): Json<ExtractFieldsRequest>,
) -> Result<Json<ExtractFieldsResponse>, AppError> {
    let data: ExtractedJobData =
        extract_structured(&state.gateway, &request.content, request.source_url.as_deref())
            .await?;
    Ok(Json(ExtractFieldsResponse { data }))
}

/// POST /api/v1/jobs/capture
///
/// Extension capture. The payload is only stored once extraction accepted it.
pub async fn handle_capture_job(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<JobPostRow>, AppError> {
    let owner = find_by_email(&state.db, &request.user_email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let content = capture_content(&request.title, &request.text);
    let extracted: ExtractedJobData =
        extract_structured(&state.gateway, &content, Some(&request.url)).await?;

    let mut job = NewJobPost::from(extracted);
    job.raw_html = request.html;

    let job = store::create(&state.db, owner.id, &job).await?;
    info!("Captured job {} ({} at {}) from {}", job.id, job.title, job.company, request.url);
    Ok(Json(job))
}

/// Page title first: it often carries the role and company the body omits.
fn capture_content(title: &str, text: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        text.to_string()
    } else {
        format!("{title}\n\n{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_content_prepends_title() {
        assert_eq!(capture_content("SRE - Initech", "body"), "SRE - Initech\n\nbody");
        assert_eq!(capture_content("  ", "body"), "body");
    }

    #[test]
    fn test_create_request_flattens_job_fields() {
        let request: CreateJobRequest = serde_json::from_str(
            r#"{"user_id": "6f1c1f2e-8a53-4a0b-9b7e-0f6f7c3a2d10",
                "title": "SRE", "company": "Initech", "description": "Keep it up",
                "location": "Remote"}"#,
        )
        .unwrap();
        assert_eq!(request.job.location.as_deref(), Some("Remote"));
        assert!(request.job.validate().is_ok());
    }

    #[test]
    fn test_capture_request_html_is_optional() {
        let request: CaptureRequest = serde_json::from_str(
            r#"{"user_email": "ada@example.com", "url": "https://x", "text": "posting"}"#,
        )
        .unwrap();
        assert_eq!(request.html, None);
        assert_eq!(request.title, "");
    }
}
