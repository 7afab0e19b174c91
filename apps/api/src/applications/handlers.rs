//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::patch::ApplicationPatch;
use crate::applications::stats::ApplicationStats;
use crate::applications::status::ApplicationStatus;
use crate::applications::store;
use crate::errors::AppError;
use crate::jobs::store as jobs;
use crate::models::application::{ApplicationListRow, ApplicationRow};
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub user_id: Uuid,
    pub job_post_id: Uuid,
    pub tailored_cv_content: Option<String>,
    pub cover_letter_content: Option<String>,
}

/// POST /api/v1/applications
///
/// Always starts as a draft. 409 if the job already has an application.
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    if jobs::get(&state.db, request.user_id, request.job_post_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Job {} not found",
            request.job_post_id
        )));
    }

    let application = store::create_draft(
        &state.db,
        request.user_id,
        request.job_post_id,
        request.tailored_cv_content.as_deref(),
        request.cover_letter_content.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Conflict(format!(
            "Job {} already has an application",
            request.job_post_id
        ))
    })?;
    info!("Created draft application {}", application.id);
    Ok(Json(application))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ApplicationListRow>>, AppError> {
    Ok(Json(store::list_for_user(&state.db, params.user_id).await?))
}

/// GET /api/v1/applications/stats
pub async fn handle_application_stats(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationStats>, AppError> {
    let statuses = store::statuses_for_user(&state.db, params.user_id)
        .await?
        .iter()
        .map(|s| s.parse::<ApplicationStatus>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ApplicationStats::from_statuses(statuses)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationRow>, AppError> {
    let application = store::get(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    Ok(Json(application))
}

/// PATCH /api/v1/applications/:id
///
/// Status moves must follow the lifecycle (409 otherwise). Notes and dates are
/// independent: absent = unchanged, null = cleared.
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<ApplicationRow>, AppError> {
    let current = store::get(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    if patch.is_empty() {
        return Ok(Json(current));
    }

    let update = patch.apply_to(&current)?;
    if update.status.as_str() != current.status {
        info!(
            "Application {id}: {} -> {}{}",
            current.status,
            update.status,
            if update.status.is_terminal() { " (closed)" } else { "" }
        );
    }

    let updated = store::update(&state.db, params.user_id, id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !store::delete(&state.db, params.user_id, id).await? {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
