//! Axum route handler for application generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::applications::store as applications;
use crate::errors::AppError;
use crate::generation::facts::{verify_facts, VerifiedFacts};
use crate::generation::generator::{generate_application, GenerationResult, JobRequirements};
use crate::jobs::store as jobs;
use crate::models::application::ApplicationRow;
use crate::profile::store as profiles;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateApplicationRequest {
    pub user_id: Uuid,
    pub job_id: Uuid,
}

/// What the generator had to work with, so the UI can flag thin profiles.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserDataSummary {
    pub has_experience: bool,
    pub has_education: bool,
    pub has_certifications: bool,
    pub skills_count: usize,
}

impl From<&VerifiedFacts> for UserDataSummary {
    fn from(facts: &VerifiedFacts) -> Self {
        UserDataSummary {
            has_experience: !facts.experience.is_empty(),
            has_education: !facts.education.is_empty(),
            has_certifications: !facts.certifications.is_empty(),
            skills_count: facts.skills.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateApplicationResponse {
    #[serde(flatten)]
    pub result: GenerationResult,
    pub application: ApplicationRow,
    pub user_data_summary: UserDataSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications/generate
///
/// Profile + job → tailored CV and cover letter, saved on the job's draft application.
pub async fn handle_generate_application(
    State(state): State<AppState>,
    Json(request): Json<GenerateApplicationRequest>,
) -> Result<Json<GenerateApplicationResponse>, AppError> {
    let job = jobs::get(&state.db, request.user_id, request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", request.job_id)))?;
    let profile = profiles::get(&state.db, request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", request.user_id)))?;

    let facts = verify_facts(&profile.raw_facts());
    let user_data_summary = UserDataSummary::from(&facts);

    let result = generate_application(&state.gateway, &facts, JobRequirements::from(&job)).await?;
    let application = record_generation(&state.db, request.user_id, job.id, &result).await?;

    Ok(Json(GenerateApplicationResponse {
        result,
        application,
        user_data_summary,
    }))
}

/// Where freshly generated documents go, given the job's current application.
#[derive(Debug, PartialEq, Eq)]
enum GenerationWrite {
    CreateDraft,
    RefreshDraft(Uuid),
    /// Past draft: what was sent stays as it was.
    Keep,
}

fn generation_write(existing: Option<&ApplicationRow>) -> GenerationWrite {
    match existing {
        None => GenerationWrite::CreateDraft,
        Some(app) if app.status == ApplicationStatus::Draft.as_str() => {
            GenerationWrite::RefreshDraft(app.id)
        }
        Some(_) => GenerationWrite::Keep,
    }
}

async fn record_generation(
    pool: &PgPool,
    user_id: Uuid,
    job_id: Uuid,
    result: &GenerationResult,
) -> Result<ApplicationRow, AppError> {
    let existing = applications::find_for_job(pool, user_id, job_id).await?;
    if generation_write(existing.as_ref()) == GenerationWrite::CreateDraft {
        let created = applications::create_draft(
            pool,
            user_id,
            job_id,
            Some(&result.cv),
            Some(&result.cover_letter),
        )
        .await?;
        if let Some(created) = created {
            info!("Created draft application {} for job {job_id}", created.id);
            return Ok(created);
        }
    }

    // Re-read: a concurrent request may have created the row since the first lookup.
    let existing = match existing {
        Some(existing) => existing,
        None => applications::find_for_job(pool, user_id, job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?,
    };

    match generation_write(Some(&existing)) {
        GenerationWrite::RefreshDraft(id) => {
            let refreshed =
                applications::refresh_draft_content(pool, id, &result.cv, &result.cover_letter)
                    .await?;
            Ok(refreshed.unwrap_or(existing))
        }
        _ => {
            info!(
                "Application {} is {}; generated documents were not saved",
                existing.id, existing.status
            );
            Ok(existing)
        }
    }
}
