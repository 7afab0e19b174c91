//! Application persistence. Every query is scoped by owner.

use sqlx::PgPool;
use uuid::Uuid;

use crate::applications::patch::ApplicationUpdate;
use crate::applications::status::ApplicationStatus;
use crate::models::application::{ApplicationListRow, ApplicationRow};

/// `None` if (owner, job) already has an application.
pub async fn create_draft(
    pool: &PgPool,
    user_id: Uuid,
    job_post_id: Uuid,
    tailored_cv_content: Option<&str>,
    cover_letter_content: Option<&str>,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (user_id, job_post_id, status, tailored_cv_content, cover_letter_content, application_date)
        VALUES ($1, $2, $3, $4, $5, NOW())
        ON CONFLICT (user_id, job_post_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(job_post_id)
    .bind(ApplicationStatus::Draft.as_str())
    .bind(tailored_cv_content)
    .bind(cover_letter_content)
    .fetch_optional(pool)
    .await
}

/// Newest first, joined with the job each application targets.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<ApplicationListRow>> {
    sqlx::query_as::<_, ApplicationListRow>(
        r#"
        SELECT a.*, j.title AS job_title, j.company AS job_company, j.location AS job_location
        FROM applications a
        JOIN job_posts j ON a.job_post_id = j.id
        WHERE a.user_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// The application for (owner, job), if any. At most one exists.
pub async fn find_for_job(
    pool: &PgPool,
    user_id: Uuid,
    job_post_id: Uuid,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 AND job_post_id = $2",
    )
    .bind(user_id)
    .bind(job_post_id)
    .fetch_optional(pool)
    .await
}

/// Writes a checked patch. `None` if the row vanished in between.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    update: &ApplicationUpdate,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET status = $3, notes = $4, interview_date = $5, follow_up_date = $6, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(update.status.as_str())
    .bind(update.notes.as_deref())
    .bind(update.interview_date)
    .bind(update.follow_up_date)
    .fetch_optional(pool)
    .await
}

/// Replaces generated content, but only while the application is still a draft.
pub async fn refresh_draft_content(
    pool: &PgPool,
    id: Uuid,
    tailored_cv_content: &str,
    cover_letter_content: &str,
) -> sqlx::Result<Option<ApplicationRow>> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications
        SET tailored_cv_content = $2, cover_letter_content = $3, updated_at = NOW()
        WHERE id = $1 AND status = $4
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(tailored_cv_content)
    .bind(cover_letter_content)
    .bind(ApplicationStatus::Draft.as_str())
    .fetch_optional(pool)
    .await
}

/// `true` if a row was deleted.
pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn statuses_for_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT status FROM applications WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
}
