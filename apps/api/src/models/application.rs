use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_post_id: Uuid,
    /// Parsed with `ApplicationStatus::from_str` before any transition.
    pub status: String,
    pub tailored_cv_content: Option<String>,
    pub cover_letter_content: Option<String>,
    pub application_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with the job it targets, for list views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationListRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job_title: String,
    pub job_company: String,
    pub job_location: Option<String>,
}
