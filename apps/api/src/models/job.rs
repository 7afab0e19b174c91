use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::generation::generator::JobRequirements;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub application_url: Option<String>,
    pub source_url: Option<String>,
    /// active | expired | filled
    pub status: String,
    #[serde(skip_serializing)]
    pub raw_html: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&JobPostRow> for JobRequirements {
    fn from(job: &JobPostRow) -> Self {
        JobRequirements {
            title: job.title.clone(),
            company: job.company.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            skills: Vec::new(),
            location: job.location.clone(),
        }
    }
}
