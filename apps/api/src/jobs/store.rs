//! Job post persistence, scoped by owner.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::extraction::job::ExtractedJobData;
use crate::models::job::JobPostRow;

pub const STATUS_ACTIVE: &str = "active";

/// Columns supplied when a job post is created.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewJobPost {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_range: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub application_url: Option<String>,
    pub source_url: Option<String>,
    #[serde(skip)]
    pub raw_html: Option<String>,
}

impl NewJobPost {
    pub fn validate(&self) -> Result<(), String> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("{} cannot be empty", missing.join(", ")))
        }
    }
}

impl From<ExtractedJobData> for NewJobPost {
    fn from(job: ExtractedJobData) -> Self {
        NewJobPost {
            title: job.title.unwrap_or_default(),
            company: job.company.unwrap_or_default(),
            description: job.description.unwrap_or_default(),
            location: job.location,
            job_type: job.job_type,
            salary_range: job.salary_range,
            requirements: job.requirements,
            benefits: job.benefits,
            application_url: job.application_url,
            source_url: job.source_url,
            raw_html: None,
        }
    }
}

pub async fn create(pool: &PgPool, user_id: Uuid, job: &NewJobPost) -> sqlx::Result<JobPostRow> {
    sqlx::query_as::<_, JobPostRow>(
        r#"
        INSERT INTO job_posts
            (user_id, title, company, location, job_type, salary_range, description,
             requirements, benefits, application_url, source_url, raw_html, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(job.title.trim())
    .bind(job.company.trim())
    .bind(&job.location)
    .bind(&job.job_type)
    .bind(&job.salary_range)
    .bind(job.description.trim())
    .bind(&job.requirements)
    .bind(&job.benefits)
    .bind(&job.application_url)
    .bind(&job.source_url)
    .bind(&job.raw_html)
    .bind(STATUS_ACTIVE)
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<JobPostRow>> {
    sqlx::query_as::<_, JobPostRow>(
        "SELECT * FROM job_posts WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get(pool: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<JobPostRow>> {
    sqlx::query_as::<_, JobPostRow>("SELECT * FROM job_posts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Deletes the job and its applications in one transaction. `false` if no such job.
pub async fn delete_with_applications(pool: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM applications WHERE job_post_id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM job_posts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_required_fields_are_listed() {
        let job = NewJobPost {
            title: "SRE".to_string(),
            company: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(job.validate().unwrap_err(), "company, description cannot be empty");
    }

    #[test]
    fn test_from_extracted_keeps_optional_fields() {
        let extracted = ExtractedJobData {
            title: Some("SRE".to_string()),
            company: Some("Initech".to_string()),
            description: Some("Keep it up".to_string()),
            salary_range: Some("€70k".to_string()),
            ..Default::default()
        };
        let job = NewJobPost::from(extracted);
        assert!(job.validate().is_ok());
        assert_eq!(job.salary_range.as_deref(), Some("€70k"));
        assert_eq!(job.raw_html, None);
    }
}
