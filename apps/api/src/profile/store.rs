use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::ProfileRow;

/// Profile fields as submitted by onboarding. Email is the natural key.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<Value>,
    #[serde(default)]
    pub education: Option<Value>,
    #[serde(default)]
    pub certifications: Option<Value>,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err("a valid email is required".to_string());
        }
        for (name, value) in [
            ("experience", &self.experience),
            ("education", &self.education),
            ("certifications", &self.certifications),
        ] {
            if matches!(value, Some(v) if !v.is_array() && !v.is_null()) {
                return Err(format!("{name} must be an array"));
            }
        }
        Ok(())
    }
}

/// Inserts or replaces the profile identified by `input.email`.
pub async fn upsert_by_email(pool: &PgPool, input: &ProfileInput) -> sqlx::Result<ProfileRow> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (email, full_name, phone, location, linkedin_url, github_url, portfolio_url,
             summary, skills, experience, education, certifications)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (email) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            phone = EXCLUDED.phone,
            location = EXCLUDED.location,
            linkedin_url = EXCLUDED.linkedin_url,
            github_url = EXCLUDED.github_url,
            portfolio_url = EXCLUDED.portfolio_url,
            summary = EXCLUDED.summary,
            skills = EXCLUDED.skills,
            experience = EXCLUDED.experience,
            education = EXCLUDED.education,
            certifications = EXCLUDED.certifications,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(input.email.trim())
    .bind(&input.full_name)
    .bind(&input.phone)
    .bind(&input.location)
    .bind(&input.linkedin_url)
    .bind(&input.github_url)
    .bind(&input.portfolio_url)
    .bind(&input.summary)
    .bind(&input.skills)
    .bind(&input.experience)
    .bind(&input.education)
    .bind(&input.certifications)
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE email = $1 LIMIT 1")
        .bind(email.trim())
        .fetch_optional(pool)
        .await
}

pub async fn set_cv_file_url(
    pool: &PgPool,
    id: Uuid,
    cv_file_url: &str,
) -> sqlx::Result<Option<ProfileRow>> {
    sqlx::query_as::<_, ProfileRow>(
        "UPDATE profiles SET cv_file_url = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(cv_file_url)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> ProfileInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_email_is_required() {
        assert!(input(r#"{"email": "  "}"#).validate().is_err());
        assert!(input(r#"{"email": "ada@example.com"}"#).validate().is_ok());
    }

    #[test]
    fn test_sections_must_be_arrays() {
        let err = input(r#"{"email": "a@b.c", "education": {"school": "MIT"}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err, "education must be an array");
        assert!(input(r#"{"email": "a@b.c", "experience": null}"#)
            .validate()
            .is_ok());
    }
}
