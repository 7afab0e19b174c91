use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<Vec<String>>,
    /// JSONB arrays as entered or extracted; cleaned only when read as facts.
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub certifications: Option<Value>,
    pub cv_file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRow {
    /// The stored profile in the shape `verify_facts` reads.
    pub fn raw_facts(&self) -> Value {
        json!({
            "personalInfo": {
                "fullName": self.full_name,
                "email": self.email,
                "phone": self.phone,
                "location": self.location,
                "linkedinUrl": self.linkedin_url,
                "githubUrl": self.github_url,
                "portfolioUrl": self.portfolio_url,
            },
            "summary": self.summary,
            "skills": self.skills,
            "experience": self.experience,
            "education": self.education,
            "certifications": self.certifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::facts::verify_facts;

    fn row() -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            full_name: Some("Ada Lovelace".to_string()),
            phone: None,
            location: Some("  ".to_string()),
            linkedin_url: None,
            github_url: None,
            portfolio_url: None,
            summary: None,
            skills: Some(vec!["Rust".to_string()]),
            experience: Some(json!([{"company": "Acme", "title": "Engineer"}])),
            education: None,
            certifications: Some(json!("not an array")),
            cv_file_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_raw_facts_round_trip_through_verifier() {
        let facts = verify_facts(&row().raw_facts());
        assert_eq!(facts.personal_info.email.as_deref(), Some("ada@example.com"));
        assert_eq!(facts.personal_info.location, None);
        assert_eq!(facts.experience[0].position.as_deref(), Some("Engineer"));
        assert!(facts.certifications.is_empty());
    }
}
