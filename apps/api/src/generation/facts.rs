//! Fact Verifier: turns a loosely typed profile snapshot into `VerifiedFacts`.
//!
//! CRITICAL: every value in the output is copied (trimmed) from the input.
//! Nothing is defaulted, reformatted or synthesized; missing means absent.
//! `VerifiedFacts` can only be built here, so the document generator cannot
//! be handed unverified profile data.

use std::ops::Deref;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceFact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationFact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationFact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

/// Canonical profile snapshot. Serializes back into the same shape `verify_facts` reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFacts {
    pub personal_info: PersonalInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceFact>,
    pub education: Vec<EducationFact>,
    pub certifications: Vec<CertificationFact>,
}

/// `UserFacts` that went through `verify_facts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VerifiedFacts(UserFacts);

impl Deref for VerifiedFacts {
    type Target = UserFacts;

    fn deref(&self) -> &UserFacts {
        &self.0
    }
}

/// Sanitizes a raw profile. Total: any JSON value yields a (possibly empty) result.
pub fn verify_facts(raw: &Value) -> VerifiedFacts {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);
    let personal = root
        .get("personalInfo")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    VerifiedFacts(UserFacts {
        personal_info: PersonalInfo {
            full_name: field(personal, &["fullName", "full_name"]),
            email: field(personal, &["email"]),
            phone: field(personal, &["phone"]),
            location: field(personal, &["location"]),
            linkedin_url: field(personal, &["linkedinUrl", "linkedin_url"]),
            github_url: field(personal, &["githubUrl", "github_url"]),
            portfolio_url: field(personal, &["portfolioUrl", "portfolio_url"]),
        },
        summary: field(root, &["summary"]),
        skills: string_list(root.get("skills")),
        experience: records(root.get("experience"), experience_fact),
        education: records(root.get("education"), education_fact),
        certifications: records(root.get("certifications"), certification_fact),
    })
}

fn experience_fact(obj: &Map<String, Value>) -> ExperienceFact {
    ExperienceFact {
        company: field(obj, &["company"]),
        position: field(obj, &["position", "title"]),
        start_date: field(obj, &["startDate", "start_date"]),
        end_date: field(obj, &["endDate", "end_date"]),
        description: field(obj, &["description"]),
        achievements: match obj.get("achievements") {
            Some(Value::Array(_)) => string_list(obj.get("achievements")),
            _ => Vec::new(),
        },
    }
}

fn education_fact(obj: &Map<String, Value>) -> EducationFact {
    EducationFact {
        institution: field(obj, &["institution", "school"]),
        degree: field(obj, &["degree"]),
        field: field(obj, &["field"]),
        start_date: field(obj, &["startDate", "start_date"]),
        end_date: field(obj, &["endDate", "end_date"]),
        gpa: field(obj, &["gpa"]),
    }
}

fn certification_fact(obj: &Map<String, Value>) -> CertificationFact {
    CertificationFact {
        name: field(obj, &["name"]),
        issuer: field(obj, &["issuer"]),
        date: field(obj, &["date"]),
        expiry_date: field(obj, &["expiryDate", "expiry_date"]),
    }
}

/// Keeps object entries that still carry at least one fact after cleaning.
fn records<T, F>(value: Option<&Value>, build: F) -> Vec<T>
where
    T: Default + PartialEq,
    F: Fn(&Map<String, Value>) -> T,
{
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    let blank = T::default();
    items
        .iter()
        .filter_map(Value::as_object)
        .map(build)
        .filter(|record| *record != blank)
        .collect()
}

/// First present alias wins.
fn field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| scalar(obj.get(*k)))
}

/// Non-empty trimmed strings and non-zero numbers; everything else is absent.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Arrays keep their non-empty scalar items; a lone string is split on commas.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| scalar(Some(v))).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
