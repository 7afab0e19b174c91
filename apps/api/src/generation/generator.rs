//! Document Generator: tailored CV and cover-letter text for one job.
//!
//! Flow: detect_language ∥ extract_skills → generate_cv ∥ generate_cover_letter.
//!
//! Both documents are returned together under one language code, or not at all.
//! The CV is checked after generation: every experience company, title and date
//! must survive verbatim, otherwise it is regenerated with a correction note.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::skills::extract_skills;
use crate::generation::facts::VerifiedFacts;
use crate::generation::language::{detect_language, language_name};
use crate::generation::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, CV_CORRECTION_TEMPLATE, CV_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, NOT_PROVIDED};
use crate::llm_client::{GenerationError, GenerationGateway};

const CV_MAX_TOKENS: u32 = 2000;
const COVER_LETTER_MAX_TOKENS: u32 = 1500;
/// Extra CV attempts when a draft alters verified experience values.
const MAX_CV_RETRIES: u32 = 2;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// What the generator knows about the target job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirements {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Option<String>,
    /// Filled by skill extraction; may be empty.
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
}

/// Output of one generation run. Copied into an application by the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub cv: String,
    pub cover_letter: String,
    pub language: String,
    pub extracted_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Cv,
    CoverLetter,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Cv => f.write_str("CV"),
            DocumentKind::CoverLetter => f.write_str("cover letter"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentGenerationError {
    #[error("Failed to generate {document}: {source}")]
    Generation {
        document: DocumentKind,
        #[source]
        source: GenerationError,
    },

    #[error(
        "The generated CV kept changing verified experience details ({altered}) \
        after {attempts} attempts. Please try again."
    )]
    FactsAltered { attempts: u32, altered: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Runs the whole pipeline for one job. `job.skills` is replaced by extracted skills.
pub async fn generate_application(
    gateway: &GenerationGateway,
    facts: &VerifiedFacts,
    mut job: JobRequirements,
) -> Result<GenerationResult, DocumentGenerationError> {
    let language_sample = match &job.requirements {
        Some(requirements) => format!("{} {}", job.description, requirements),
        None => job.description.clone(),
    };

    let (language, skills) = tokio::join!(
        detect_language(gateway, &language_sample),
        extract_skills(gateway, &job.description, job.requirements.as_deref()),
    );
    job.skills = skills;

    let (cv, cover_letter) = tokio::try_join!(
        generate_cv(gateway, facts, &job, &language),
        generate_cover_letter(gateway, facts, &job, &language),
    )?;

    info!(
        "Generated CV ({} chars) and cover letter ({} chars) in '{}' for {} at {}",
        cv.len(),
        cover_letter.len(),
        language,
        job.title,
        job.company
    );

    Ok(GenerationResult {
        cv,
        cover_letter,
        language,
        extracted_skills: job.skills,
    })
}

/// Tailored CV text. Retries up to MAX_CV_RETRIES times if experience facts are altered.
pub async fn generate_cv(
    gateway: &GenerationGateway,
    facts: &VerifiedFacts,
    job: &JobRequirements,
    language: &str,
) -> Result<String, DocumentGenerationError> {
    let base_prompt = fill_template(CV_PROMPT_TEMPLATE, facts, job, language);
    let mut prompt = base_prompt.clone();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let cv = gateway
            .generate(&prompt, CV_MAX_TOKENS)
            .await
            .map_err(|source| DocumentGenerationError::Generation {
                document: DocumentKind::Cv,
                source,
            })?;

        let altered = altered_experience_values(&cv, facts);
        if altered.is_empty() {
            return Ok(cv);
        }
        if attempts > MAX_CV_RETRIES {
            return Err(DocumentGenerationError::FactsAltered {
                attempts,
                altered: altered.join(", "),
            });
        }

        warn!(
            "CV attempt {}/{} altered verified experience values {:?}, retrying",
            attempts,
            MAX_CV_RETRIES + 1,
            altered
        );
        let listing = altered
            .iter()
            .map(|v| format!("- {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        prompt = format!(
            "{base_prompt}{}",
            CV_CORRECTION_TEMPLATE.replace("{altered}", &listing)
        );
    }
}

/// Tailored cover-letter text.
pub async fn generate_cover_letter(
    gateway: &GenerationGateway,
    facts: &VerifiedFacts,
    job: &JobRequirements,
    language: &str,
) -> Result<String, DocumentGenerationError> {
    let prompt = fill_template(COVER_LETTER_PROMPT_TEMPLATE, facts, job, language);
    gateway
        .generate(&prompt, COVER_LETTER_MAX_TOKENS)
        .await
        .map_err(|source| DocumentGenerationError::Generation {
            document: DocumentKind::CoverLetter,
            source,
        })
}

/// Experience company/title/date values missing from `cv`, first occurrence order.
///
/// Dates without a digit ("Present", "Current") are ongoing markers the CV may
/// translate, so only calendar dates are held verbatim.
fn altered_experience_values<'a>(cv: &str, facts: &'a VerifiedFacts) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for value in facts.experience.iter().flat_map(|e| {
        let dates = [&e.start_date, &e.end_date]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .filter(|d| is_calendar_date(d));
        [&e.company, &e.position]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .chain(dates)
    }) {
        if !cv.contains(value) && !missing.contains(&value) {
            missing.push(value);
        }
    }
    missing
}

fn is_calendar_date(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

fn fill_template(
    template: &str,
    facts: &VerifiedFacts,
    job: &JobRequirements,
    language: &str,
) -> String {
    template
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{language_name}", &language_name(language))
        .replace("{language_code}", &language.to_uppercase())
        .replace("{facts}", &facts_block(facts))
        .replace("{job}", &job_block(job))
}

fn or_missing(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_PROVIDED)
}

fn json_section<T: Serialize>(items: &[T]) -> String {
    if items.is_empty() {
        return NOT_PROVIDED.to_string();
    }
    serde_json::to_string_pretty(items).unwrap_or_else(|_| NOT_PROVIDED.to_string())
}

fn facts_block(facts: &VerifiedFacts) -> String {
    let p = &facts.personal_info;
    let skills = if facts.skills.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        facts.skills.join(", ")
    };

    format!(
        "Name: {}\nEmail: {}\nPhone: {}\nLocation: {}\nLinkedIn: {}\nGitHub: {}\nPortfolio: {}\n\n\
        Professional Summary: {}\n\n\
        Skills: {}\n\n\
        Experience: {}\n\n\
        Education: {}\n\n\
        Certifications: {}",
        or_missing(p.full_name.as_deref()),
        or_missing(p.email.as_deref()),
        or_missing(p.phone.as_deref()),
        or_missing(p.location.as_deref()),
        or_missing(p.linkedin_url.as_deref()),
        or_missing(p.github_url.as_deref()),
        or_missing(p.portfolio_url.as_deref()),
        or_missing(facts.summary.as_deref()),
        skills,
        json_section(&facts.experience),
        json_section(&facts.education),
        json_section(&facts.certifications),
    )
}

fn job_block(job: &JobRequirements) -> String {
    let skills = if job.skills.is_empty() {
        "Not specified".to_string()
    } else {
        job.skills.join(", ")
    };

    format!(
        "Position: {}\nCompany: {}\nLocation: {}\nRequired Skills: {}\n\n\
        Job Description: {}\nRequirements: {}",
        job.title,
        job.company,
        job.location.as_deref().unwrap_or("Not specified"),
        skills,
        job.description,
        job.requirements.as_deref().unwrap_or("Not specified"),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
