use serde::{Deserialize, Serialize};

use crate::extraction::prompts::JOB_EXTRACTION_PROMPT_TEMPLATE;
use crate::extraction::structured::{lenient_string, ExtractionSchema};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Postings longer than this are cut before prompting.
const MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub requirements: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub benefits: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary_range: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub application_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source_url: Option<String>,
}

impl ExtractionSchema for ExtractedJobData {
    const KIND: &'static str = "job posting";
    const MAX_TOKENS: u32 = 2000;

    fn build_prompt(text: &str, source_url: Option<&str>) -> String {
        let content: String = text.trim().chars().take(MAX_CONTENT_CHARS).collect();
        JOB_EXTRACTION_PROMPT_TEMPLATE
            .replace("{source_url}", source_url.unwrap_or("Not provided"))
            .replace("{content}", &content)
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
    }

    fn validate(mut self, source_url: Option<&str>) -> Result<Self, String> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("company", &self.company),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(format!("missing {}", missing.join(", ")));
        }

        if self.source_url.is_none() {
            self.source_url = source_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(String::from);
        }
        Ok(self)
    }
}
