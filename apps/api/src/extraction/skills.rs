use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::extraction::prompts::SKILLS_PROMPT_TEMPLATE;
use crate::extraction::structured::{extract_structured, ExtractionSchema};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Trimmed, non-empty skill names in model order. Non-string items are dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<Value>")]
pub struct SkillList(pub Vec<String>);

impl From<Vec<Value>> for SkillList {
    fn from(items: Vec<Value>) -> Self {
        SkillList(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

impl ExtractionSchema for SkillList {
    const KIND: &'static str = "skill list";
    const MAX_TOKENS: u32 = 500;
    const MIN_INPUT_CHARS: usize = 0;

    /// `extract_skills` fills the template itself, so `text` is already the prompt.
    fn build_prompt(text: &str, _source_url: Option<&str>) -> String {
        text.to_string()
    }
}

/// Skills named in a job posting. Never fails: any problem yields an empty list.
pub async fn extract_skills(
    gateway: &crate::llm_client::GenerationGateway,
    description: &str,
    requirements: Option<&str>,
) -> Vec<String> {
    let prompt = SKILLS_PROMPT_TEMPLATE
        .replace("{description}", description)
        .replace("{requirements}", requirements.unwrap_or("Not specified"))
        .replace("{json_only}", JSON_ONLY_INSTRUCTION);

    match extract_structured::<SkillList>(gateway, &prompt, None).await {
        Ok(SkillList(skills)) => skills,
        Err(e) => {
            warn!("Skill extraction failed, continuing without skills: {e}");
            Vec::new()
        }
    }
}
