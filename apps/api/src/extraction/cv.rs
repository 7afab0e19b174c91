use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::prompts::CV_EXTRACTION_PROMPT_TEMPLATE;
use crate::extraction::structured::ExtractionSchema;
use crate::generation::facts::{verify_facts, UserFacts, VerifiedFacts};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Model output for a CV. Kept as JSON until it passes through the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedCVData(Value);

impl ExtractedCVData {
    pub fn verified(&self) -> VerifiedFacts {
        verify_facts(&self.0)
    }
}

impl ExtractionSchema for ExtractedCVData {
    const KIND: &'static str = "CV";
    const MAX_TOKENS: u32 = 3000;

    fn build_prompt(text: &str, _source_url: Option<&str>) -> String {
        CV_EXTRACTION_PROMPT_TEMPLATE
            .replace("{cv_text}", text.trim())
            .replace("{json_only}", JSON_ONLY_INSTRUCTION)
    }

    fn validate(self, _source_url: Option<&str>) -> Result<Self, String> {
        if !self.0.is_object() {
            return Err("expected a JSON object".to_string());
        }
        if *self.verified() == UserFacts::default() {
            return Err("no profile fields were found in the CV".to_string());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::structured::{extract_structured, ExtractionError};
    use crate::llm_client::testing::{single, text};

    const CV_TEXT: &str = "Ada Lovelace, ada@example.com. Senior Software Engineer at Acme, \
        Jan 2020 - Dec 2022. Skills: Rust, SQL.";

    #[tokio::test]
    async fn test_cv_extraction_yields_verified_facts() {
        let (gw, provider) = single(vec![text(
            r#"```json
{
  "personalInfo": {"fullName": "Ada Lovelace", "email": "ada@example.com", "phone": ""},
  "skills": ["Rust", " SQL "],
  "experience": [{"company": "Acme", "position": "Senior Software Engineer",
                  "startDate": "Jan 2020", "endDate": "Dec 2022", "description": null}],
  "education": [],
  "certifications": [{}]
}
```"#,
        )]);

        let data = extract_structured::<ExtractedCVData>(&gw, CV_TEXT, None)
            .await
            .unwrap();
        let facts = data.verified();

        assert_eq!(facts.personal_info.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(facts.personal_info.phone, None);
        assert_eq!(facts.skills, vec!["Rust", "SQL"]);
        assert_eq!(
            facts.experience[0].position.as_deref(),
            Some("Senior Software Engineer")
        );
        assert!(facts.certifications.is_empty());

        let (prompt, max_tokens) = &provider.prompts()[0];
        assert_eq!(*max_tokens, 3000);
        assert!(prompt.contains(CV_TEXT));
        assert!(prompt.contains("EXACT job title"));
    }

    #[tokio::test]
    async fn test_array_output_is_invalid() {
        let (gw, _) = single(vec![text(r#"["Rust"]"#)]);
        let err = extract_structured::<ExtractedCVData>(&gw, CV_TEXT, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Invalid { .. }));
    }

    #[tokio::test]
    async fn test_empty_object_is_invalid() {
        let (gw, _) = single(vec![text(r#"{"personalInfo": {}, "skills": []}"#)]);
        let err = extract_structured::<ExtractedCVData>(&gw, CV_TEXT, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no profile fields"));
    }
}
