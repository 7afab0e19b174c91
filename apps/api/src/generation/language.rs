//! Language detection for job postings. Never fails: every problem yields `"en"`.

use tracing::{debug, warn};

use crate::generation::prompts::LANGUAGE_DETECT_PROMPT_TEMPLATE;
use crate::llm_client::GenerationGateway;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Only the head of the posting is sent; it is enough to tell the language.
const DETECTION_SAMPLE_CHARS: usize = 1000;
const DETECTION_MAX_TOKENS: u32 = 10;

/// Returns the ISO 639-1 code (two lower-case letters) of `text`.
pub async fn detect_language(gateway: &GenerationGateway, text: &str) -> String {
    let sample: String = text.chars().take(DETECTION_SAMPLE_CHARS).collect();
    let prompt = LANGUAGE_DETECT_PROMPT_TEMPLATE.replace("{text}", &sample);

    match gateway.generate(&prompt, DETECTION_MAX_TOKENS).await {
        Ok(raw) => match clean_language_code(&raw) {
            Some(code) => {
                debug!("Detected job language: {code}");
                code
            }
            None => {
                warn!("Language detection returned {raw:?}; defaulting to {DEFAULT_LANGUAGE}");
                DEFAULT_LANGUAGE.to_string()
            }
        },
        Err(e) => {
            warn!("Language detection failed, defaulting to {DEFAULT_LANGUAGE}: {e}");
            DEFAULT_LANGUAGE.to_string()
        }
    }
}

/// Lower-cases, keeps `a-z` only, and accepts the result only if it is two letters.
fn clean_language_code(raw: &str) -> Option<String> {
    let code: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect();
    (code.len() == 2).then_some(code)
}

/// English name used in generation prompts. Unknown codes are described by code.
pub fn language_name(code: &str) -> String {
    let name = match code {
        "en" => "English",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "pl" => "Polish",
        "ru" => "Russian",
        "zh" => "Chinese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "ar" => "Arabic",
        other => return format!("the language with ISO 639-1 code \"{other}\""),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{single, text, Reply};
    use crate::llm_client::LlmError;

    #[test]
    fn test_clean_language_code_strips_noise() {
        assert_eq!(clean_language_code("fr").as_deref(), Some("fr"));
        assert_eq!(clean_language_code(" \"DE\".\n").as_deref(), Some("de"));
        assert_eq!(clean_language_code("es-").as_deref(), Some("es"));
    }

    #[test]
    fn test_clean_language_code_rejects_non_codes() {
        assert_eq!(clean_language_code(""), None);
        assert_eq!(clean_language_code("42!"), None);
        assert_eq!(clean_language_code("French"), None);
    }

    #[tokio::test]
    async fn test_detect_language_returns_cleaned_code() {
        let (gw, provider) = single(vec![text("  PT\n")]);
        assert_eq!(detect_language(&gw, "Procuramos um engenheiro").await, "pt");
        assert_eq!(provider.prompts()[0].1, DETECTION_MAX_TOKENS);
    }

    #[tokio::test]
    async fn test_detect_language_defaults_to_en_when_provider_fails() {
        let (gw, _) = single(vec![Reply::Fail(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        })]);
        assert_eq!(detect_language(&gw, "Wir suchen").await, "en");
    }

    #[tokio::test]
    async fn test_detect_language_defaults_to_en_on_garbage() {
        let (gw, _) = single(vec![text("...")]);
        assert_eq!(detect_language(&gw, "texto").await, "en");
    }

    #[tokio::test]
    async fn test_only_the_first_thousand_characters_are_sent() {
        let (gw, provider) = single(vec![text("en")]);
        let long_text = format!("{}{}", "a".repeat(DETECTION_SAMPLE_CHARS), "ZZZ_TAIL");
        detect_language(&gw, &long_text).await;
        let (prompt, _) = &provider.prompts()[0];
        assert!(!prompt.contains("ZZZ_TAIL"));
        assert!(prompt.contains(&"a".repeat(DETECTION_SAMPLE_CHARS)));
    }

    #[test]
    fn test_language_name_known_and_unknown() {
        assert_eq!(language_name("de"), "German");
        assert_eq!(language_name("sv"), "the language with ISO 639-1 code \"sv\"");
    }
}
