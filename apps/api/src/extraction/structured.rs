//! Generic "text in, typed JSON out" extraction over the generation gateway.
//!
//! Every extractor follows the same pipeline:
//!   length gate → prompt → gateway → strip_json_fences → serde → validate

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{strip_json_fences, GenerationError, GenerationGateway};

/// Inputs shorter than this (trimmed, in characters) never reach a provider.
pub const DEFAULT_MIN_INPUT_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(
        "Content is too short ({length} characters). Please paste a complete {kind} \
        of at least {min} characters."
    )]
    InputTooShort {
        kind: &'static str,
        length: usize,
        min: usize,
    },

    #[error("Could not read the extracted {kind}: the AI response was not valid JSON")]
    Malformed {
        kind: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("The extracted {kind} is incomplete: {reason}")]
    Invalid {
        kind: &'static str,
        reason: String,
        raw: String,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ExtractionError {
    /// Provider text that failed to parse or validate, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            ExtractionError::Malformed { raw, .. } | ExtractionError::Invalid { raw, .. } => {
                Some(raw)
            }
            _ => None,
        }
    }
}

/// A record shape the model is asked to produce.
pub trait ExtractionSchema: DeserializeOwned + Sized {
    /// Human name used in prompts, logs and error messages.
    const KIND: &'static str;
    const MAX_TOKENS: u32;
    const MIN_INPUT_CHARS: usize = DEFAULT_MIN_INPUT_CHARS;

    fn build_prompt(text: &str, source_url: Option<&str>) -> String;

    /// Shape checks and normalisation after parsing. `Err` carries the reason.
    fn validate(self, _source_url: Option<&str>) -> Result<Self, String> {
        Ok(self)
    }
}

/// Runs the extraction pipeline for schema `S`.
pub async fn extract_structured<S: ExtractionSchema>(
    gateway: &GenerationGateway,
    text: &str,
    source_url: Option<&str>,
) -> Result<S, ExtractionError> {
    let length = text.trim().chars().count();
    if length < S::MIN_INPUT_CHARS {
        return Err(ExtractionError::InputTooShort {
            kind: S::KIND,
            length,
            min: S::MIN_INPUT_CHARS,
        });
    }

    let prompt = S::build_prompt(text, source_url);
    let raw = gateway.generate(&prompt, S::MAX_TOKENS).await?;

    let parsed: S = serde_json::from_str(strip_json_fences(&raw)).map_err(|source| {
        warn!("{} extraction returned unparseable output: {source}", S::KIND);
        ExtractionError::Malformed {
            kind: S::KIND,
            raw: raw.clone(),
            source,
        }
    })?;

    let record = parsed
        .validate(source_url)
        .map_err(|reason| ExtractionError::Invalid {
            kind: S::KIND,
            reason,
            raw: raw.clone(),
        })?;

    debug!("{} extraction succeeded ({} chars of output)", S::KIND, raw.len());
    Ok(record)
}

/// Accepts a string, a number or null; anything else is an error.
/// Strings are trimmed. Null and blanks become `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
