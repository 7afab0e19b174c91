//! Generation gateway: the single point of entry for all LLM calls in JobPilot.
//!
//! ARCHITECTURAL RULE: No other module may call a provider API directly.
//! Everything goes through `GenerationGateway::generate`, which is also the only
//! place provider errors are classified.
//!
//! Provider order is fixed: Anthropic (primary, paid) then Groq (fallback, free tier).
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::LlmConfig;

pub mod anthropic;
pub mod fences;
pub mod groq;
pub mod prompts;

pub use fences::strip_json_fences;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("{provider} API key is not configured")]
    MissingCredential { provider: &'static str },

    #[error("Provider call timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl LlmError {
    /// Missing key, rejected key, or an account that needs billing set up.
    pub fn is_credential_failure(&self) -> bool {
        match self {
            LlmError::MissingCredential { .. } => true,
            LlmError::Api { status, message } => {
                let message = message.to_lowercase();
                matches!(status, 401 | 402 | 403)
                    || message.contains("credit card")
                    || message.contains("billing")
                    || message.contains("api key")
            }
            _ => false,
        }
    }

    /// Rate limits, server errors and transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) | LlmError::Timeout { .. } => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// One failed provider attempt, kept for diagnostics.
#[derive(Debug)]
pub struct ProviderAttempt {
    pub provider: &'static str,
    pub error: LlmError,
}

/// Raised when every configured provider failed for one prompt.
///
/// This is always a single error value, however many providers were tried.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "AI generation is unavailable because no provider credential is usable. \
        Configure a free-tier Groq API key (GROQ_API_KEY) or an Anthropic API key."
    )]
    CredentialsRequired { attempts: Vec<ProviderAttempt> },

    #[error("Failed to generate content with AI. Please check your API keys or try again later.")]
    ProvidersFailed { attempts: Vec<ProviderAttempt> },
}

impl GenerationError {
    /// The fallback provider's failure decides the message the user sees.
    pub(crate) fn from_attempts(attempts: Vec<ProviderAttempt>) -> Self {
        let credential_issue = attempts
            .last()
            .map_or(true, |attempt| attempt.error.is_credential_failure());

        if credential_issue {
            GenerationError::CredentialsRequired { attempts }
        } else {
            GenerationError::ProvidersFailed { attempts }
        }
    }

    pub fn attempts(&self) -> &[ProviderAttempt] {
        match self {
            GenerationError::CredentialsRequired { attempts }
            | GenerationError::ProvidersFailed { attempts } => attempts,
        }
    }

    /// `anthropic: ...; groq: ...`. For logs, never for end users.
    pub fn diagnostics(&self) -> String {
        self.attempts()
            .iter()
            .map(|a| format!("{}: {}", a.provider, a.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A text-completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// False when the provider has no credential; the gateway skips it without a call.
    fn is_configured(&self) -> bool;

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError>;
}

/// Returns the first provider success, or every failure in order.
///
/// Unconfigured providers are never called; they are recorded as
/// `MissingCredential` and the next provider is tried.
pub async fn try_each<'p, T, F, Fut>(
    providers: &'p [Arc<dyn CompletionProvider>],
    mut call: F,
) -> Result<T, Vec<ProviderAttempt>>
where
    F: FnMut(&'p dyn CompletionProvider) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempts = Vec::with_capacity(providers.len());

    for provider in providers {
        let provider: &'p dyn CompletionProvider = provider.as_ref();

        if !provider.is_configured() {
            attempts.push(ProviderAttempt {
                provider: provider.name(),
                error: LlmError::MissingCredential {
                    provider: provider.name(),
                },
            });
            continue;
        }

        match call(provider).await {
            Ok(value) => {
                if !attempts.is_empty() {
                    info!(
                        "Provider {} succeeded after {} failed provider(s)",
                        provider.name(),
                        attempts.len()
                    );
                }
                return Ok(value);
            }
            Err(e) => {
                warn!("Provider {} failed, falling back: {}", provider.name(), e);
                attempts.push(ProviderAttempt {
                    provider: provider.name(),
                    error: e,
                });
            }
        }
    }

    Err(attempts)
}

/// Upper bound on extra attempts per provider; larger settings are clamped.
pub const MAX_RETRIES_CAP: u32 = 5;

/// Delay before retry number `attempt + 1`: 1s, 2s, 4s...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000u64.saturating_mul(2u64.saturating_pow(attempt)))
}

/// Ordered provider list with a per-call timeout and optional bounded retry.
#[derive(Clone)]
pub struct GenerationGateway {
    providers: Vec<Arc<dyn CompletionProvider>>,
    timeout: Duration,
    max_retries: u32,
}

impl GenerationGateway {
    pub fn new(providers: Vec<Arc<dyn CompletionProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            timeout,
            max_retries: 0,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.min(MAX_RETRIES_CAP);
        self
    }

    /// Builds the Anthropic → Groq chain from explicit configuration.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let providers: Vec<Arc<dyn CompletionProvider>> = vec![
            Arc::new(anthropic::AnthropicProvider::new(
                http.clone(),
                config.anthropic_api_key.clone(),
                config.anthropic_model.clone(),
                config.anthropic_url.clone(),
            )),
            Arc::new(groq::GroqProvider::new(
                http,
                config.groq_api_key.clone(),
                config.groq_model.clone(),
                config.groq_url.clone(),
            )),
        ];

        Ok(Self::new(providers, Duration::from_secs(config.timeout_secs))
            .with_max_retries(config.max_retries))
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Sends `prompt` to the first provider that answers.
    /// `max_tokens` bounds the response size for every provider tried.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        try_each(&self.providers, |provider| {
            self.attempt(provider, prompt, max_tokens)
        })
        .await
        .map_err(|attempts| {
            let err = GenerationError::from_attempts(attempts);
            error!("All AI providers failed: {}", err.diagnostics());
            err
        })
    }

    /// One provider, `1 + max_retries` timed attempts with exponential backoff (1s, 2s, 4s...).
    async fn attempt(
        &self,
        provider: &dyn CompletionProvider,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            let result = match tokio::time::timeout(
                self.timeout,
                provider.complete(prompt, max_tokens),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout {
                    secs: self.timeout.as_secs(),
                }),
            };

            match result {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    warn!(
                        "{} attempt {} failed ({}), retrying after {}ms...",
                        provider.name(),
                        attempt + 1,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// Error envelope shared by the Anthropic and OpenAI-compatible APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Converts a non-success response into `LlmError::Api`, preferring the provider's message.
async fn api_error(response: Response) -> LlmError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = ScriptedProvider::new("anthropic", vec![text("from primary")]);
        let secondary = ScriptedProvider::new("groq", vec![text("from secondary")]);
        let gw = gateway(vec![primary.clone(), secondary.clone()]);

        let out = gw.generate("hello", 10).await.unwrap();
        assert_eq!(out, "from primary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_secondary() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error()]);
        let secondary = ScriptedProvider::new("groq", vec![text("from secondary")]);
        let gw = gateway(vec![primary.clone(), secondary.clone()]);

        let out = gw.generate("hello", 10).await.unwrap();
        assert_eq!(out, "from secondary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_primary_is_skipped_without_a_call() {
        let primary = ScriptedProvider::unconfigured("anthropic");
        let secondary = ScriptedProvider::new("groq", vec![text("ok")]);
        let gw = gateway(vec![primary.clone(), secondary.clone()]);

        assert_eq!(gw.generate("hello", 10).await.unwrap(), "ok");
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_both_failing_raise_a_single_generation_error() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error()]);
        let secondary = ScriptedProvider::new("groq", vec![server_error()]);
        let gw = gateway(vec![primary, secondary]);

        let err = gw.generate("hello", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::ProvidersFailed { .. }));
        let providers: Vec<_> = err.attempts().iter().map(|a| a.provider).collect();
        assert_eq!(providers, vec!["anthropic", "groq"]);
        assert!(err.to_string().contains("try again later"));
    }

    #[tokio::test]
    async fn test_missing_fallback_credential_gets_distinct_message() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error()]);
        let secondary = ScriptedProvider::unconfigured("groq");
        let gw = gateway(vec![primary, secondary]);

        let err = gw.generate("hello", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::CredentialsRequired { .. }));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[tokio::test]
    async fn test_billing_rejection_counts_as_credential_failure() {
        let primary = ScriptedProvider::unconfigured("anthropic");
        let secondary = ScriptedProvider::new(
            "groq",
            vec![Reply::Fail(LlmError::Api {
                status: 400,
                message: "AI Gateway requires a credit card on file".to_string(),
            })],
        );
        let gw = gateway(vec![primary, secondary]);

        let err = gw.generate("hello", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::CredentialsRequired { .. }));
    }

    #[tokio::test]
    async fn test_empty_provider_list_is_a_credential_error() {
        let gw = gateway(vec![]);
        let err = gw.generate("hello", 10).await.unwrap_err();
        assert!(matches!(err, GenerationError::CredentialsRequired { .. }));
        assert!(err.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_max_tokens_is_forwarded_to_each_provider() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error()]);
        let secondary = ScriptedProvider::new("groq", vec![text("ok")]);
        let gw = gateway(vec![primary.clone(), secondary.clone()]);

        gw.generate("prompt", 2000).await.unwrap();
        assert_eq!(primary.prompts()[0].1, 2000);
        assert_eq!(secondary.prompts()[0], ("prompt".to_string(), 2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_provider_failure() {
        let primary = ScriptedProvider::new("anthropic", vec![Reply::Hang]);
        let secondary = ScriptedProvider::new("groq", vec![text("late but fine")]);
        let gw = gateway(vec![primary.clone(), secondary.clone()]);

        assert_eq!(gw.generate("hello", 10).await.unwrap(), "late but fine");
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_errors_are_retried_when_enabled() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error(), text("second try")]);
        let gw = gateway(vec![primary.clone()]).with_max_retries(2);

        assert_eq!(gw.generate("hello", 10).await.unwrap(), "second try");
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let primary = ScriptedProvider::new("anthropic", vec![server_error(), text("unused")]);
        let gw = gateway(vec![primary.clone()]);

        assert!(gw.generate("hello", 10).await.is_err());
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_errors_skip_retry() {
        let primary = ScriptedProvider::new(
            "anthropic",
            vec![
                Reply::Fail(LlmError::Api {
                    status: 400,
                    message: "bad request".to_string(),
                }),
                text("unused"),
            ],
        );
        let gw = gateway(vec![primary.clone()]).with_max_retries(3);

        assert!(gw.generate("hello", 10).await.is_err());
        assert_eq!(primary.calls(), 1);
    }

    #[test]
    fn test_backoff_doubles_and_retry_count_is_clamped() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(200), Duration::from_millis(u64::MAX));

        let gw = gateway(vec![ScriptedProvider::new("anthropic", vec![])])
            .with_max_retries(u32::MAX);
        assert_eq!(gw.max_retries, MAX_RETRIES_CAP);
    }

    #[test]
    fn test_credential_classification() {
        assert!(LlmError::MissingCredential { provider: "groq" }.is_credential_failure());
        assert!(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string()
        }
        .is_credential_failure());
        assert!(!LlmError::Api {
            status: 529,
            message: "overloaded".to_string()
        }
        .is_credential_failure());
        assert!(!LlmError::EmptyContent.is_credential_failure());
    }

    #[test]
    fn test_from_config_orders_anthropic_before_groq() {
        let gw = GenerationGateway::from_config(&LlmConfig::default()).unwrap();
        assert_eq!(gw.provider_names(), vec!["anthropic", "groq"]);
    }
}
