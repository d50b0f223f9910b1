//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the generation service directly.
//! Handlers depend on the `CompletionProvider` trait, never on `GeminiClient`.
//!
//! The credential is injected at construction. A client built without one
//! answers every call with `MissingCredential` and never touches the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

/// Role tag sent with every prompt.
pub const USER_ROLE: &str = "user";
/// Media type requested from the service; HTML is asked for in the prompt itself.
pub const RESPONSE_MIME_TYPE: &str = "text/plain";
/// Fixed pause before retrying a transient transport failure.
const RETRY_BACKOFF_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response envelope: {0}")]
    MalformedEnvelope(String),
}

impl CompletionError {
    /// Short stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::MissingCredential => "missing_credential",
            CompletionError::Transport(_) => "transport",
            CompletionError::Http { .. } => "http",
            CompletionError::MalformedEnvelope(_) => "malformed_envelope",
        }
    }
}

/// The result of one completion call, as seen by the normalizer.
pub type GenerationResult = Result<CompletionEnvelope, CompletionError>;

/// Per-document generation settings. Never derived from user input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Travels in the endpoint path, not in the body.
    #[serde(skip)]
    pub model: &'static str,
    pub response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Everything the provider needs for one call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub role: &'static str,
    pub config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

impl<'a> From<&'a GenerationRequest> for GeminiRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: request.role,
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: &request.config,
        }
    }
}

/// Response envelope of `generateContent`. Every level is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEnvelope {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl CompletionEnvelope {
    /// Text of the first part of the first candidate. Later candidates are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    /// Single-candidate envelope, used by stub providers.
    #[cfg(test)]
    pub fn from_text(text: &str) -> Self {
        CompletionEnvelope {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ContentPart {
                        text: Some(text.to_string()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            usage_metadata: None,
        }
    }
}

/// Seam between the pipeline and the generation service.
///
/// Carried in `AppState` as `Arc<dyn CompletionProvider>` so tests can swap in a stub.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &GenerationRequest) -> GenerationResult;
}

/// Gemini `generateContent` client with an explicit timeout and a bounded,
/// transport-only retry.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            Duration::from_secs(config.llm_timeout_secs),
            config.llm_max_retries,
        )?)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    async fn send_once(
        &self,
        url: &str,
        api_key: &str,
        body: &GeminiRequest<'_>,
    ) -> GenerationResult {
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: CompletionEnvelope = serde_json::from_str(&text)
            .map_err(|e| CompletionError::MalformedEnvelope(e.to_string()))?;

        let usage = envelope.usage_metadata.clone().unwrap_or_default();
        debug!(
            prompt_tokens = usage.prompt_token_count,
            completion_tokens = usage.candidates_token_count,
            candidates = envelope.candidates.len(),
            finish_reason = envelope
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none"),
            "Gemini call succeeded"
        );

        Ok(envelope)
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, request: &GenerationRequest) -> GenerationResult {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let url = self.endpoint(request.config.model);
        let body = GeminiRequest::from(request);

        let mut attempt = 0;
        loop {
            match self.send_once(&url, api_key, &body).await {
                Err(CompletionError::Transport(e))
                    if attempt < self.max_retries && is_transient(&e) =>
                {
                    attempt += 1;
                    warn!(
                        attempt,
                        error = %e,
                        "Gemini transport error, retrying after {RETRY_BACKOFF_MS}ms"
                    );
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS)).await;
                }
                result => return result,
            }
        }
    }
}

/// The request URL carries the credential, so it is dropped from the error.
fn transport(err: reqwest::Error) -> CompletionError {
    CompletionError::Transport(err.without_url())
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}
