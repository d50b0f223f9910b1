//! Document pipeline — validate → synthesize → complete → normalize.
//!
//! Runs once per request with no retries of its own (the client owns the
//! bounded transport retry). Provider failures are logged here, then folded
//! into a fallback document; only invalid payloads become errors.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::documents::normalizer::{normalize, FallbackReason, NormalizedDocument};
use crate::documents::synthesizer::synthesize;
use crate::documents::template::DocumentTemplate;
use crate::documents::validator::{validate, ValidationError};
use crate::llm_client::{CompletionError, CompletionProvider, GenerationRequest, USER_ROLE};

pub async fn generate_document(
    provider: &dyn CompletionProvider,
    template: &DocumentTemplate,
    payload: &Value,
) -> Result<NormalizedDocument, ValidationError> {
    let answers = validate(payload, template)?;

    let prompt = synthesize(&answers, template);
    debug!(
        answers = answers.len(),
        prompt_chars = prompt.chars().count(),
        template_version = template.version,
        "Prompt synthesized"
    );

    let request = GenerationRequest {
        prompt,
        role: USER_ROLE,
        config: template.generation_config(),
    };

    let result = provider.complete(&request).await;
    if let Err(e) = &result {
        log_provider_failure(e, template);
    }

    let document = normalize(&result, &template.fallbacks);
    match document.fallback {
        None => info!(html_chars = document.html.len(), "Document generated"),
        Some(FallbackReason::EmptyCompletion) => {
            warn!(model = template.model, "Completion had no usable text, returning fallback")
        }
        Some(FallbackReason::ProviderFailure) => {}
    }

    Ok(document)
}

fn log_provider_failure(err: &CompletionError, template: &DocumentTemplate) {
    match err {
        CompletionError::MissingCredential => {
            error!("GEMINI_API_KEY is not configured; refusing to call the generation service")
        }
        CompletionError::Http { status, body } => error!(
            status,
            body = %body,
            model = template.model,
            "Gemini API returned an error"
        ),
        CompletionError::Transport(_) | CompletionError::MalformedEnvelope(_) => error!(
            kind = err.kind(),
            error = %err,
            model = template.model,
            "Gemini call failed"
        ),
    }
}
