use std::sync::Arc;

use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-request data. Templates are static and read directly from
/// `DocumentKind::template()`.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. Default: `GeminiClient`; tests swap in a stub.
    pub provider: Arc<dyn CompletionProvider>,
}
