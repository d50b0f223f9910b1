// Personalized document generation.
// Flow per request: validator → synthesizer → llm_client → normalizer.
// All provider calls go through llm_client::CompletionProvider.

pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod synthesizer;
pub mod template;
pub mod validator;
