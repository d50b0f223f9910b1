//! Response normalization — turns a completion result into embeddable markup.
//!
//! Steps: pick the first text fragment → repair fences → sanitize. Any failure
//! along the way yields one of the template's fixed fallback fragments; error
//! detail from the provider never reaches the output.

use crate::documents::template::FallbackFragments;
use crate::llm_client::GenerationResult;

const FENCE: &str = "```";
const FORMAT_LABEL: &str = "html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The provider call failed (credential, transport, status, envelope).
    ProviderFailure,
    /// The provider answered without usable text.
    EmptyCompletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub html: String,
    pub fallback: Option<FallbackReason>,
}

impl NormalizedDocument {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn fallback(fragments: &FallbackFragments, reason: FallbackReason) -> Self {
        let html = match reason {
            FallbackReason::ProviderFailure => fragments.provider_error,
            FallbackReason::EmptyCompletion => fragments.empty_completion,
        };
        Self {
            html: html.to_string(),
            fallback: Some(reason),
        }
    }
}

/// Converts a completion result into a document or a fallback fragment.
///
/// Non-fallback output is ammonia's re-serialization of the fence-free text:
/// markup that was already clean comes back byte-identical, but bare `&`
/// becomes `&amp;`, void tags lose their `/` and attribute quotes become `"`.
pub fn normalize(result: &GenerationResult, fragments: &FallbackFragments) -> NormalizedDocument {
    let envelope = match result {
        Ok(envelope) => envelope,
        Err(_) => return NormalizedDocument::fallback(fragments, FallbackReason::ProviderFailure),
    };

    let raw = match envelope.first_text() {
        Some(text) if !text.trim().is_empty() => text,
        _ => return NormalizedDocument::fallback(fragments, FallbackReason::EmptyCompletion),
    };

    let html = sanitize(strip_fences(raw));
    if html.trim().is_empty() {
        return NormalizedDocument::fallback(fragments, FallbackReason::EmptyCompletion);
    }

    NormalizedDocument {
        html,
        fallback: None,
    }
}

/// Completion text split along `leading-fence? body trailing-fence?`.
///
/// Both fences are matched only at the ends of the text. Spaces may sit
/// between the opening fence and its label. A bare leading `html` token
/// directly followed by markup counts as a label, with or without a fence.
#[derive(Debug, PartialEq, Eq)]
pub struct FencedText<'a> {
    pub opened: bool,
    pub label: Option<&'a str>,
    pub body: &'a str,
    pub closed: bool,
}

impl<'a> FencedText<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut opened = false;
        let mut label = None;
        let mut body = text;

        let start = text.trim_start();
        if let Some(rest) = start.strip_prefix(FENCE) {
            opened = true;
            let rest = rest.trim_start_matches([' ', '\t']);
            let label_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                .unwrap_or(rest.len());
            if label_len > 0 {
                label = Some(&rest[..label_len]);
            }
            let rest = rest[label_len..].trim_start_matches([' ', '\t']);
            body = rest
                .strip_prefix("\r\n")
                .or_else(|| rest.strip_prefix('\n'))
                .unwrap_or(rest);
            if label.is_none() {
                if let Some((token, rest)) = split_bare_label(body.trim_start()) {
                    label = Some(token);
                    body = rest;
                }
            }
        } else if let Some((token, rest)) = split_bare_label(start) {
            label = Some(token);
            body = rest;
        }

        let mut closed = false;
        if let Some(rest) = body.trim_end().strip_suffix(FENCE) {
            closed = true;
            body = rest;
        }

        Self {
            opened,
            label,
            body,
            closed,
        }
    }

    fn is_wrapped(&self) -> bool {
        self.opened || self.closed || self.label.is_some()
    }
}

/// `html<h2>…` or `HTML\n<h2>…` → (`html`, `<h2>…`).
fn split_bare_label(text: &str) -> Option<(&str, &str)> {
    let token = text.get(..FORMAT_LABEL.len())?;
    if !token.eq_ignore_ascii_case(FORMAT_LABEL) {
        return None;
    }
    let rest = text[FORMAT_LABEL.len()..].trim_start();
    rest.starts_with('<').then_some((token, rest))
}

/// Removes wrapping fences and a leading format label. Text without any
/// wrapping is returned unchanged.
pub fn strip_fences(text: &str) -> &str {
    let parsed = FencedText::parse(text);
    if parsed.is_wrapped() {
        parsed.body.trim()
    } else {
        text
    }
}

/// Allowlist sanitizer: drops scripts, event handlers, inline styles and
/// unknown tags. `class` is kept for the frontend's styling hooks.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_generic_attributes(&["class"])
        .clean(html)
        .to_string()
}
