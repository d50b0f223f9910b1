//! Document templates — static, versioned data describing one document type.
//!
//! A template fully determines the prompt for a given answer set. Adding a
//! document type means adding a `DocumentTemplate` record in `prompts.rs` and
//! a `DocumentKind` variant; the pipeline itself does not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::documents::prompts::{CLARITY_MAP, PROJECT_BRIEF};
use crate::llm_client::prompts::Locale;
use crate::llm_client::{GenerationConfig, RESPONSE_MIME_TYPE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    ClarityMap,
    ProjectBrief,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::ClarityMap, DocumentKind::ProjectBrief];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::ClarityMap => "clarity-map",
            DocumentKind::ProjectBrief => "project-brief",
        }
    }

    pub fn template(self) -> &'static DocumentTemplate {
        match self {
            DocumentKind::ClarityMap => &CLARITY_MAP,
            DocumentKind::ProjectBrief => &PROJECT_BRIEF,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown document type '{0}'")]
pub struct UnknownDocumentKind(pub String);

impl FromStr for DocumentKind {
    type Err = UnknownDocumentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownDocumentKind(s.to_string()))
    }
}

/// One questionnaire field: its payload key and the question it answers.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnswerField {
    pub key: &'static str,
    pub label: &'static str,
}

/// A named category and the condition under which the model should pick it.
#[derive(Debug)]
pub struct ClassificationRule {
    pub category: &'static str,
    pub condition: &'static str,
}

/// Decision rules handed to the model verbatim. Order is priority order.
#[derive(Debug)]
pub struct Classification {
    pub signals: &'static str,
    pub rules: &'static [ClassificationRule],
}

/// One required section of the generated document.
#[derive(Debug)]
pub struct SectionDirective {
    pub tag: &'static str,
    pub title: &'static str,
    pub directive: &'static str,
    pub example: Option<&'static str>,
    pub classification: Option<&'static Classification>,
}

#[derive(Debug)]
pub struct OutputContract {
    pub opening_tag: &'static str,
    pub closing_tag: &'static str,
}

/// Safe, self-contained markup returned instead of model output.
#[derive(Debug)]
pub struct FallbackFragments {
    /// The provider could not be reached, refused, or answered garbage.
    pub provider_error: &'static str,
    /// The provider answered but produced no usable text.
    pub empty_completion: &'static str,
}

#[derive(Debug)]
pub struct DocumentTemplate {
    pub kind: DocumentKind,
    pub version: u32,
    pub title: &'static str,
    pub locale: Locale,
    pub persona: &'static str,
    pub subject: &'static str,
    pub fields: &'static [AnswerField],
    pub task: &'static str,
    pub sections: &'static [SectionDirective],
    pub contract: OutputContract,
    pub model: &'static str,
    pub temperature: Option<f32>,
    /// Key of the markup string in the JSON response.
    pub response_field: &'static str,
    pub fallbacks: FallbackFragments,
}

impl DocumentTemplate {
    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.model,
            response_mime_type: RESPONSE_MIME_TYPE,
            temperature: self.temperature,
        }
    }

    #[cfg(test)]
    pub fn has_field(&self, key: &str) -> bool {
        self.fields.iter().any(|field| field.key == key)
    }

    /// Every text fragment that may carry `{field}` placeholders.
    #[cfg(test)]
    pub fn placeholder_texts(&self) -> Vec<&'static str> {
        let mut texts = vec![self.persona, self.subject, self.task];
        for section in self.sections {
            texts.push(section.title);
            texts.push(section.directive);
            texts.extend(section.example);
        }
        texts
    }
}

/// A piece of template text: literal, or a `{field}` reference.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Field(&'a str),
}

/// Splits template text into literals and `{field}` references.
///
/// Only `{` + lowercase identifier + `}` counts as a reference; any other
/// brace is literal text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('{') {
        let open = cursor + offset;
        let after = &text[open + 1..];
        let ident_len = after
            .find(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'))
            .unwrap_or(after.len());

        if ident_len > 0 && after[ident_len..].starts_with('}') {
            if literal_start < open {
                out.push(Segment::Literal(&text[literal_start..open]));
            }
            out.push(Segment::Field(&after[..ident_len]));
            cursor = open + ident_len + 2;
            literal_start = cursor;
        } else {
            cursor = open + 1;
        }
    }

    if literal_start < text.len() {
        out.push(Segment::Literal(&text[literal_start..]));
    }
    out
}
