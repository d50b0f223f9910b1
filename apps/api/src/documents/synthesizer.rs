//! Prompt synthesis — renders an answer set and a template into one instruction.
//!
//! Pure and deterministic: the same answers and template always produce the
//! same bytes. Classification rules are written out for the model to apply;
//! nothing here evaluates them.

use crate::documents::template::{segments, DocumentTemplate, SectionDirective, Segment};
use crate::documents::validator::AnswerSet;
use crate::llm_client::prompts::{html_only_contract, phrases, Phrases};

const INDENT: &str = "   ";

/// Builds the full prompt, in order: persona, quoted answers, numbered
/// sections (with any classification rules), output contract.
pub fn synthesize(answers: &AnswerSet, template: &DocumentTemplate) -> String {
    debug_assert_eq!(answers.kind(), template.kind);

    let phrases = phrases(template.locale);
    let mut lines: Vec<String> = Vec::new();

    lines.push(template.persona.to_string());
    lines.push(String::new());

    lines.push(fill(template.subject, answers));
    for field in template.fields {
        let value = answers.get(field.key).unwrap_or_default();
        lines.push(format!("- {}: {}", field.label, quote(value)));
    }
    lines.push(String::new());

    lines.push(fill(template.task, answers));
    lines.push(String::new());

    lines.push(phrases.structure_intro.to_string());
    for (index, section) in template.sections.iter().enumerate() {
        render_section(&mut lines, index + 1, section, answers, phrases);
    }
    lines.push(String::new());

    lines.push(html_only_contract(
        template.locale,
        template.contract.opening_tag,
        template.contract.closing_tag,
    ));

    lines.join("\n")
}

fn render_section(
    lines: &mut Vec<String>,
    number: usize,
    section: &SectionDirective,
    answers: &AnswerSet,
    phrases: &Phrases,
) {
    lines.push(format!(
        "{number}. {} ({}): {}",
        fill(section.title, answers),
        section.tag,
        fill(section.directive, answers)
    ));

    if let Some(classification) = section.classification {
        lines.push(format!(
            "{INDENT}{} {}",
            phrases.primary_signals, classification.signals
        ));
        for rule in classification.rules {
            lines.push(format!(
                "{INDENT}- {}: {} {}",
                rule.category, phrases.assign_if, rule.condition
            ));
        }
        lines.push(format!("{INDENT}{}", phrases.priority_hint));
    }

    if let Some(example) = section.example {
        lines.push(format!(
            "{INDENT}{}: \"{}\"",
            phrases.example,
            fill(example, answers)
        ));
    }
}

/// Substitutes `{field}` references in a single pass. Inserted values are
/// never re-scanned, and unknown references are kept as written. Line breaks
/// in a value are escaped so it stays on the line it was placed in.
fn fill(text: &str, answers: &AnswerSet) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Literal(literal) => out.push_str(literal),
            Segment::Field(key) => match answers.get(key) {
                Some(value) => escape_into(&mut out, value, false),
                None => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            },
        }
    }
    out
}

/// Wraps an answer in double quotes so it cannot end its own quotation.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    escape_into(&mut out, value, true);
    out.push('"');
    out
}

fn escape_into(out: &mut String, value: &str, escape_quotes: bool) {
    for c in value.chars() {
        match c {
            '"' if escape_quotes => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}
