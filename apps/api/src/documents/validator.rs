//! Answer validation — the only gate between a request body and the synthesizer.
//!
//! Unknown fields are ignored. Required fields must be present and be JSON
//! strings. Values are kept verbatim: no trimming, no normalisation.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::documents::template::{DocumentKind, DocumentTemplate};

/// Name reported when the body itself is not a JSON object.
pub const BODY_FIELD: &str = "body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("is missing")]
    Missing,

    #[error("must be a string")]
    NotAString,

    #[error("must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationFailure,
}

impl ValidationError {
    fn new(field: &str, reason: ValidationFailure) -> Self {
        Self {
            field: field.to_string(),
            reason,
        }
    }
}

/// Validated answers for one document type. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    kind: DocumentKind,
    values: BTreeMap<&'static str, String>,
}

impl AnswerSet {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Checks `payload` against the fields `template` requires.
///
/// Fields are checked in template order; the first offending one is reported.
pub fn validate(payload: &Value, template: &DocumentTemplate) -> Result<AnswerSet, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::new(BODY_FIELD, ValidationFailure::NotAnObject))?;

    let mut values = BTreeMap::new();
    for field in template.fields {
        let value = match object.get(field.key) {
            None | Some(Value::Null) => {
                return Err(ValidationError::new(field.key, ValidationFailure::Missing))
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ValidationError::new(
                    field.key,
                    ValidationFailure::NotAString,
                ))
            }
        };
        values.insert(field.key, value);
    }

    Ok(AnswerSet {
        kind: template.kind,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clarity_payload() -> Value {
        json!({
            "name": "Ava",
            "mission": "Help clinics cut admin time",
            "next_level": "Scale Operations & Team",
            "bottleneck": "Every decision routes through me",
            "mental_energy": "Team / Operations",
            "first_action": "Hire an operations lead",
        })
    }

    #[test]
    fn test_valid_payload_produces_answer_set() {
        let answers = validate(&clarity_payload(), DocumentKind::ClarityMap.template()).unwrap();
        assert_eq!(answers.kind(), DocumentKind::ClarityMap);
        assert_eq!(answers.len(), 6);
        assert_eq!(answers.get("next_level"), Some("Scale Operations & Team"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut payload = clarity_payload();
        payload["utm_source"] = json!("newsletter");
        payload["score"] = json!(42);

        let answers = validate(&payload, DocumentKind::ClarityMap.template()).unwrap();
        assert_eq!(answers.get("utm_source"), None);
        assert_eq!(answers.len(), 6);
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut payload = clarity_payload();
        payload.as_object_mut().unwrap().remove("bottleneck");

        let err = validate(&payload, DocumentKind::ClarityMap.template()).unwrap_err();
        assert_eq!(err.field, "bottleneck");
        assert_eq!(err.reason, ValidationFailure::Missing);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut payload = clarity_payload();
        payload["mission"] = Value::Null;

        let err = validate(&payload, DocumentKind::ClarityMap.template()).unwrap_err();
        assert_eq!(err.field, "mission");
        assert_eq!(err.reason, ValidationFailure::Missing);
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let mut payload = clarity_payload();
        payload["first_action"] = json!(["hire", "delegate"]);

        let err = validate(&payload, DocumentKind::ClarityMap.template()).unwrap_err();
        assert_eq!(err.field, "first_action");
        assert_eq!(err.reason, ValidationFailure::NotAString);
    }

    #[test]
    fn test_first_offending_field_in_template_order() {
        let payload = json!({ "name": "Ava" });
        let err = validate(&payload, DocumentKind::ClarityMap.template()).unwrap_err();
        assert_eq!(err.field, "mission");
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let err = validate(&json!(["Ava"]), DocumentKind::ProjectBrief.template()).unwrap_err();
        assert_eq!(err.field, BODY_FIELD);
        assert_eq!(err.reason, ValidationFailure::NotAnObject);
    }

    #[test]
    fn test_empty_strings_are_accepted() {
        let payload = json!({
            "name": "",
            "project_type": "",
            "main_goal": "",
            "budget_range": "",
        });
        let answers = validate(&payload, DocumentKind::ProjectBrief.template()).unwrap();
        assert_eq!(answers.get("name"), Some(""));
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let mut payload = clarity_payload();
        payload["name"] = json!("  Ava \n");

        let answers = validate(&payload, DocumentKind::ClarityMap.template()).unwrap();
        assert_eq!(answers.get("name"), Some("  Ava \n"));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ValidationError::new("mission", ValidationFailure::Missing);
        assert_eq!(err.to_string(), "field 'mission' is missing");
    }
}
