//! # MODEL STATE DATA TYPES
//!
//! **CRITICAL**: Per-key bookkeeping for a model tree being bound from request data.

use crate::model_state::model_error::ModelError;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// **VALIDATION STATE**
///
/// Lifecycle of a single key: starts `Unvalidated`, resolves to one of the
/// other three. `Invalid` is sticky against `Valid`/`Skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ModelValidationState {
    #[default]
    Unvalidated,
    Valid,
    Invalid,
    Skipped,
}

impl ModelValidationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelValidationState::Unvalidated => "Unvalidated",
            ModelValidationState::Valid => "Valid",
            ModelValidationState::Invalid => "Invalid",
            ModelValidationState::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for ModelValidationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// **VALUE PROVIDER RESULT**
///
/// **PURPOSE**: Raw request value plus its human-readable rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValueProviderResult {
    /// **RAW VALUE** - As supplied by the request, `Null` when absent
    pub raw_value: JsonValue,

    /// **ATTEMPTED VALUE** - Text shown back to the user on failure
    pub attempted_value: Option<String>,
}

impl ValueProviderResult {
    /// **CONSTRUCTOR** - Derives the attempted text from the raw value
    pub fn new(raw_value: JsonValue) -> Self {
        let attempted_value = attempted_text(&raw_value);
        Self {
            raw_value,
            attempted_value,
        }
    }

    /// **CONSTRUCTOR WITH EXPLICIT TEXT**
    pub fn with_attempted_value(raw_value: JsonValue, attempted_value: impl Into<String>) -> Self {
        Self {
            raw_value,
            attempted_value: Some(attempted_value.into()),
        }
    }
}

/// Multi-value payloads are comma-joined, `Null` has no text.
pub fn attempted_text(raw_value: &JsonValue) -> Option<String> {
    match raw_value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Array(items) => Some(
            items
                .iter()
                .map(|item| attempted_text(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// **MODEL STATE ENTRY**
///
/// **INVARIANT**: `errors` is non-empty only while `validation_state` is `Invalid`
/// (errors force `Invalid`; clearing resets both).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelStateEntry {
    pub raw_value: JsonValue,
    pub attempted_value: Option<String>,
    pub validation_state: ModelValidationState,
    pub errors: Vec<ModelError>,
}

impl ModelStateEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// **CONSTRUCTOR FROM BOUND VALUE**
    pub fn with_value(result: ValueProviderResult) -> Self {
        Self {
            raw_value: result.raw_value,
            attempted_value: result.attempted_value,
            ..Self::default()
        }
    }

    pub fn with_state(mut self, state: ModelValidationState) -> Self {
        self.validation_state = state;
        self
    }

    /// Appends an already-normalized error and forces `Invalid`.
    pub fn push_error(&mut self, error: ModelError) {
        self.errors.push(error);
        self.validation_state = ModelValidationState::Invalid;
    }

    /// Drops all errors and returns the entry to `Unvalidated`.
    pub fn reset_validation(&mut self) {
        self.errors.clear();
        self.validation_state = ModelValidationState::Unvalidated;
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ModelError::message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attempted_text_scalars() {
        assert_eq!(attempted_text(&json!(null)), None);
        assert_eq!(attempted_text(&json!("abc")), Some("abc".to_string()));
        assert_eq!(attempted_text(&json!(42)), Some("42".to_string()));
        assert_eq!(attempted_text(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_attempted_text_multi_value_is_comma_joined() {
        let raw = json!(["red", "green", 3]);
        assert_eq!(attempted_text(&raw), Some("red,green,3".to_string()));
    }

    #[test]
    fn test_entry_defaults_unvalidated() {
        let entry = ModelStateEntry::new();
        assert_eq!(entry.validation_state, ModelValidationState::Unvalidated);
        assert!(entry.errors.is_empty());
        assert_eq!(entry.raw_value, JsonValue::Null);
    }

    #[test]
    fn test_push_error_forces_invalid() {
        let mut entry = ModelStateEntry::new().with_state(ModelValidationState::Skipped);
        entry.push_error(ModelError::from("required"));
        assert_eq!(entry.validation_state, ModelValidationState::Invalid);

        entry.reset_validation();
        assert_eq!(entry.validation_state, ModelValidationState::Unvalidated);
        assert!(entry.errors.is_empty());
    }
}
