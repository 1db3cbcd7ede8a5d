use crate::model_state::ModelValidationState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelStateError {
    #[error("INVALID TRANSITION: field '{key}' is {from} and cannot be marked {to}")]
    InvalidTransition {
        key: String,
        from: ModelValidationState,
        to: ModelValidationState,
    },

    #[error("DUPLICATE KEY: an entry for '{key}' already exists")]
    DuplicateKey { key: String },

    #[error("CONFIGURATION ERROR: {code} - {message}")]
    Configuration { code: String, message: String },
}

impl ModelStateError {
    /// **STABLE ERROR CODE** - Machine-readable identifier for this failure
    pub fn code(&self) -> &str {
        match self {
            ModelStateError::InvalidTransition { .. } => error_codes::INVALID_TRANSITION,
            ModelStateError::DuplicateKey { .. } => error_codes::DUPLICATE_KEY,
            ModelStateError::Configuration { code, .. } => code,
        }
    }
}

/// **MODEL STATE ERROR CODES**
///
/// **MANDATE**: Use these standardized error codes for consistent error reporting.
pub mod error_codes {
    pub const INVALID_TRANSITION: &str = "RUST_CORE_MODELSTATE_INVALID_TRANSITION";
    pub const DUPLICATE_KEY: &str = "RUST_CORE_MODELSTATE_DUPLICATE_KEY";
    pub const INVALID_CONFIG: &str = "RUST_CORE_MODELSTATE_INVALID_CONFIG";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = ModelStateError::InvalidTransition {
            key: "Address.City".to_string(),
            from: ModelValidationState::Invalid,
            to: ModelValidationState::Valid,
        };

        let text = err.to_string();
        assert!(text.contains("Address.City"));
        assert!(text.contains("Invalid"));
        assert!(text.contains("Valid"));
        assert_eq!(err.code(), error_codes::INVALID_TRANSITION);
    }

    #[test]
    fn test_configuration_code_passthrough() {
        let err = ModelStateError::Configuration {
            code: error_codes::INVALID_CONFIG.to_string(),
            message: "bad ceiling".to_string(),
        };
        assert_eq!(err.code(), error_codes::INVALID_CONFIG);
        assert!(err.to_string().starts_with("CONFIGURATION ERROR"));
    }
}
