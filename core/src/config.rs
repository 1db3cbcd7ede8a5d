//! # MODEL STATE CONFIGURATION
//!
//! **PURPOSE**: The single tunable of a model-state store, the error ceiling.
//! **SOURCES**: Defaults, a JSON document, or the `FORZIUM_MAX_MODEL_ERRORS`
//! environment variable.

use crate::errors::{error_codes, ModelStateError};
use serde::{Deserialize, Serialize};

/// Default ceiling on recorded model errors per store.
pub const DEFAULT_MAX_ALLOWED_ERRORS: usize = 200;

/// Environment variable overriding the ceiling.
pub const MAX_ERRORS_ENV_VAR: &str = "FORZIUM_MAX_MODEL_ERRORS";

/// **MODEL STATE OPTIONS**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStateOptions {
    /// **ERROR CEILING** - Once reached, further errors collapse into one overflow marker
    pub max_allowed_errors: usize,
}

impl Default for ModelStateOptions {
    fn default() -> Self {
        Self {
            max_allowed_errors: DEFAULT_MAX_ALLOWED_ERRORS,
        }
    }
}

impl ModelStateOptions {
    pub fn with_max_allowed_errors(max_allowed_errors: usize) -> Self {
        Self { max_allowed_errors }
    }

    /// **LOAD FROM JSON**
    ///
    /// Missing fields fall back to defaults. Negative or non-integer
    /// ceilings are rejected.
    pub fn from_json(text: &str) -> Result<Self, ModelStateError> {
        serde_json::from_str(text).map_err(|e| ModelStateError::Configuration {
            code: error_codes::INVALID_CONFIG.to_string(),
            message: format!("Invalid model state options: {}", e),
        })
    }

    /// **LOAD FROM ENVIRONMENT**
    pub fn from_env() -> Result<Self, ModelStateError> {
        match std::env::var(MAX_ERRORS_ENV_VAR) {
            Ok(raw) => Self::parse_max_allowed_errors(&raw).map(Self::with_max_allowed_errors),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parses a signed ceiling as supplied by untyped sources.
    pub fn parse_max_allowed_errors(raw: &str) -> Result<usize, ModelStateError> {
        let value: i64 = raw.trim().parse().map_err(|_| ModelStateError::Configuration {
            code: error_codes::INVALID_CONFIG.to_string(),
            message: format!("{} must be an integer, got '{}'", MAX_ERRORS_ENV_VAR, raw),
        })?;
        Self::checked_max_allowed_errors(value)
    }

    /// Rejects negative ceilings.
    pub fn checked_max_allowed_errors(value: i64) -> Result<usize, ModelStateError> {
        usize::try_from(value).map_err(|_| ModelStateError::Configuration {
            code: error_codes::INVALID_CONFIG.to_string(),
            message: format!("max_allowed_errors must be non-negative, got {}", value),
        })
    }
}
