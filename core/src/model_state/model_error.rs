//! # ERROR PAYLOADS
//!
//! **INPUT**: `ErrorPayload` - what validators and binders hand to the store.
//! **STORED**: `ModelError` - what the store keeps per key.
//!
//! Conversion failures only exist on the input side; the store rewrites them
//! into plain messages before they reach an entry.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, clonable handle to an arbitrary raised error.
pub type RaisedError = Arc<dyn StdError + Send + Sync>;

/// **CONVERSION FAILURE**
///
/// Raised by a binder when a request value did not parse into the target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not convert value to {target_type}: {reason}")]
pub struct ConversionError {
    pub target_type: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(target_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            reason: reason.into(),
        }
    }
}

/// **OVERFLOW MARKER** - Recorded once at the root key when the ceiling is hit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The maximum number of allowed model errors has been reached.")]
pub struct TooManyModelErrors {
    pub max_allowed_errors: usize,
}

/// **ERROR PAYLOAD** - Unnormalized error handed to `try_add_error`
#[derive(Debug, Clone)]
pub enum ErrorPayload {
    Message(String),
    Conversion(ConversionError),
    Raised(RaisedError),
}

impl ErrorPayload {
    pub fn raised<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        ErrorPayload::Raised(Arc::new(error))
    }
}

impl From<&str> for ErrorPayload {
    fn from(message: &str) -> Self {
        ErrorPayload::Message(message.to_string())
    }
}

impl From<String> for ErrorPayload {
    fn from(message: String) -> Self {
        ErrorPayload::Message(message)
    }
}

impl From<ConversionError> for ErrorPayload {
    fn from(error: ConversionError) -> Self {
        ErrorPayload::Conversion(error)
    }
}

/// **STORED MODEL ERROR**
#[derive(Debug, Clone)]
pub enum ModelError {
    Message(String),
    Raised(RaisedError),
    TooManyErrors(TooManyModelErrors),
}

impl ModelError {
    /// **DISPLAY TEXT** - Message for `Message`, the error's text otherwise
    pub fn message(&self) -> String {
        match self {
            ModelError::Message(text) => text.clone(),
            ModelError::Raised(error) => error.to_string(),
            ModelError::TooManyErrors(marker) => marker.to_string(),
        }
    }

    pub fn is_overflow_marker(&self) -> bool {
        matches!(self, ModelError::TooManyErrors(_))
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            ModelError::Raised(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<&str> for ModelError {
    fn from(message: &str) -> Self {
        ModelError::Message(message.to_string())
    }
}

impl From<String> for ModelError {
    fn from(message: String) -> Self {
        ModelError::Message(message)
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl PartialEq for ModelError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ModelError::Message(a), ModelError::Message(b)) => a == b,
            (ModelError::Raised(a), ModelError::Raised(b)) => Arc::ptr_eq(a, b),
            (ModelError::TooManyErrors(a), ModelError::TooManyErrors(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for ModelError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ModelError", 1)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// **CONVERSION MESSAGE TEMPLATES**
pub(crate) fn invalid_value_generic_message(key: &str) -> String {
    format!("The supplied value is invalid for {}.", key)
}

pub(crate) fn invalid_value_with_model_value_message(attempted: &str, key: &str) -> String {
    format!("The value '{}' is not valid for {}.", attempted, key)
}
