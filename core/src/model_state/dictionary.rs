//! # MODEL STATE DICTIONARY
//!
//! **PURPOSE**: Request-scoped record of which parts of a bound model were
//! set, validated, skipped or rejected, with hierarchical queries over keys
//! such as `Address.City` or `Items[3].Name`.
//!
//! **OWNERSHIP**: One validation pass owns a store; no internal locking.
//! A child built with [`ModelStateDictionary::from_parent`] shares the
//! parent's entries until its first write. Mutating the parent after a
//! child exists is outside the contract.

use crate::config::ModelStateOptions;
use crate::errors::ModelStateError;
use crate::model_state::entries::{CopyOnWriteEntries, Entries};
use crate::model_state::model_error::{
    invalid_value_generic_message, invalid_value_with_model_value_message, ErrorPayload,
    ModelError, TooManyModelErrors,
};
use crate::model_state::types::{ModelStateEntry, ModelValidationState, ValueProviderResult};
use crate::prefix::PrefixEntries;
use serde_json::Value as JsonValue;

/// Entries at or below a key, exact match first.
pub type ModelStatePrefixEntries<'a> = PrefixEntries<'a, ModelStateEntry, Entries<'a>>;

#[derive(Debug, Clone)]
pub struct ModelStateDictionary {
    entries: CopyOnWriteEntries,
    error_count: usize,
    max_allowed_errors: usize,
    has_recorded_overflow: bool,
}

impl Default for ModelStateDictionary {
    fn default() -> Self {
        Self::with_options(ModelStateOptions::default())
    }
}

impl ModelStateDictionary {
    /// **CONSTRUCTOR** - Empty store with the default ceiling of 200
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ModelStateOptions) -> Self {
        Self {
            entries: CopyOnWriteEntries::new(),
            error_count: 0,
            max_allowed_errors: options.max_allowed_errors,
            has_recorded_overflow: false,
        }
    }

    /// **COPY-ON-WRITE CHILD**
    ///
    /// Reads fall through to `parent`'s entries until the child's first
    /// write. Error accounting carries over.
    pub fn from_parent(parent: &ModelStateDictionary) -> Self {
        log::debug!(
            "Branching model state with {} entries ({} errors recorded)",
            parent.len(),
            parent.error_count
        );
        Self {
            entries: parent.entries.branch(),
            error_count: parent.error_count,
            max_allowed_errors: parent.max_allowed_errors,
            has_recorded_overflow: parent.has_recorded_overflow,
        }
    }

    /// `true` until this store's first write detaches it from shared entries.
    pub fn is_sharing_entries(&self) -> bool {
        self.entries.is_shared()
    }

    // ============================================================================================
    // ERROR ACCOUNTING
    // ============================================================================================

    pub fn max_allowed_errors(&self) -> usize {
        self.max_allowed_errors
    }

    pub fn set_max_allowed_errors(&mut self, max_allowed_errors: usize) {
        self.max_allowed_errors = max_allowed_errors;
    }

    /// Errors accepted through [`add_error`](Self::add_error).
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// `true` once the next `add_error` would be refused.
    pub fn has_reached_max_errors(&self) -> bool {
        self.error_count.saturating_add(1) >= self.max_allowed_errors
    }

    pub fn has_recorded_overflow(&self) -> bool {
        self.has_recorded_overflow
    }

    /// **ADD MODEL ERROR**
    ///
    /// **RETURNS**:
    /// - `true` - error recorded at `key`, entry now `Invalid`
    /// - `false` - ceiling reached; the overflow marker sits at the root key
    ///
    /// Conversion failures are stored as messages, quoting the entry's
    /// attempted value when there is one.
    pub fn add_error(&mut self, key: &str, error: impl Into<ErrorPayload>) -> bool {
        if self.has_reached_max_errors() {
            self.ensure_overflow_recorded();
            return false;
        }

        let error = self.normalize(key, error.into());
        self.error_count += 1;
        self.entries.get_or_insert(key).push_error(error);
        true
    }

    fn ensure_overflow_recorded(&mut self) {
        if self.has_recorded_overflow {
            return;
        }
        log::debug!(
            "Model error ceiling of {} reached, recording overflow marker",
            self.max_allowed_errors
        );
        let marker = ModelError::TooManyErrors(TooManyModelErrors {
            max_allowed_errors: self.max_allowed_errors,
        });
        self.entries.get_or_insert("").push_error(marker);
        self.has_recorded_overflow = true;
    }

    fn normalize(&self, key: &str, payload: ErrorPayload) -> ModelError {
        match payload {
            ErrorPayload::Message(text) => ModelError::Message(text),
            ErrorPayload::Raised(error) => ModelError::Raised(error),
            ErrorPayload::Conversion(_) => {
                let attempted = self
                    .entries
                    .get(key)
                    .and_then(|entry| entry.attempted_value.as_deref());
                let message = match attempted {
                    Some(attempted) => invalid_value_with_model_value_message(attempted, key),
                    None => invalid_value_generic_message(key),
                };
                ModelError::Message(message)
            }
        }
    }

    // ============================================================================================
    // VALUES AND STATE TRANSITIONS
    // ============================================================================================

    /// Records the bound value for `key`. State and errors are untouched.
    pub fn set_model_value(
        &mut self,
        key: &str,
        raw_value: JsonValue,
        attempted_value: Option<String>,
    ) {
        let entry = self.entries.get_or_insert(key);
        entry.raw_value = raw_value;
        entry.attempted_value = attempted_value;
    }

    pub fn set_value(&mut self, key: &str, result: ValueProviderResult) {
        self.set_model_value(key, result.raw_value, result.attempted_value);
    }

    pub fn mark_field_valid(&mut self, key: &str) -> Result<(), ModelStateError> {
        self.transition(key, ModelValidationState::Valid)
    }

    pub fn mark_field_skipped(&mut self, key: &str) -> Result<(), ModelStateError> {
        self.transition(key, ModelValidationState::Skipped)
    }

    fn transition(&mut self, key: &str, to: ModelValidationState) -> Result<(), ModelStateError> {
        if self.get_validation_state(key) == ModelValidationState::Invalid {
            log::warn!("Refusing to mark invalid field '{}' as {}", key, to);
            return Err(ModelStateError::InvalidTransition {
                key: key.to_string(),
                from: ModelValidationState::Invalid,
                to,
            });
        }
        self.entries.get_or_insert(key).validation_state = to;
        Ok(())
    }

    /// **CLEAR VALIDATION STATE**
    ///
    /// Resets errors and state on `key` and its descendants, or on every
    /// entry when `key` is empty. Values stay. The error count does not
    /// go down.
    pub fn clear_validation_state(&mut self, key: &str) {
        if key.is_empty() {
            if !self.entries.is_empty() {
                self.entries
                    .for_each_mut(|_, entry| entry.reset_validation());
            }
            return;
        }

        let matched: Vec<String> = self
            .find_keys_with_prefix(key)
            .map(|(matched, _)| matched.to_string())
            .collect();
        for matched in matched {
            if let Some(entry) = self.entries.get_mut(&matched) {
                entry.reset_validation();
            }
        }
    }

    // ============================================================================================
    // QUERIES
    // ============================================================================================

    /// State of the entry stored exactly at `key`.
    pub fn get_validation_state(&self, key: &str) -> ModelValidationState {
        self.entries
            .get(key)
            .map(|entry| entry.validation_state)
            .unwrap_or_default()
    }

    /// **SUBTREE STATE**
    ///
    /// Aggregated over `key` and every key below it:
    /// - nothing recorded, or anything `Unvalidated` -> `Unvalidated`
    /// - otherwise anything `Invalid` -> `Invalid`
    /// - otherwise `Valid`
    pub fn get_field_validation_state(&self, key: &str) -> ModelValidationState {
        aggregate_state(self.find_keys_with_prefix(key))
    }

    /// Aggregate over the whole store, rooted at the empty key.
    pub fn validation_state(&self) -> ModelValidationState {
        self.get_field_validation_state("")
    }

    pub fn is_valid(&self) -> bool {
        matches!(
            self.validation_state(),
            ModelValidationState::Valid | ModelValidationState::Skipped
        )
    }

    /// Exact entry for `prefix` (if any), then its descendants in insertion order.
    pub fn find_keys_with_prefix(&self, prefix: &str) -> ModelStatePrefixEntries<'_> {
        PrefixEntries::new(prefix, self.entries.get_key_value(prefix), self.entries.iter())
    }

    /// Copies every entry of `other` over this store, replacing whole entries.
    pub fn merge(&mut self, other: &ModelStateDictionary) {
        for (key, entry) in other.iter() {
            self.entries.insert(key, entry.clone());
        }
    }

    // ============================================================================================
    // MAP PRIMITIVES
    // ============================================================================================

    pub fn get(&self, key: &str) -> Option<&ModelStateEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ModelStateEntry> {
        self.entries.get_mut(key)
    }

    /// Entry for the whole model, stored at the empty key.
    pub fn root(&self) -> Option<&ModelStateEntry> {
        self.entries.get("")
    }

    /// Insert-or-replace, returning the previous entry.
    pub fn insert(&mut self, key: &str, entry: ModelStateEntry) -> Option<ModelStateEntry> {
        self.entries.insert(key, entry)
    }

    /// Insert that refuses to overwrite.
    pub fn try_add(&mut self, key: &str, entry: ModelStateEntry) -> Result<(), ModelStateError> {
        if self.entries.contains_key(key) {
            return Err(ModelStateError::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<ModelStateEntry> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &ModelStateEntry> + '_ {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> Entries<'_> {
        self.entries.iter()
    }

    /// Drops every entry. Error accounting is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a ModelStateDictionary {
    type Item = (&'a str, &'a ModelStateEntry);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn aggregate_state<'a, I>(entries: I) -> ModelValidationState
where
    I: Iterator<Item = (&'a str, &'a ModelStateEntry)>,
{
    let mut seen = false;
    let mut invalid = false;
    for (_, entry) in entries {
        seen = true;
        match entry.validation_state {
            ModelValidationState::Unvalidated => return ModelValidationState::Unvalidated,
            ModelValidationState::Invalid => invalid = true,
            ModelValidationState::Valid | ModelValidationState::Skipped => {}
        }
    }

    if !seen {
        ModelValidationState::Unvalidated
    } else if invalid {
        ModelValidationState::Invalid
    } else {
        ModelValidationState::Valid
    }
}
