//! # FORZIUM MODEL STATE MODULE
//!
//! **CORE BOOKKEEPING FOR MODEL BINDING AND VALIDATION RESULTS**
//!
//! Binders record raw values, validators record errors or mark fields
//! valid/skipped, and renderers ask hierarchical questions such as
//! "is `Address` or anything under it invalid?".
//!
//! ## USAGE
//!
//! ```rust
//! use forzium_modelstate::model_state::{ModelStateDictionary, ModelValidationState};
//!
//! let mut state = ModelStateDictionary::new();
//! state.mark_field_valid("Address.Street").unwrap();
//! state.add_error("Address.City", "The City field is required.");
//! assert_eq!(
//!     state.get_field_validation_state("Address"),
//!     ModelValidationState::Invalid
//! );
//! ```

pub mod dictionary;
pub mod entries;
pub mod model_error;
pub mod types;

pub use dictionary::{ModelStateDictionary, ModelStatePrefixEntries};
pub use entries::{CopyOnWriteEntries, Entries};
pub use model_error::{ConversionError, ErrorPayload, ModelError, RaisedError, TooManyModelErrors};
pub use types::{attempted_text, ModelStateEntry, ModelValidationState, ValueProviderResult};
