pub use crate::config::{ModelStateOptions, DEFAULT_MAX_ALLOWED_ERRORS};
pub use crate::errors::{error_codes, ModelStateError};
pub use crate::model_state::{
    ConversionError, ErrorPayload, ModelError, ModelStateDictionary, ModelStateEntry,
    ModelValidationState, TooManyModelErrors, ValueProviderResult,
};
pub use crate::prefix::{is_prefix_match, keys_equal};
pub use crate::response::{serializable_error, validation_problem_response, HttpResponse, ResponseBody};
