//! # VALIDATION RESPONSE MODULE
//!
//! **CONSUMER SIDE**: Turns a finished model-state store into the error view
//! and the 400 response handed back to the client.

pub mod serializer;
pub mod types;

pub use serializer::{
    create_response, serializable_error, serialize_json_response, serialize_response_body,
    validation_problem_response,
};
pub use types::{HttpResponse, ResponseBody};
