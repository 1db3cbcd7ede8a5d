use crate::model_state::ModelStateDictionary;
use crate::response::types::{HttpResponse, ResponseBody};
use serde_json::{json, Map, Value as JsonValue};
use std::collections::HashMap;

/// Status used for a store that failed validation.
pub const VALIDATION_PROBLEM_STATUS: u16 = 400;

const VALIDATION_PROBLEM_TITLE: &str = "One or more validation errors occurred.";

pub fn serialize_json_response(value: &JsonValue) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

pub fn create_response(status: u16, body: ResponseBody) -> HttpResponse {
    let mut headers = HashMap::new();

    match &body {
        ResponseBody::Json(_) => {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        ResponseBody::Text(_) => {
            headers.insert("Content-Type".to_string(), "text/plain".to_string());
        }
        ResponseBody::Empty => {}
    }

    HttpResponse {
        status_code: status,
        headers,
        body,
    }
}

pub fn serialize_response_body(body: &ResponseBody) -> Vec<u8> {
    match body {
        ResponseBody::Empty => vec![],
        ResponseBody::Json(value) => serialize_json_response(value),
        ResponseBody::Text(text) => text.as_bytes().to_vec(),
    }
}

/// **SERIALIZABLE ERROR VIEW**
///
/// One property per key that carries errors, holding its messages in order.
/// Keys without errors are left out.
pub fn serializable_error(state: &ModelStateDictionary) -> JsonValue {
    let mut errors = Map::new();
    for (key, entry) in state {
        if entry.errors.is_empty() {
            continue;
        }
        let messages = entry
            .errors
            .iter()
            .map(|error| JsonValue::String(error.message()))
            .collect();
        errors.insert(key.to_string(), JsonValue::Array(messages));
    }
    JsonValue::Object(errors)
}

/// **VALIDATION PROBLEM RESPONSE**
///
/// 400 JSON response listing every error in `state`.
pub fn validation_problem_response(state: &ModelStateDictionary) -> HttpResponse {
    let body = json!({
        "title": VALIDATION_PROBLEM_TITLE,
        "status": VALIDATION_PROBLEM_STATUS,
        "errors": serializable_error(state),
    });
    create_response(VALIDATION_PROBLEM_STATUS, ResponseBody::Json(body))
}
