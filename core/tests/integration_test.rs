use forzium_modelstate::api::*;
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_prefix_match_integration() {
    assert!(!is_prefix_match("Foo", "Foo"));
    assert!(is_prefix_match("", "Foo"));
    assert!(!is_prefix_match("Foo", "Foobar"));
    assert!(is_prefix_match("Foo", "Foo.Bar"));
    assert!(is_prefix_match("Foo", "Foo[0]"));
    assert!(is_prefix_match("Name", "[0].Name"));
}

#[test]
fn test_overflow_integration() {
    init_logging();
    let options = ModelStateOptions::from_json(r#"{"max_allowed_errors": 10}"#).unwrap();
    let mut state = ModelStateDictionary::with_options(options);

    for i in 0..9 {
        assert!(state.add_error(&format!("Items[{}].Name", i), "required"));
    }
    assert_eq!(state.error_count(), 9);

    for _ in 0..3 {
        assert!(!state.add_error("Items[9].Name", "required"));
    }

    let overflow: Vec<_> = state
        .values()
        .flat_map(|entry| entry.errors.iter())
        .filter(|error| error.is_overflow_marker())
        .collect();
    assert_eq!(overflow.len(), 1);
    assert_eq!(state.get_validation_state(""), ModelValidationState::Invalid);
    assert_eq!(
        state.get_field_validation_state("Items"),
        ModelValidationState::Invalid
    );
}

#[test]
fn test_collection_binding_integration() {
    init_logging();
    let mut state = ModelStateDictionary::new();
    state.set_value("Items", ValueProviderResult::new(json!(["1", "10"])));
    state.set_value("Items[1]", ValueProviderResult::new(json!("1")));
    state.set_value("Items[10]", ValueProviderResult::new(json!("10")));

    state.mark_field_valid("Items").unwrap();
    state.mark_field_valid("Items[1]").unwrap();
    state.add_error("Items[10]", ConversionError::new("u8", "out of range"));

    assert_eq!(
        state.get_field_validation_state("Items[1]"),
        ModelValidationState::Valid
    );
    assert_eq!(
        state.get_field_validation_state("Items[10]"),
        ModelValidationState::Invalid
    );
    assert_eq!(state.get("items").unwrap().attempted_value.as_deref(), Some("1,10"));

    let response = validation_problem_response(&state);
    assert_eq!(response.status_code, 400);
    match response.body {
        ResponseBody::Json(body) => assert_eq!(
            body["errors"]["Items[10]"],
            json!(["The value '10' is not valid for Items[10]."])
        ),
        _ => panic!("Expected JSON body"),
    }
}

#[test]
fn test_invalid_transition_integration() {
    let mut state = ModelStateDictionary::new();
    state.add_error("Email", "bad");
    let err = state.mark_field_valid("Email").unwrap_err();
    assert_eq!(err.code(), error_codes::INVALID_TRANSITION);
    assert!(matches!(err, ModelStateError::InvalidTransition { .. }));
}

#[test]
fn test_negative_ceiling_rejected_integration() {
    assert!(matches!(
        ModelStateOptions::from_json(r#"{"max_allowed_errors": -5}"#),
        Err(ModelStateError::Configuration { .. })
    ));
}
