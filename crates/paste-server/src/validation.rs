use crate::error::AppError;
use serde_json::Value;

/// Check that a request body is a saved query: an object with a string
/// `query` and a `data` field of any type.
pub fn validate_saved_query(body: &Value) -> Result<(), AppError> {
    let object = match body {
        Value::Null => {
            return Err(AppError::BadRequest(
                "Request body cannot be empty.".to_string(),
            ))
        }
        Value::Object(object) => object,
        _ => {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object.".to_string(),
            ))
        }
    };

    let mut errors = Vec::new();
    match object.get("query") {
        None => errors.push("query: Missing data for required field."),
        Some(Value::String(_)) => {}
        Some(_) => errors.push("query: Not a valid string."),
    }
    if !object.contains_key("data") {
        errors.push("data: Missing data for required field.");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(errors.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_saved_query() {
        assert!(validate_saved_query(&json!({"query": "foo", "data": {"foo": "bar"}})).is_ok());
        // data can be anything, including null
        assert!(validate_saved_query(&json!({"query": "foo", "data": null})).is_ok());
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(
            message(validate_saved_query(&Value::Null)),
            "Request body cannot be empty."
        );
    }

    #[test]
    fn test_non_object_body() {
        assert!(message(validate_saved_query(&json!([1, 2]))).contains("JSON object"));
    }

    #[test]
    fn test_missing_fields() {
        let msg = message(validate_saved_query(&json!({})));
        assert!(msg.contains("query"));
        assert!(msg.contains("data"));
    }

    #[test]
    fn test_query_must_be_string() {
        let msg = message(validate_saved_query(&json!({"query": 5, "data": 1})));
        assert_eq!(msg, "query: Not a valid string.");
    }
}
