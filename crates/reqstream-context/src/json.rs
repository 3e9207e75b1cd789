//! Untyped option documents.
//!
//! Options often arrive as JSON. These helpers only check the document
//! shape; schema validation happens when the result is merged into a
//! [`TransportContext`](crate::TransportContext).

use serde_json::Value;

use reqstream_transport_traits::{OptionSet, OptionValue, Params, WrapperOptions};

use crate::error::{ContextError, ContextResult};

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Converts a `{wrapper: {key: scalar}}` document into an [`OptionSet`].
///
/// # Errors
///
/// [`ContextError::InvalidArgument`] when the root or a wrapper entry is
/// not an object, or an option value is not a scalar.
pub fn options_from_json(document: &Value) -> ContextResult<OptionSet> {
    let Value::Object(wrappers) = document else {
        return Err(ContextError::invalid_argument(format!(
            "Options must be an object keyed by wrapper name, {} given",
            json_type(document)
        )));
    };

    let mut set = OptionSet::new();
    for (wrapper, entry) in wrappers {
        set.merge_wrapper(wrapper.clone(), wrapper_from_json(wrapper, entry)?);
    }
    Ok(set)
}

/// Converts a `{key: scalar}` document for a single wrapper.
///
/// # Errors
///
/// [`ContextError::InvalidArgument`] when `document` is not an object or
/// holds a non-scalar value.
pub fn wrapper_from_json(wrapper: &str, document: &Value) -> ContextResult<WrapperOptions> {
    let Value::Object(entries) = document else {
        return Err(ContextError::invalid_argument(format!(
            "Wrapper options must be an object, {} given for {wrapper}",
            json_type(document)
        )));
    };

    entries
        .iter()
        .map(|(key, value)| {
            OptionValue::from_json(value)
                .map(|v| (key.clone(), v))
                .ok_or_else(|| {
                    ContextError::invalid_argument(format!(
                        "Option {wrapper}.{key} must be a scalar, {} given",
                        json_type(value)
                    ))
                })
        })
        .collect()
}

/// Converts a params object. Values are passed through untouched.
///
/// # Errors
///
/// [`ContextError::InvalidArgument`] when `document` is not an object.
pub fn params_from_json(document: &Value) -> ContextResult<Params> {
    match document {
        Value::Object(entries) => Ok(entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()),
        other => Err(ContextError::invalid_argument(format!(
            "Params must be an object, {} given",
            json_type(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_from_json() {
        let set = options_from_json(&json!({
            "http": {"method": "POST", "timeout": 2.5},
            "ssl": {"verify_peer": false}
        }))
        .unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.get("http", "timeout"), Some(&OptionValue::Float(2.5)));
        assert_eq!(set.get("ssl", "verify_peer"), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_non_object_root() {
        let err = options_from_json(&json!(["http"])).unwrap_err();
        assert!(matches!(err, ContextError::InvalidArgument(ref m) if m.contains("array given")));
    }

    #[test]
    fn test_non_object_wrapper() {
        let err = options_from_json(&json!({"http": "GET"})).unwrap_err();
        assert!(
            matches!(err, ContextError::InvalidArgument(ref m) if m.contains("string given for http"))
        );
    }

    #[test]
    fn test_non_scalar_value() {
        let err = options_from_json(&json!({"http": {"header": ["a", "b"]}})).unwrap_err();
        assert!(matches!(err, ContextError::InvalidArgument(ref m) if m.contains("http.header")));
    }

    #[test]
    fn test_params_pass_through() {
        let params = params_from_json(&json!({"notification": {"level": 2}})).unwrap();
        assert_eq!(params["notification"], json!({"level": 2}));
        assert!(params_from_json(&json!(null)).is_err());
    }
}
