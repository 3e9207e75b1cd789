//! Validation scenarios for the built-in wrappers.

use pretty_assertions::assert_eq;
use reqstream_context::{
    HTTP_METHODS, OptionValidator, OptionValue, ValidationError, ValueKind, WrapperOptions,
    schema_for, validate,
};

fn opts<const N: usize>(pairs: [(&str, OptionValue); N]) -> WrapperOptions {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn test_http_method_post_accepted() {
    assert_eq!(validate("http", &opts([("method", "POST".into())])), Ok(()));
}

#[test]
fn test_http_method_teapot_rejected() {
    let err = validate("http", &opts([("method", "TEAPOT".into())])).unwrap_err();
    match err {
        ValidationError::InvalidValue {
            protocol,
            key,
            expected,
            actual,
        } => {
            assert_eq!(protocol, "http");
            assert_eq!(key, "method");
            assert_eq!(expected, ValueKind::one_of(HTTP_METHODS));
            assert_eq!(actual, OptionValue::from("TEAPOT"));
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn test_http_bogus_key_rejected() {
    assert_eq!(
        validate("http", &opts([("bogus_key", "x".into())])),
        Err(ValidationError::UnknownOption {
            protocol: "http".to_string(),
            key: "bogus_key".to_string(),
        })
    );
}

#[test]
fn test_unknown_protocol_rejected() {
    assert_eq!(
        validate("gopher", &WrapperOptions::new()),
        Err(ValidationError::UnknownProtocol {
            protocol: "gopher".to_string()
        })
    );
}

#[test]
fn test_ssl_numeric_string_depth_accepted() {
    assert_eq!(
        validate(
            "ssl",
            &opts([("verify_peer", true.into()), ("verify_depth", "3".into())])
        ),
        Ok(())
    );
}

#[test]
fn test_http_full_option_table() {
    let options = opts([
        ("method", "PUT".into()),
        ("header", "Accept: */*\r\nX-Trace: 1".into()),
        ("user_agent", "reqstream/0.1".into()),
        ("content", "payload".into()),
        ("proxy", "tcp://proxy.local:3128".into()),
        ("request_fulluri", true.into()),
        ("follow_location", 1.into()),
        ("max_redirects", "20".into()),
        ("protocol_version", "1.1".into()),
        ("timeout", 30.into()),
        ("ignore_errors", false.into()),
    ]);
    let normalized = OptionValidator::builtin()
        .normalize("http", &options)
        .unwrap();

    assert_eq!(normalized["max_redirects"], OptionValue::Int(20));
    assert_eq!(normalized["protocol_version"], OptionValue::Float(1.1));
    assert_eq!(normalized["timeout"], OptionValue::Float(30.0));
}

#[test]
fn test_ftp_and_socket_tables() {
    assert!(
        validate(
            "ftp",
            &opts([
                ("overwrite", true.into()),
                ("resume_pos", "1024".into()),
                ("proxy", "tcp://proxy:21".into()),
            ])
        )
        .is_ok()
    );
    assert!(validate("socket", &opts([("bindto", "0.0.0.0:0".into())])).is_ok());
    assert!(validate("socket", &opts([("bindto", false.into())])).is_err());
}

#[test]
fn test_curl_table() {
    assert!(
        validate(
            "curl",
            &opts([
                ("method", "DELETE".into()),
                ("max_redirects", 3.into()),
                ("curl_verify_ssl_host", true.into()),
                ("curl_verify_ssl_peer", false.into()),
            ])
        )
        .is_ok()
    );
    assert!(matches!(
        validate("curl", &opts([("timeout", 1.into())])),
        Err(ValidationError::UnknownOption { .. })
    ));
}

#[test]
fn test_phar_metadata_is_unconstrained() {
    assert!(validate("phar", &opts([("metadata", true.into())])).is_ok());
    assert!(validate("phar", &opts([("metadata", "blob".into())])).is_ok());
    assert!(validate("phar", &opts([("compress", "2.5".into())])).is_err());
}

#[test]
fn test_integer_keys_reject_fractions() {
    let err = validate("http", &opts([("max_redirects", "2.5".into())])).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { expected: ValueKind::Int, .. }));
}

#[test]
fn test_float_keys_accept_numeric_strings() {
    assert!(validate("http", &opts([("timeout", "2.0".into())])).is_ok());
    assert!(validate("http", &opts([("timeout", "soon".into())])).is_err());
}

#[test]
fn test_non_finite_floats_rejected_for_every_kind() {
    let infinite = validate("http", &opts([("timeout", f64::INFINITY.into())])).unwrap_err();
    assert!(matches!(infinite, ValidationError::InvalidValue { expected: ValueKind::Float, .. }));

    let nan = validate("ssl", &opts([("cafile", f64::NAN.into())])).unwrap_err();
    assert!(matches!(nan, ValidationError::InvalidValue { expected: ValueKind::Str, .. }));

    assert!(validate("phar", &opts([("metadata", f64::NAN.into())])).is_err());
}

#[test]
fn test_string_keys_reject_booleans() {
    let err = validate("ssl", &opts([("cafile", true.into())])).unwrap_err();
    assert!(err.to_string().contains("This key must be string"));
}

#[test]
fn test_ssl_table_is_exact() {
    let ssl = schema_for("ssl").unwrap();
    let keys: Vec<&str> = ssl.options().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![
            "CN_match",
            "SNI_enabled",
            "SNI_server_name",
            "allow_self_signed",
            "cafile",
            "capath",
            "capture_peer_cert",
            "capture_peer_cert_chain",
            "ciphers",
            "local_cert",
            "passphrase",
            "verify_depth",
            "verify_peer",
        ]
    );
}
