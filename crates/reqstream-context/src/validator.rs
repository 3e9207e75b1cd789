//! Option validation against wrapper schemas.

use reqstream_transport_traits::{OptionSet, WrapperOptions};

use crate::error::ValidationError;
use crate::schema::SchemaRegistry;

/// Validates option maps against a [`SchemaRegistry`].
///
/// Validation is pure: the validator holds no mutable state and can be
/// shared freely between threads. It stops at the first failure, and keys
/// are visited in sorted order so the reported failure is deterministic.
#[derive(Debug, Clone, Copy)]
pub struct OptionValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl Default for OptionValidator<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> OptionValidator<'a> {
    /// Creates a validator over `registry`.
    pub const fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The registry this validator checks against.
    pub const fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    /// Checks every option of `protocol` without keeping the coerced values.
    pub fn validate(&self, protocol: &str, options: &WrapperOptions) -> Result<(), ValidationError> {
        self.normalize(protocol, options).map(drop)
    }

    /// Checks every option of `protocol` and returns them coerced to their
    /// declared kinds (`"3"` for an integer key becomes `3`).
    pub fn normalize(
        &self,
        protocol: &str,
        options: &WrapperOptions,
    ) -> Result<WrapperOptions, ValidationError> {
        let schema =
            self.registry
                .schema_for(protocol)
                .ok_or_else(|| ValidationError::UnknownProtocol {
                    protocol: protocol.to_string(),
                })?;

        options
            .iter()
            .map(|(key, value)| {
                let kind = schema
                    .kind(key)
                    .ok_or_else(|| ValidationError::UnknownOption {
                        protocol: protocol.to_string(),
                        key: key.clone(),
                    })?;
                let normalized =
                    kind.coerce(value)
                        .ok_or_else(|| ValidationError::InvalidValue {
                            protocol: protocol.to_string(),
                            key: key.clone(),
                            expected: kind.clone(),
                            actual: value.clone(),
                        })?;
                Ok((key.clone(), normalized))
            })
            .collect()
    }

    /// Normalizes every wrapper of a batch. Nothing is returned unless the
    /// whole batch is valid.
    pub fn normalize_set(&self, options: &OptionSet) -> Result<OptionSet, ValidationError> {
        options
            .iter()
            .map(|(protocol, wrapper_options)| {
                self.normalize(protocol, wrapper_options)
                    .map(|normalized| (protocol.clone(), normalized))
            })
            .collect()
    }
}

impl OptionValidator<'static> {
    /// A validator over the built-in wrappers.
    pub fn builtin() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

/// Validates `options` for `protocol` against the built-in wrappers.
pub fn validate(protocol: &str, options: &WrapperOptions) -> Result<(), ValidationError> {
    OptionValidator::builtin().validate(protocol, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqstream_transport_traits::OptionValue;

    use crate::schema::{OptionSchema, ValueKind};

    fn opts<const N: usize>(pairs: [(&str, OptionValue); N]) -> WrapperOptions {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_unknown_protocol_checked_before_keys() {
        let err = validate("gopher", &opts([("bogus", "x".into())])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownProtocol {
                protocol: "gopher".to_string()
            }
        );
    }

    #[test]
    fn test_empty_options_pass_for_known_protocol() {
        assert!(validate("socket", &WrapperOptions::new()).is_ok());
    }

    #[test]
    fn test_first_failure_in_key_order() {
        let err = validate(
            "http",
            &opts([("timeout", "slow".into()), ("max_redirects", "many".into())]),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref key, .. } if key == "max_redirects"));
    }

    #[test]
    fn test_normalize_coerces_values() {
        let normalized = OptionValidator::builtin()
            .normalize(
                "ssl",
                &opts([("verify_peer", true.into()), ("verify_depth", "3".into())]),
            )
            .unwrap();
        assert_eq!(
            normalized,
            opts([("verify_depth", OptionValue::Int(3)), ("verify_peer", true.into())])
        );
    }

    #[test]
    fn test_normalize_set_is_all_or_nothing() {
        let mut batch = OptionSet::new();
        batch.insert("http", "method", "GET");
        batch.insert("ftp", "overwrite", "yes");

        let err = OptionValidator::builtin().normalize_set(&batch).unwrap_err();
        assert_eq!(err.protocol(), "ftp");
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = SchemaRegistry::empty();
        registry.register(OptionSchema::new("gopher").option("selector", ValueKind::Str));
        let validator = OptionValidator::new(&registry);

        assert!(validator.validate("gopher", &opts([("selector", "/".into())])).is_ok());
        assert!(matches!(
            validator.validate("http", &WrapperOptions::new()),
            Err(ValidationError::UnknownProtocol { .. })
        ));
    }
}
