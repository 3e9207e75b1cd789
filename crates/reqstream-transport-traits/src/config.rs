//! Primitive configuration types.

use serde::{Deserialize, Serialize};

/// Resource limits for a transport primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveConfig {
    /// Maximum number of simultaneously live handles.
    /// `None` = unlimited
    pub max_handles: Option<usize>,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            max_handles: Some(1024),
        }
    }
}

impl PrimitiveConfig {
    /// Create a configuration with no limits.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self { max_handles: None }
    }

    /// Create a configuration with a small handle budget.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_handles: Some(16),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_config_default() {
        let config = PrimitiveConfig::default();
        assert_eq!(config.max_handles, Some(1024));
    }

    #[test]
    fn test_primitive_config_presets() {
        assert_eq!(PrimitiveConfig::unlimited().max_handles, None);
        assert_eq!(PrimitiveConfig::strict().max_handles, Some(16));
    }

    #[test]
    fn test_primitive_config_from_json() {
        let config: PrimitiveConfig = serde_json::from_str(r#"{"max_handles": 2}"#).unwrap();
        assert_eq!(config.max_handles, Some(2));
    }
}
