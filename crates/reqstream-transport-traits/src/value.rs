//! Option values and option sets.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically-typed scalar supplied as the value of a context option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
}

impl OptionValue {
    /// Name of the native kind carried by this value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// Returns the boolean if this is a [`OptionValue::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`OptionValue::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is numeric.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string slice if this is a [`OptionValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON scalar into an option value.
    ///
    /// Returns `None` for `null`, arrays and objects.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            serde_json::Value::String(s) => Some(Self::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Options for a single wrapper, keyed by option name.
pub type WrapperOptions = BTreeMap<String, OptionValue>;

/// Transport-level parameters. These are never validated against a schema.
pub type Params = BTreeMap<String, serde_json::Value>;

/// Options for every wrapper, keyed by wrapper (protocol) name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    wrappers: BTreeMap<String, WrapperOptions>,
}

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a single option.
    pub fn get(&self, wrapper: &str, key: &str) -> Option<&OptionValue> {
        self.wrappers.get(wrapper).and_then(|opts| opts.get(key))
    }

    /// Returns every option set for `wrapper`.
    pub fn wrapper(&self, wrapper: &str) -> Option<&WrapperOptions> {
        self.wrappers.get(wrapper)
    }

    /// Sets a single option, replacing any previous value.
    pub fn insert(
        &mut self,
        wrapper: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.wrappers
            .entry(wrapper.into())
            .or_default()
            .insert(key.into(), value.into())
    }

    /// Merges `options` into the options of `wrapper`; later values win.
    pub fn merge_wrapper(&mut self, wrapper: impl Into<String>, options: WrapperOptions) {
        self.wrappers.entry(wrapper.into()).or_default().extend(options);
    }

    /// Merges another option set into this one; later values win.
    pub fn merge(&mut self, other: Self) {
        for (wrapper, options) in other.wrappers {
            self.merge_wrapper(wrapper, options);
        }
    }

    /// Iterates over `(wrapper, options)` pairs in wrapper name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, WrapperOptions> {
        self.wrappers.iter()
    }

    /// Names of the wrappers that carry at least one entry.
    pub fn wrappers(&self) -> impl Iterator<Item = &str> {
        self.wrappers.keys().map(String::as_str)
    }

    /// Returns `true` when no wrapper has been configured.
    pub fn is_empty(&self) -> bool {
        self.wrappers.values().all(BTreeMap::is_empty)
    }

    /// Total number of options across all wrappers.
    pub fn len(&self) -> usize {
        self.wrappers.values().map(BTreeMap::len).sum()
    }
}

impl FromIterator<(String, WrapperOptions)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (String, WrapperOptions)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (wrapper, options) in iter {
            set.merge_wrapper(wrapper, options);
        }
        set
    }
}

impl IntoIterator for OptionSet {
    type Item = (String, WrapperOptions);
    type IntoIter = btree_map::IntoIter<String, WrapperOptions>;

    fn into_iter(self) -> Self::IntoIter {
        self.wrappers.into_iter()
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = (&'a String, &'a WrapperOptions);
    type IntoIter = btree_map::Iter<'a, String, WrapperOptions>;

    fn into_iter(self) -> Self::IntoIter {
        self.wrappers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_option_value_from_json_scalars() {
        assert_eq!(
            OptionValue::from_json(&serde_json::json!(true)),
            Some(OptionValue::Bool(true))
        );
        assert_eq!(
            OptionValue::from_json(&serde_json::json!(3)),
            Some(OptionValue::Int(3))
        );
        assert_eq!(
            OptionValue::from_json(&serde_json::json!(2.5)),
            Some(OptionValue::Float(2.5))
        );
        assert_eq!(
            OptionValue::from_json(&serde_json::json!("GET")),
            Some(OptionValue::Str("GET".to_string()))
        );
    }

    #[test]
    fn test_option_value_from_json_rejects_composites() {
        assert_eq!(OptionValue::from_json(&serde_json::Value::Null), None);
        assert_eq!(OptionValue::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(OptionValue::from_json(&serde_json::json!({"a": 1})), None);
    }

    #[test]
    fn test_option_set_later_insert_wins() {
        let mut set = OptionSet::new();
        set.insert("http", "method", "GET");
        let previous = set.insert("http", "method", "POST");

        assert_eq!(previous, Some(OptionValue::from("GET")));
        assert_eq!(set.get("http", "method"), Some(&OptionValue::from("POST")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_option_set_merge_keeps_other_keys() {
        let mut base = OptionSet::new();
        base.insert("http", "method", "GET");
        base.insert("ssl", "verify_peer", true);

        let mut update = OptionSet::new();
        update.insert("http", "timeout", 2.5);
        update.insert("http", "method", "PUT");
        base.merge(update);

        assert_eq!(base.get("http", "method"), Some(&OptionValue::from("PUT")));
        assert_eq!(base.get("http", "timeout"), Some(&OptionValue::Float(2.5)));
        assert_eq!(base.get("ssl", "verify_peer"), Some(&OptionValue::Bool(true)));
        assert_eq!(base.wrappers().collect::<Vec<_>>(), vec!["http", "ssl"]);
    }

    #[test]
    fn test_option_set_serde_shape() {
        let mut set = OptionSet::new();
        set.insert("http", "max_redirects", 5);
        set.insert("http", "user_agent", "reqstream");

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"http": {"max_redirects": 5, "user_agent": "reqstream"}})
        );

        let back: OptionSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
