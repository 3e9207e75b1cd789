//! Per-wrapper option schemas.
//!
//! Every wrapper (protocol) has a fixed table of allowed option keys, each
//! declaring a [`ValueKind`]. The built-in tables are assembled once per
//! process and never mutated; callers that need extra wrappers build their
//! own [`SchemaRegistry`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use reqstream_transport_traits::OptionValue;

/// HTTP methods accepted by the `method` option of http-like wrappers.
pub const HTTP_METHODS: [&str; 11] = [
    "OPTIONS", "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "TRACE", "LINK", "UNLINK",
    "CONNECT",
];

/// Declared type or constraint of an option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Native boolean only.
    Bool,
    /// Integer, or anything convertible to one without loss.
    Int,
    /// Any finite number, including numeric strings.
    Float,
    /// Strings, and finite numbers through their canonical string form.
    Str,
    /// Exactly one of the listed strings (case-sensitive).
    Enum(BTreeSet<String>),
    /// Unconstrained, apart from non-finite floats.
    Any,
}

impl ValueKind {
    /// Builds an [`ValueKind::Enum`] from a list of allowed members.
    pub fn one_of<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(members.into_iter().map(Into::into).collect())
    }

    /// Coerces `value` to this kind.
    ///
    /// Returns the normalized value, or `None` when `value` does not satisfy
    /// the kind.
    pub fn coerce(&self, value: &OptionValue) -> Option<OptionValue> {
        match self {
            Self::Any => match value {
                OptionValue::Float(f) if !f.is_finite() => None,
                _ => Some(value.clone()),
            },
            Self::Enum(members) => match value {
                OptionValue::Str(s) if members.contains(s) => Some(value.clone()),
                _ => None,
            },
            Self::Bool => value.as_bool().map(OptionValue::Bool),
            Self::Int => match value {
                OptionValue::Int(i) => Some(OptionValue::Int(*i)),
                OptionValue::Float(f) => integral(*f).map(OptionValue::Int),
                OptionValue::Str(s) => match parse_numeric(s)? {
                    Numeric::Int(i) => Some(OptionValue::Int(i)),
                    Numeric::Float(f) => integral(f).map(OptionValue::Int),
                },
                OptionValue::Bool(_) => None,
            },
            Self::Float => match value {
                OptionValue::Int(i) => Some(OptionValue::Float(*i as f64)),
                OptionValue::Float(f) => f.is_finite().then_some(OptionValue::Float(*f)),
                OptionValue::Str(s) => match parse_numeric(s)? {
                    Numeric::Int(i) => Some(OptionValue::Float(i as f64)),
                    Numeric::Float(f) => Some(OptionValue::Float(f)),
                },
                OptionValue::Bool(_) => None,
            },
            Self::Str => match value {
                OptionValue::Str(s) => Some(OptionValue::Str(s.clone())),
                OptionValue::Int(i) => Some(OptionValue::Str(i.to_string())),
                OptionValue::Float(f) => f.is_finite().then(|| OptionValue::Str(f.to_string())),
                OptionValue::Bool(_) => None,
            },
        }
    }

    /// Returns `true` when `value` satisfies this kind.
    pub fn accepts(&self, value: &OptionValue) -> bool {
        self.coerce(value).is_some()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "string"),
            Self::Any => write!(f, "mixed"),
            Self::Enum(members) => {
                let list: Vec<&str> = members.iter().map(String::as_str).collect();
                write!(f, "one of [{}]", list.join(", "))
            }
        }
    }
}

enum Numeric {
    Int(i64),
    Float(f64),
}

fn parse_numeric(s: &str) -> Option<Numeric> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Numeric::Int(i));
    }
    // f64::from_str also accepts "inf" and "NaN"
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(Numeric::Float(f)),
        _ => None,
    }
}

fn integral(f: f64) -> Option<i64> {
    // 2^63 is not representable as i64
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// The allowed option table of one wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSchema {
    name: String,
    options: BTreeMap<String, ValueKind>,
}

impl OptionSchema {
    /// Starts an empty schema for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Declares an option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, kind: ValueKind) -> Self {
        self.options.insert(key.into(), kind);
        self
    }

    /// Wrapper name this schema belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind of `key`, if the key is allowed.
    pub fn kind(&self, key: &str) -> Option<&ValueKind> {
        self.options.get(key)
    }

    /// Iterates over `(key, kind)` pairs in key order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &ValueKind)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns `true` when no option is declared.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// The wrappers known out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wrapper {
    /// HTTP and HTTPS streams.
    Http,
    /// FTP and FTPS streams.
    Ftp,
    /// TLS settings shared by `https` and `ftps`.
    Ssl,
    /// The curl-backed http-like transport.
    Curl,
    /// Phar archives.
    Phar,
    /// Raw socket settings.
    Socket,
}

impl Wrapper {
    /// Every built-in wrapper.
    pub const ALL: [Self; 6] = [
        Self::Http,
        Self::Ftp,
        Self::Ssl,
        Self::Curl,
        Self::Phar,
        Self::Socket,
    ];

    /// The wrapper name used at the string boundary.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Ftp => "ftp",
            Self::Ssl => "ssl",
            Self::Curl => "curl",
            Self::Phar => "phar",
            Self::Socket => "socket",
        }
    }

    /// Builds the built-in schema of this wrapper.
    pub fn schema(self) -> OptionSchema {
        let schema = OptionSchema::new(self.as_str());
        match self {
            Self::Http => schema
                .option("method", ValueKind::one_of(HTTP_METHODS))
                .option("header", ValueKind::Str)
                .option("user_agent", ValueKind::Str)
                .option("content", ValueKind::Str)
                .option("proxy", ValueKind::Str)
                .option("request_fulluri", ValueKind::Bool)
                .option("follow_location", ValueKind::Int)
                .option("max_redirects", ValueKind::Int)
                .option("protocol_version", ValueKind::Float)
                .option("timeout", ValueKind::Float)
                .option("ignore_errors", ValueKind::Bool),
            Self::Ftp => schema
                .option("overwrite", ValueKind::Bool)
                .option("resume_pos", ValueKind::Int)
                .option("proxy", ValueKind::Str),
            Self::Ssl => schema
                .option("verify_peer", ValueKind::Bool)
                .option("allow_self_signed", ValueKind::Bool)
                .option("cafile", ValueKind::Str)
                .option("capath", ValueKind::Str)
                .option("local_cert", ValueKind::Str)
                .option("passphrase", ValueKind::Str)
                .option("CN_match", ValueKind::Str)
                .option("verify_depth", ValueKind::Int)
                .option("ciphers", ValueKind::Str)
                .option("capture_peer_cert", ValueKind::Bool)
                .option("capture_peer_cert_chain", ValueKind::Bool)
                .option("SNI_enabled", ValueKind::Bool)
                .option("SNI_server_name", ValueKind::Str),
            Self::Curl => schema
                .option("method", ValueKind::one_of(HTTP_METHODS))
                .option("header", ValueKind::Str)
                .option("user_agent", ValueKind::Str)
                .option("content", ValueKind::Str)
                .option("proxy", ValueKind::Str)
                .option("max_redirects", ValueKind::Int)
                .option("curl_verify_ssl_host", ValueKind::Bool)
                .option("curl_verify_ssl_peer", ValueKind::Bool),
            Self::Phar => schema
                .option("compress", ValueKind::Int)
                .option("metadata", ValueKind::Any),
            Self::Socket => schema.option("bindto", ValueKind::Str),
        }
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Wrapper {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|w| w.as_str() == s).ok_or(())
    }
}

static BUILTIN: LazyLock<Arc<SchemaRegistry>> = LazyLock::new(|| {
    let mut registry = SchemaRegistry::empty();
    for wrapper in Wrapper::ALL {
        registry.register(wrapper.schema());
    }
    Arc::new(registry)
});

/// A set of wrapper schemas keyed by exact wrapper name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, OptionSchema>,
}

impl SchemaRegistry {
    /// Creates a registry with no wrappers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The process-wide registry of built-in wrappers.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// A shared pointer to the process-wide registry.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Adds or replaces a wrapper schema, returning the one it replaced.
    pub fn register(&mut self, schema: OptionSchema) -> Option<OptionSchema> {
        self.schemas.insert(schema.name.clone(), schema)
    }

    /// Looks up the schema of `wrapper`.
    pub fn schema_for(&self, wrapper: &str) -> Option<&OptionSchema> {
        self.schemas.get(wrapper)
    }

    /// Names of every registered wrapper.
    pub fn wrappers(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

/// Looks up a built-in wrapper schema.
pub fn schema_for(wrapper: &str) -> Option<&'static OptionSchema> {
    SchemaRegistry::builtin().schema_for(wrapper)
}
