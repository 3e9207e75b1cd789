//! HTTP methods.

use std::fmt;
use std::str::FromStr;

use crate::error::{HttpError, HttpResult};

/// The methods the `http` wrapper accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// `OPTIONS`
    Options,
    /// `GET`
    #[default]
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
    /// `TRACE`
    Trace,
    /// `LINK`
    Link,
    /// `UNLINK`
    Unlink,
    /// `CONNECT`
    Connect,
}

impl Method {
    /// Every supported method.
    pub const ALL: [Self; 11] = [
        Self::Options,
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Trace,
        Self::Link,
        Self::Unlink,
        Self::Connect,
    ];

    /// The method token as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
            Self::Link => "LINK",
            Self::Unlink => "UNLINK",
            Self::Connect => "CONNECT",
        }
    }

    /// Converts to the client library's method type.
    pub fn to_reqwest(self) -> HttpResult<reqwest::Method> {
        reqwest::Method::from_bytes(self.as_str().as_bytes())
            .map_err(|e| HttpError::InvalidMethod(e.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| HttpError::InvalidMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqstream_context::HTTP_METHODS;

    #[test]
    fn test_methods_match_wrapper_schema() {
        let names: Vec<&str> = Method::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, HTTP_METHODS.to_vec());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert!("patch".parse::<Method>().is_err());
        assert!("TEAPOT".parse::<Method>().is_err());
    }

    #[test]
    fn test_extension_methods_convert() {
        assert_eq!(Method::Link.to_reqwest().unwrap().as_str(), "LINK");
        assert_eq!(Method::Get.to_reqwest().unwrap(), reqwest::Method::GET);
    }
}
