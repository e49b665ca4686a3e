//! HTTP method types.

use std::str::FromStr;

use derive_more::Display;
use serde::Deserialize;

/// HTTP request method.
///
/// Deserializes case-insensitively, so both `get` (`OpenAPI` path item keys)
/// and `GET` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch,
    /// HEAD method - retrieve headers only.
    #[display("HEAD")]
    Head,
    /// OPTIONS method - retrieve allowed methods.
    #[display("OPTIONS")]
    Options,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(format!("unsupported HTTP method: {method}")),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = String;

    fn try_from(method: String) -> Result<Self, Self::Error> {
        method.parse()
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn parses_any_case() {
        check!("get".parse::<Method>() == Ok(Method::Get));
        check!("Patch".parse::<Method>() == Ok(Method::Patch));
        let_assert!(Err(message) = "TRACE".parse::<Method>());
        check!(message == "unsupported HTTP method: TRACE");
    }

    #[test]
    fn deserializes_from_json() {
        let method: Method = serde_json::from_str(r#""delete""#).expect("valid method");
        check!(method == Method::Delete);
        check!(serde_json::from_str::<Method>(r#""connect""#).is_err());
    }

    #[test]
    fn converts_to_http_method() {
        check!(http::Method::from(Method::Post) == http::Method::POST);
        check!(Method::Put.to_string() == "PUT");
    }
}
