//! Security scheme injection.
//!
//! Honors the first scheme, in requirement order, that has a non-empty
//! configured credential. Combinations of schemes (`OpenAPI` AND/OR
//! semantics) are not applied.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use serde::Deserialize;

/// Where an API key is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiKeyLocation {
    /// Request header.
    Header,
    /// Query parameter.
    Query,
    /// Cookie entry.
    Cookie,
}

/// HTTP authentication scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpAuthScheme {
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// `Authorization: Basic <base64(user:pass)>`.
    Basic,
}

/// A declared security scheme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SecurityScheme {
    /// API key in a header, query parameter or cookie.
    ApiKey {
        /// Header, parameter or cookie name.
        name: String,
        /// Where the key is sent.
        #[serde(rename = "in")]
        location: ApiKeyLocation,
    },
    /// HTTP authentication.
    Http {
        /// Authentication scheme.
        scheme: HttpAuthScheme,
        /// Header carrying the credential, `Authorization` when unset.
        #[serde(default)]
        header: Option<String>,
    },
    /// OAuth 2 access token, sent as a bearer token.
    #[serde(rename = "oauth2")]
    OAuth2,
    /// OpenID Connect token, sent as a bearer token.
    OpenIdConnect,
}

/// A configured credential.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Credential {
    /// API key or token.
    Token(String),
    /// Username and password.
    Basic {
        /// Username.
        username: String,
        /// Password.
        #[serde(default)]
        password: String,
    },
}

impl Credential {
    /// Token credential.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Basic credential.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` if nothing was configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Token(token) => token.is_empty(),
            Self::Basic { username, .. } => username.is_empty(),
        }
    }
}

/// `OpenAPI` security requirement: scheme names (with their scopes), in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecurityRequirement(IndexMap<String, Vec<String>>);

impl SecurityRequirement {
    /// Requirement on a single scheme.
    #[must_use]
    pub fn scheme(name: impl Into<String>) -> Self {
        Self::default().and(name)
    }

    /// Add a scheme.
    #[must_use]
    pub fn and(mut self, name: impl Into<String>) -> Self {
        self.0.insert(name.into(), Vec::new());
        self
    }

    /// Scheme names, in declaration order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Where a credential lands in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Header set, replacing any previous value.
    Header {
        /// Header name.
        name: String,
        /// Header value.
        value: String,
    },
    /// Query parameter appended.
    Query {
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: String,
    },
    /// Cookie entry appended.
    Cookie {
        /// Cookie name.
        name: String,
        /// Cookie value.
        value: String,
    },
}

impl SecurityScheme {
    /// Injection of a credential, or `None` if the credential kind does not
    /// fit the scheme.
    #[must_use]
    pub fn injection(&self, credential: &Credential) -> Option<Injection> {
        match (self, credential) {
            (Self::ApiKey { name, location }, Credential::Token(token)) => {
                let (name, value) = (name.clone(), token.clone());
                Some(match location {
                    ApiKeyLocation::Header => Injection::Header { name, value },
                    ApiKeyLocation::Query => Injection::Query { name, value },
                    ApiKeyLocation::Cookie => Injection::Cookie { name, value },
                })
            }
            (
                Self::Http {
                    scheme: HttpAuthScheme::Bearer,
                    header,
                },
                Credential::Token(token),
            ) => Some(authorization(header.as_deref(), format!("Bearer {token}"))),
            (
                Self::Http {
                    scheme: HttpAuthScheme::Basic,
                    header,
                },
                credential,
            ) => {
                let encoded = match credential {
                    Credential::Token(token) => token.clone(),
                    Credential::Basic { username, password } => {
                        STANDARD.encode(format!("{username}:{password}"))
                    }
                };
                Some(authorization(header.as_deref(), format!("Basic {encoded}")))
            }
            (Self::OAuth2 | Self::OpenIdConnect, Credential::Token(token)) => {
                Some(authorization(None, format!("Bearer {token}")))
            }
            _ => None,
        }
    }
}

fn authorization(header: Option<&str>, value: String) -> Injection {
    Injection::Header {
        name: header.unwrap_or("Authorization").to_string(),
        value,
    }
}

/// Pick the credential injection for a list of requirements.
///
/// Returns the name of the honored scheme with its injection.
#[must_use]
pub fn resolve_injection<'a>(
    requirements: &'a [SecurityRequirement],
    schemes: &IndexMap<String, SecurityScheme>,
    credentials: &HashMap<String, Credential>,
) -> Option<(&'a str, Injection)> {
    requirements
        .iter()
        .flat_map(SecurityRequirement::schemes)
        .find_map(|name| {
            let scheme = schemes.get(name)?;
            let credential = credentials.get(name).filter(|credential| !credential.is_empty())?;
            scheme.injection(credential).map(|injection| (name, injection))
        })
}
