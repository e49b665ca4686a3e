//! Server settings: base URL, static headers, security and request defaults.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::security::{Credential, SecurityRequirement, SecurityScheme};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between retry attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Default statuses that trigger a retry.
pub const DEFAULT_RETRY_STATUS: [u16; 4] = [429, 500, 502, 503];

/// Deserialize an optional duration given in seconds.
pub(crate) fn seconds<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|duration| !duration.is_zero()))
}

fn seconds_or_zero<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(seconds(deserializer)?.unwrap_or_default())
}

/// Retry policy of a request.
///
/// Zero and empty fields are unset and fall back to the next level when
/// policies are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub times: u32,
    /// Delay between attempts (seconds in JSON).
    #[serde(deserialize_with = "seconds_or_zero")]
    pub delay: Duration,
    /// Response statuses that trigger a retry.
    pub http_status: Vec<u16>,
}

impl RetryPolicy {
    /// Global default: no retries, 1 s delay, retry on 429/500/502/503.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            times: 0,
            delay: DEFAULT_RETRY_DELAY,
            http_status: DEFAULT_RETRY_STATUS.to_vec(),
        }
    }

    /// Set the number of retries.
    #[must_use]
    pub fn with_times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// Set the delay between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the statuses that trigger a retry.
    #[must_use]
    pub fn with_http_status(mut self, http_status: impl Into<Vec<u16>>) -> Self {
        self.http_status = http_status.into();
        self
    }

    /// Fill every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            times: if self.times == 0 {
                fallback.times
            } else {
                self.times
            },
            delay: if self.delay.is_zero() {
                fallback.delay
            } else {
                self.delay
            },
            http_status: if self.http_status.is_empty() {
                fallback.http_status.clone()
            } else {
                self.http_status
            },
        }
    }

    /// Returns `true` if a response with this status should be retried.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        self.http_status.contains(&status)
    }
}

/// Settings of one remote server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Base URL prefixed to every operation path.
    pub base_url: String,
    /// Headers sent with every request.
    pub headers: IndexMap<String, String>,
    /// Declared security schemes, by name.
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Configured credentials, by scheme name.
    pub credentials: HashMap<String, Credential>,
    /// Security used by operations that declare none.
    pub security: Vec<SecurityRequirement>,
    /// Server timeout (seconds in JSON).
    #[serde(deserialize_with = "seconds")]
    pub timeout: Option<Duration>,
    /// Server retry policy.
    pub retry: Option<RetryPolicy>,
    /// Process-wide fallback.
    pub global: GlobalDefaults,
}

/// Last level of timeout and retry resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalDefaults {
    /// Timeout used when neither the operation nor the server set one.
    #[serde(deserialize_with = "seconds_or_zero")]
    pub timeout: Duration,
    /// Retry policy filling the fields left unset.
    pub retry: RetryPolicy,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::standard(),
        }
    }
}

impl Settings {
    /// Create a new settings builder.
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Resolve the timeout: operation, then server, then global; the first
    /// non-zero value wins.
    #[must_use]
    pub fn resolve_timeout(&self, operation: Option<Duration>) -> Duration {
        [operation, self.timeout, Some(self.global.timeout)]
            .into_iter()
            .flatten()
            .find(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Resolve the retry policy field by field: operation, then server, then
    /// global.
    #[must_use]
    pub fn resolve_retry(&self, operation: Option<&RetryPolicy>) -> RetryPolicy {
        let server = self.retry.clone().unwrap_or_default().or(&self.global.retry);
        operation.cloned().unwrap_or_default().or(&server)
    }
}

/// Builder for [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    /// Add a static header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.headers.insert(name.into(), value.into());
        self
    }

    /// Declare a security scheme.
    #[must_use]
    pub fn security_scheme(mut self, name: impl Into<String>, scheme: SecurityScheme) -> Self {
        self.settings.security_schemes.insert(name.into(), scheme);
        self
    }

    /// Configure the credential of a security scheme.
    #[must_use]
    pub fn credential(mut self, scheme: impl Into<String>, credential: Credential) -> Self {
        self.settings.credentials.insert(scheme.into(), credential);
        self
    }

    /// Add a default security requirement.
    #[must_use]
    pub fn security(mut self, requirement: SecurityRequirement) -> Self {
        self.settings.security.push(requirement);
        self
    }

    /// Set the server timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    /// Set the server retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.settings.retry = Some(retry);
        self
    }

    /// Set the global fallback.
    #[must_use]
    pub fn global(mut self, global: GlobalDefaults) -> Self {
        self.settings.global = global;
        self
    }

    /// Build the settings.
    #[must_use]
    pub fn build(self) -> Settings {
        self.settings
    }
}
