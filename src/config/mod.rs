//! Configuration module for the SafeNest client.
//!
//! Provides configuration management including the API key, base URL,
//! timeouts and retry settings.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::{Host, Url};

use crate::auth::{key_hint, validate_api_key};
use crate::errors::{SafeNestError, SafeNestResult};

/// Default base URL for the SafeNest API.
pub const DEFAULT_BASE_URL: &str = "https://api.safenest.dev";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Shortest accepted request timeout.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Longest accepted request timeout.
pub const MAX_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Default maximum retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Largest accepted retry budget.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Default base delay between retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// Configuration for the SafeNest client.
#[derive(Clone)]
pub struct SafeNestConfig {
    pub(crate) api_key: SecretString,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Deadline for a single HTTP exchange.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for exponential backoff.
    pub retry_delay: Duration,
    /// Extra headers sent with every request.
    pub custom_headers: Vec<(String, String)>,
}

impl SafeNestConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> SafeNestConfigBuilder {
        SafeNestConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SAFENEST_API_KEY` (required)
    /// - `SAFENEST_BASE_URL`
    /// - `SAFENEST_TIMEOUT_MS`
    /// - `SAFENEST_MAX_RETRIES`
    /// - `SAFENEST_RETRY_DELAY_MS`
    pub fn from_env() -> SafeNestResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SafeNestResult<Self> {
        let api_key = lookup("SAFENEST_API_KEY").ok_or_else(|| {
            SafeNestError::configuration("SAFENEST_API_KEY environment variable not set")
        })?;

        let mut builder = SafeNestConfigBuilder::new().api_key(api_key);

        if let Some(base_url) = lookup("SAFENEST_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        if let Some(value) = lookup("SAFENEST_TIMEOUT_MS") {
            builder = builder.timeout(Duration::from_millis(parse_env("SAFENEST_TIMEOUT_MS", &value)?));
        }
        if let Some(value) = lookup("SAFENEST_MAX_RETRIES") {
            builder = builder.max_retries(parse_env("SAFENEST_MAX_RETRIES", &value)?);
        }
        if let Some(value) = lookup("SAFENEST_RETRY_DELAY_MS") {
            builder =
                builder.retry_delay(Duration::from_millis(parse_env("SAFENEST_RETRY_DELAY_MS", &value)?));
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> SafeNestResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SafeNestError::configuration(format!("{} has an invalid value: {:?}", name, value)))
}

impl std::fmt::Debug for SafeNestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeNestConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

/// Builder for [`SafeNestConfig`].
#[derive(Default)]
pub struct SafeNestConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
    custom_headers: Vec<(String, String)>,
}

impl SafeNestConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in milliseconds.
    pub fn timeout_ms(self, ms: u64) -> Self {
        self.timeout(Duration::from_millis(ms))
    }

    /// Sets the maximum retry attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the base retry delay.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Adds a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is missing or malformed, the
    /// base URL is not HTTPS (plain HTTP is allowed for loopback hosts), or a
    /// numeric setting is out of range.
    pub fn build(self) -> SafeNestResult<SafeNestConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| SafeNestError::configuration("API key is required"))?;
        validate_api_key(&api_key)?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        validate_base_url(&base_url)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if !(MIN_TIMEOUT..=MAX_TIMEOUT).contains(&timeout) {
            return Err(SafeNestError::configuration(format!(
                "Timeout must be between {}ms and {}ms",
                MIN_TIMEOUT.as_millis(),
                MAX_TIMEOUT.as_millis()
            )));
        }

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_RETRIES_LIMIT {
            return Err(SafeNestError::configuration(format!(
                "Max retries must be between 0 and {}",
                MAX_RETRIES_LIMIT
            )));
        }

        let retry_delay = self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY);
        if retry_delay.is_zero() {
            return Err(SafeNestError::configuration("Retry delay must be positive"));
        }

        Ok(SafeNestConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout,
            max_retries,
            retry_delay,
            custom_headers: self.custom_headers,
        })
    }
}

fn validate_base_url(base_url: &str) -> SafeNestResult<()> {
    let url = Url::parse(base_url)?;

    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };

    match url.scheme() {
        "https" => Ok(()),
        "http" if loopback => Ok(()),
        _ => Err(SafeNestError::configuration("Base URL must use HTTPS")),
    }
}
