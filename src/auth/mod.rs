//! Authentication for the SafeNest client.
//!
//! SafeNest uses bearer API keys. The key is held as a [`SecretString`] and
//! only exposed when the `Authorization` header is written.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::{SafeNestError, SafeNestResult};

/// Minimum accepted API key length.
pub const MIN_API_KEY_LENGTH: usize = 10;

/// Authentication provider trait.
///
/// Implementations write credentials into the headers of every request.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Get the authentication scheme name.
    fn scheme(&self) -> &str;

    /// Validate the credentials.
    fn validate(&self) -> SafeNestResult<()>;
}

/// API key authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self { api_key }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self::new(SecretString::new(api_key.into()))
    }

    /// Last four characters of the key, for logs.
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) -> SafeNestResult<()> {
        validate_api_key(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}

/// Checks that a key is present and plausibly formed.
pub(crate) fn validate_api_key(key: &str) -> SafeNestResult<()> {
    if key.trim().is_empty() {
        return Err(SafeNestError::configuration("API key is required"));
    }
    if key.chars().count() < MIN_API_KEY_LENGTH {
        return Err(SafeNestError::configuration("API key appears to be invalid"));
    }
    Ok(())
}

pub(crate) fn key_hint(key: &str) -> String {
    let len = key.chars().count();
    if len > 4 {
        let tail: String = key.chars().skip(len - 4).collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}
