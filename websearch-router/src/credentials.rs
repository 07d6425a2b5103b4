//! Credential validation for provider attempts.
//!
//! Hosted providers need an API key; SearXNG needs the URL of a
//! self-hosted instance. Both are resolved from [`RouterConfig`] (which
//! already carries any environment fallback) and validated before a
//! provider is considered available or attempted.

use std::fmt;

use url::Url;

use crate::config::RouterConfig;
use crate::error::SearchError;
use crate::types::Provider;

/// Keys shorter than this are rejected without contacting the provider.
pub const MIN_API_KEY_LEN: usize = 10;

/// A validated provider credential.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Secret API key for a hosted provider.
    ApiKey(String),
    /// Base URL of a self-hosted instance.
    InstanceUrl(String),
}

impl Credential {
    /// The raw credential value.
    pub fn expose(&self) -> &str {
        match self {
            Self::ApiKey(key) => key,
            Self::InstanceUrl(url) => url,
        }
    }
}

// Keys never reach logs or debug output.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::InstanceUrl(url) => f.debug_tuple("InstanceUrl").field(url).finish(),
        }
    }
}

/// Validate a raw credential value for `provider`.
///
/// # Errors
///
/// Returns [`SearchError::Credential`] if the value is missing, an API key
/// is shorter than [`MIN_API_KEY_LEN`], or an instance URL is not an
/// absolute `http`/`https` URL.
pub fn validate(provider: Provider, raw: Option<&str>) -> Result<Credential, SearchError> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty());

    if provider.is_self_hosted() {
        let Some(url) = value else {
            return Err(credential_error(
                provider,
                format!(
                    "missing instance URL; set up an instance ({}), then set `instance_url` \
                     under [{provider}] or export {}",
                    provider.signup_url(),
                    provider.env_var()
                ),
            ));
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(credential_error(
                provider,
                format!("instance URL must start with http:// or https:// (got {url})"),
            ));
        }
        Url::parse(url).map_err(|e| {
            credential_error(provider, format!("instance URL is malformed: {e}"))
        })?;
        return Ok(Credential::InstanceUrl(url.to_string()));
    }

    let Some(key) = value else {
        return Err(credential_error(
            provider,
            format!(
                "missing API key; get one at {}, then set `api_key` under [{provider}] or export {}",
                provider.signup_url(),
                provider.env_var()
            ),
        ));
    };
    if key.chars().count() < MIN_API_KEY_LEN {
        return Err(credential_error(
            provider,
            "API key appears invalid (too short)".into(),
        ));
    }
    Ok(Credential::ApiKey(key.to_string()))
}

/// Resolve and validate the credential for `provider` from `config`.
///
/// # Errors
///
/// Same as [`validate`].
pub fn resolve(config: &RouterConfig, provider: Provider) -> Result<Credential, SearchError> {
    validate(provider, config.credential(provider))
}

/// A provider is available when it is not disabled and has a valid credential.
pub fn is_available(config: &RouterConfig, provider: Provider) -> bool {
    !config.is_disabled(provider) && resolve(config, provider).is_ok()
}

fn credential_error(provider: Provider, message: String) -> SearchError {
    SearchError::Credential { provider, message }
}
