//! Environment-based configuration for the Confluence connection.
//!
//! Settings are read from process environment variables once per invocation
//! and never cached across calls:
//!
//! - `CONFLUENCE_API_TOKEN` (required) - API token used as a bearer credential.
//! - `CONFLUENCE_BASE_URL` (required) - base URL of the Confluence instance.
//! - `SECLAB` (optional) - when set to `"true"`, requests go through a fixed
//!   forward proxy with TLS verification disabled. This is an operational
//!   escape hatch for one restricted network environment, not a general
//!   feature.

use std::env;
use std::fmt;

use url::Url;

/// Environment variable holding the API token.
pub const API_TOKEN_VAR: &str = "CONFLUENCE_API_TOKEN";
/// Environment variable holding the instance base URL.
pub const BASE_URL_VAR: &str = "CONFLUENCE_BASE_URL";
/// Environment marker selecting the restricted network profile.
pub const RESTRICTED_NETWORK_VAR: &str = "SECLAB";

/// Forward proxy used for both HTTP and HTTPS in the restricted environment.
pub const RESTRICTED_PROXY_URL: &str = "http://svc-proxy.cls.eng.netapp.com:3128";

/// Resolved connection settings for one fetch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfluenceSettings {
  /// API token presented as a bearer credential.
  pub api_token: String,
  /// Normalized instance base URL (scheme present, no trailing slash).
  pub base_url: String,
  /// Transport profile derived from the environment marker.
  pub network: NetworkProfile,
}

/// Transport configuration applied when building the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkProfile {
  /// No special transport configuration.
  #[default]
  Standard,
  /// Fixed forward proxy for HTTP and HTTPS, TLS verification disabled.
  Restricted,
}

/// Errors raised while resolving settings from the environment.
#[derive(Debug)]
pub enum SettingsError {
  /// `CONFLUENCE_API_TOKEN` is unset or empty.
  MissingApiToken,
  /// `CONFLUENCE_BASE_URL` is unset or empty.
  MissingBaseUrl,
}

impl fmt::Display for SettingsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingApiToken => write!(f, "{API_TOKEN_VAR} environment variable not set"),
      Self::MissingBaseUrl => write!(f, "{BASE_URL_VAR} environment variable not set"),
    }
  }
}

impl std::error::Error for SettingsError {}

impl ConfluenceSettings {
  /// Resolve settings from the process environment.
  ///
  /// # Returns
  /// Fully resolved settings when both required variables are present.
  ///
  /// # Errors
  /// Returns a [`SettingsError`] naming the first missing variable, checked
  /// in token-then-URL order.
  pub fn from_env() -> Result<Self, SettingsError> {
    let api_token = non_empty_var(API_TOKEN_VAR).ok_or(SettingsError::MissingApiToken)?;
    let base_url = non_empty_var(BASE_URL_VAR).ok_or(SettingsError::MissingBaseUrl)?;

    let network = if non_empty_var(RESTRICTED_NETWORK_VAR).as_deref() == Some("true") {
      NetworkProfile::Restricted
    } else {
      NetworkProfile::Standard
    };

    Ok(Self {
      api_token,
      base_url: normalize_base_url(&base_url),
      network,
    })
  }
}

/// Read an environment variable, treating empty values as unset.
fn non_empty_var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Normalize a base URL by adding `https://` when no scheme is present and
/// trimming any trailing slash.
fn normalize_base_url(base_url: &str) -> String {
  let trimmed = base_url.trim();

  let with_scheme = if Url::parse(trimmed).is_ok() {
    trimmed.to_string()
  } else {
    // Likely missing a scheme; retry with https:// and keep the raw value as
    // a last resort so the server gets to report the problem.
    let candidate = format!("https://{trimmed}");
    if Url::parse(&candidate).is_ok() {
      candidate
    } else {
      trimmed.to_string()
    }
  };

  with_scheme.trim_end_matches('/').to_string()
}
