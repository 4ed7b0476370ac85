//! API session: who is calling, for which network, through which transport

use crate::credentials::OAuth2Credential;
use crate::transport::Transport;
use dfp_core::{ApiVersion, Config, Error, Result};
use governor::{
  clock::DefaultClock,
  middleware::NoOpMiddleware,
  state::{InMemoryState, NotKeyed},
  Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::info;

/// Rate limiter shared by every service obtained from one session
pub type SessionRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// An authenticated session against one network
///
/// Cloning is cheap; clones share the HTTP client and the rate limiter.
#[derive(Clone)]
pub struct DfpSession {
  network_code: String,
  application_name: String,
  default_version: ApiVersion,
  max_retries: u32,
  transport: Arc<Transport>,
  rate_limiter: Arc<SessionRateLimiter>,
}

impl DfpSession {
  pub fn network_code(&self) -> &str {
    &self.network_code
  }

  pub fn application_name(&self) -> &str {
    &self.application_name
  }

  /// Version used when a service is requested without one
  pub fn default_version(&self) -> ApiVersion {
    self.default_version
  }

  /// Retry budget callers should use when they opt into retrying
  pub fn max_retries(&self) -> u32 {
    self.max_retries
  }

  pub(crate) fn transport(&self) -> Arc<Transport> {
    self.transport.clone()
  }

  pub(crate) fn rate_limiter(&self) -> Arc<SessionRateLimiter> {
    self.rate_limiter.clone()
  }
}

impl std::fmt::Debug for DfpSession {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DfpSession")
      .field("network_code", &self.network_code)
      .field("application_name", &self.application_name)
      .field("default_version", &self.default_version)
      .field("transport", &self.transport)
      .field("rate_limiter", &"RateLimiter")
      .finish()
  }
}

/// Builder for [`DfpSession`]
///
/// ```rust,no_run
/// use dfp_client::{DfpSessionBuilder, OAuth2TokenBuilder};
/// use dfp_core::Config;
///
/// let credential = OAuth2TokenBuilder::new().load_env().build()?;
/// let session = DfpSessionBuilder::from_config(&Config::from_env()?)
///   .with_oauth2_credential(credential)
///   .build()?;
/// # Ok::<(), dfp_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DfpSessionBuilder {
  network_code: Option<String>,
  application_name: Option<String>,
  endpoint: String,
  api_version: String,
  rate_limit: u32,
  timeout_secs: u64,
  max_retries: u32,
  credential: Option<OAuth2Credential>,
}

impl Default for DfpSessionBuilder {
  fn default() -> Self {
    Self {
      network_code: None,
      application_name: None,
      endpoint: dfp_core::DFP_BASE_URL.to_string(),
      api_version: ApiVersion::default().to_string(),
      rate_limit: dfp_core::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      max_retries: 3,
      credential: None,
    }
  }
}

impl DfpSessionBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start from loaded configuration
  pub fn from_config(config: &Config) -> Self {
    Self {
      network_code: Some(config.network_code.clone()),
      application_name: Some(config.application_name.clone()),
      endpoint: config.base_url.clone(),
      api_version: config.api_version.clone(),
      rate_limit: config.rate_limit,
      timeout_secs: config.timeout_secs,
      max_retries: config.max_retries,
      credential: None,
    }
  }

  pub fn with_network_code(mut self, network_code: impl Into<String>) -> Self {
    self.network_code = Some(network_code.into());
    self
  }

  pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
    self.application_name = Some(application_name.into());
    self
  }

  pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
    self.endpoint = endpoint.into();
    self
  }

  pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
    self.api_version = api_version.into();
    self
  }

  /// Requests per minute allowed across the whole session
  pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
    self.rate_limit = rate_limit;
    self
  }

  pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
    self.timeout_secs = timeout_secs;
    self
  }

  pub fn with_oauth2_credential(mut self, credential: OAuth2Credential) -> Self {
    self.credential = Some(credential);
    self
  }

  pub fn build(self) -> Result<DfpSession> {
    let network_code = self
      .network_code
      .filter(|c| !c.trim().is_empty())
      .ok_or_else(|| Error::Config("Network code is required".to_string()))?;

    let application_name = self
      .application_name
      .filter(|n| !n.trim().is_empty())
      .ok_or_else(|| Error::Config("Application name is required".to_string()))?;

    let credential = self
      .credential
      .ok_or_else(|| Error::Credential("An OAuth2 credential is required".to_string()))?;

    let default_version: ApiVersion = self.api_version.parse()?;

    let rate_limit = NonZeroU32::new(self.rate_limit)
      .ok_or_else(|| Error::Config("Rate limit must be greater than zero".to_string()))?;
    let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rate_limit)));

    let transport = Arc::new(Transport::new(
      &self.endpoint,
      self.timeout_secs,
      &network_code,
      &application_name,
      credential,
    )?);

    info!(network_code = %network_code, version = %default_version, "Session established");

    Ok(DfpSession {
      network_code,
      application_name,
      default_version,
      max_retries: self.max_retries,
      transport,
      rate_limiter,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::OAuth2TokenBuilder;

  fn credential() -> OAuth2Credential {
    OAuth2TokenBuilder::new().with_access_token("test-token").build().unwrap()
  }

  #[test]
  fn test_session_from_config() {
    let mut config = Config::default_with_network("1234567".to_string());
    config.api_version = "v201605".to_string();
    config.max_retries = 5;

    let session = DfpSessionBuilder::from_config(&config)
      .with_oauth2_credential(credential())
      .build()
      .unwrap();

    assert_eq!(session.network_code(), "1234567");
    assert_eq!(session.application_name(), "dfp-rust");
    assert_eq!(session.default_version(), ApiVersion::V201605);
    assert_eq!(session.max_retries(), 5);
    assert_eq!(session.transport().base_url(), "https://ads.google.com/apis/ads/publisher");
  }

  #[test]
  fn test_session_requires_network_and_credential() {
    let missing_network = DfpSessionBuilder::new()
      .with_application_name("app")
      .with_oauth2_credential(credential())
      .build();
    assert!(matches!(missing_network, Err(Error::Config(_))));

    let missing_credential =
      DfpSessionBuilder::new().with_network_code("1").with_application_name("app").build();
    assert!(matches!(missing_credential, Err(Error::Credential(_))));
  }

  #[test]
  fn test_session_rejects_bad_settings() {
    let base = DfpSessionBuilder::new()
      .with_network_code("1")
      .with_application_name("app")
      .with_oauth2_credential(credential());

    let bad_version = base.clone().with_api_version("v2001").build();
    assert!(matches!(bad_version, Err(Error::UnsupportedVersion(_))));

    let zero_rate = base.clone().with_rate_limit(0).build();
    assert!(matches!(zero_rate, Err(Error::Config(_))));

    let bad_endpoint = base.with_endpoint("not a url").build();
    assert!(matches!(bad_endpoint, Err(Error::Config(_))));
  }
}
