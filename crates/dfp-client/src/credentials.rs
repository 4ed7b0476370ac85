//! OAuth2 credentials for authenticating API calls
//!
//! Token refresh is not performed here: the credential must already carry
//! a valid access token. The client id, secret and refresh token are kept so
//! an external refresher can be layered on top.

use dfp_core::{read_env_file, Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::Path;

const CLIENT_ID_KEY: &str = "DFP_OAUTH2_CLIENT_ID";
const CLIENT_SECRET_KEY: &str = "DFP_OAUTH2_CLIENT_SECRET";
const REFRESH_TOKEN_KEY: &str = "DFP_OAUTH2_REFRESH_TOKEN";
const ACCESS_TOKEN_KEY: &str = "DFP_OAUTH2_ACCESS_TOKEN";

/// OAuth2 credential attached to every request as a bearer token
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Credential {
  client_id: Option<String>,
  client_secret: Option<String>,
  refresh_token: Option<String>,
  access_token: String,
}

impl OAuth2Credential {
  pub fn access_token(&self) -> &str {
    &self.access_token
  }

  pub fn client_id(&self) -> Option<&str> {
    self.client_id.as_deref()
  }

  /// Whether an external refresher has what it needs to mint new tokens
  pub fn is_refreshable(&self) -> bool {
    self.client_id.is_some() && self.client_secret.is_some() && self.refresh_token.is_some()
  }
}

impl std::fmt::Debug for OAuth2Credential {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OAuth2Credential")
      .field("client_id", &self.client_id)
      .field("client_secret", &self.client_secret.as_ref().map(|_| "[redacted]"))
      .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
      .field("access_token", &"[redacted]")
      .finish()
  }
}

/// Builder for [`OAuth2Credential`]
///
/// ```rust,no_run
/// use dfp_client::OAuth2TokenBuilder;
///
/// let credential = OAuth2TokenBuilder::new().load_env().build()?;
/// # Ok::<(), dfp_core::Error>(())
/// ```
#[derive(Default)]
pub struct OAuth2TokenBuilder {
  client_id: Option<String>,
  client_secret: Option<String>,
  refresh_token: Option<String>,
  access_token: Option<String>,
}

impl OAuth2TokenBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fill unset fields from `DFP_OAUTH2_*` environment variables
  pub fn load_env(self) -> Self {
    dotenv().ok();
    self.merge(|key| env::var(key).ok())
  }

  /// Fill unset fields from a dotenv-format file
  pub fn load_file(self, path: impl AsRef<Path>) -> Result<Self> {
    let values = read_env_file(path)?;
    Ok(self.merge(|key| values.get(key).cloned()))
  }

  fn merge<F>(mut self, lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    self.client_id = self.client_id.or_else(|| lookup(CLIENT_ID_KEY));
    self.client_secret = self.client_secret.or_else(|| lookup(CLIENT_SECRET_KEY));
    self.refresh_token = self.refresh_token.or_else(|| lookup(REFRESH_TOKEN_KEY));
    self.access_token = self.access_token.or_else(|| lookup(ACCESS_TOKEN_KEY));
    self
  }

  pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
    self.client_id = Some(client_id.into());
    self
  }

  pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
    self.client_secret = Some(client_secret.into());
    self
  }

  pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
    self.refresh_token = Some(refresh_token.into());
    self
  }

  pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
    self.access_token = Some(access_token.into());
    self
  }

  /// Build the credential. An access token is required.
  pub fn build(self) -> Result<OAuth2Credential> {
    let access_token = self
      .access_token
      .filter(|t| !t.trim().is_empty())
      .ok_or_else(|| Error::Credential(format!("{} not set", ACCESS_TOKEN_KEY)))?;

    Ok(OAuth2Credential {
      client_id: self.client_id,
      client_secret: self.client_secret,
      refresh_token: self.refresh_token,
      access_token,
    })
  }
}
