use anyhow::{Context, Result};
use dfp_client::{DfpSession, DfpSessionBuilder, OAuth2Credential, OAuth2TokenBuilder};
use dfp_core::Config as CoreConfig;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub api_config: CoreConfig,
  pub credential: OAuth2Credential,
}

impl AppConfig {
  /// Load settings and credentials from `path` if given, else from the environment.
  /// Credentials missing from the file fall back to the environment.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let (api_config, credential) = match path {
      Some(path) => {
        let api_config = CoreConfig::from_file(path)
          .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        let credential = OAuth2TokenBuilder::new()
          .load_file(path)?
          .load_env()
          .build()
          .context("Failed to build OAuth2 credential")?;
        (api_config, credential)
      }
      None => {
        let api_config = CoreConfig::from_env().context("Failed to load settings from environment")?;
        let credential =
          OAuth2TokenBuilder::new().load_env().build().context("Failed to build OAuth2 credential")?;
        (api_config, credential)
      }
    };

    Ok(Self { api_config, credential })
  }

  /// Build the API session this configuration describes
  pub fn session(&self) -> Result<DfpSession> {
    DfpSessionBuilder::from_config(&self.api_config)
      .with_oauth2_credential(self.credential.clone())
      .build()
      .context("Failed to create API session")
  }
}
