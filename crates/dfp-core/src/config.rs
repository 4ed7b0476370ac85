//! Configuration management for the DFP client

use crate::error::{Error, Result};
use crate::ApiVersion;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use url::Url;

/// Main configuration struct for the DFP client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// Network code of the ad-management network being queried
  pub network_code: String,

  /// Application name sent with every request
  pub application_name: String,

  /// Base URL for the publisher API
  pub base_url: String,

  /// API version used when a service is requested without one
  pub api_version: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Maximum retries when a caller opts into retrying
  pub max_retries: u32,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Load configuration from a dotenv-format file.
  ///
  /// The file uses the same `DFP_*` keys as the environment.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let values = read_env_file(path)?;
    Self::from_lookup(|key| values.get(key).cloned())
  }

  fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let network_code = lookup("DFP_NETWORK_CODE")
      .ok_or_else(|| Error::Config("DFP_NETWORK_CODE not set".to_string()))?;

    let application_name = lookup("DFP_APPLICATION_NAME")
      .ok_or_else(|| Error::Config("DFP_APPLICATION_NAME not set".to_string()))?;

    let base_url = lookup("DFP_BASE_URL").unwrap_or_else(|| crate::DFP_BASE_URL.to_string());
    Url::parse(&base_url).map_err(|e| Error::Config(format!("Invalid DFP_BASE_URL: {}", e)))?;

    let api_version =
      lookup("DFP_API_VERSION").unwrap_or_else(|| ApiVersion::default().to_string());
    api_version
      .parse::<ApiVersion>()
      .map_err(|_| Error::Config(format!("Invalid DFP_API_VERSION: {}", api_version)))?;

    let rate_limit = lookup("DFP_RATE_LIMIT")
      .unwrap_or_else(|| crate::DEFAULT_RATE_LIMIT.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid DFP_RATE_LIMIT".to_string()))?;

    let timeout_secs = lookup("DFP_TIMEOUT_SECS")
      .unwrap_or_else(|| "30".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid DFP_TIMEOUT_SECS".to_string()))?;

    let max_retries = lookup("DFP_MAX_RETRIES")
      .unwrap_or_else(|| "3".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid DFP_MAX_RETRIES".to_string()))?;

    Ok(Config {
      network_code,
      application_name,
      base_url,
      api_version,
      rate_limit,
      timeout_secs,
      max_retries,
    })
  }

  /// Create a config with default values (for testing)
  pub fn default_with_network(network_code: String) -> Self {
    Config {
      network_code,
      application_name: "dfp-rust".to_string(),
      base_url: crate::DFP_BASE_URL.to_string(),
      api_version: ApiVersion::default().to_string(),
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      max_retries: 3,
    }
  }

  /// Parsed form of `api_version`
  pub fn version(&self) -> Result<ApiVersion> {
    self.api_version.parse()
  }
}

/// Read every `KEY=value` entry of a dotenv-format file without touching
/// the process environment.
pub fn read_env_file(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
  let path = path.as_ref();
  let entries = dotenvy::from_path_iter(path)
    .map_err(|e| Error::Config(format!("Failed to open {}: {}", path.display(), e)))?;

  let mut values = HashMap::new();
  for entry in entries {
    let (key, value) =
      entry.map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    values.insert(key, value);
  }
  Ok(values)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_config_from_lookup_defaults() {
    let mut values = HashMap::new();
    values.insert("DFP_NETWORK_CODE", "1234567");
    values.insert("DFP_APPLICATION_NAME", "rate-card-report");

    let config = Config::from_lookup(|k| values.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(config.network_code, "1234567");
    assert_eq!(config.api_version, "v201602");
    assert_eq!(config.rate_limit, 60);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.base_url, crate::DFP_BASE_URL);
  }

  #[test]
  fn test_config_missing_network_code() {
    let result = Config::from_lookup(|_| None);
    assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("DFP_NETWORK_CODE")));
  }

  #[test]
  fn test_config_rejects_bad_values() {
    let bad_version = Config::from_lookup(|k| match k {
      "DFP_NETWORK_CODE" => Some("1".to_string()),
      "DFP_APPLICATION_NAME" => Some("app".to_string()),
      "DFP_API_VERSION" => Some("v2099".to_string()),
      _ => None,
    });
    assert!(matches!(bad_version, Err(Error::Config(_))));

    let bad_limit = Config::from_lookup(|k| match k {
      "DFP_NETWORK_CODE" => Some("1".to_string()),
      "DFP_APPLICATION_NAME" => Some("app".to_string()),
      "DFP_RATE_LIMIT" => Some("lots".to_string()),
      _ => None,
    });
    assert!(matches!(bad_limit, Err(Error::Config(_))));
  }

  #[test]
  fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "DFP_NETWORK_CODE=7654321").unwrap();
    writeln!(file, "DFP_APPLICATION_NAME=\"Rate card listing\"").unwrap();
    writeln!(file, "DFP_API_VERSION=v201608").unwrap();
    writeln!(file, "DFP_MAX_RETRIES=5").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.network_code, "7654321");
    assert_eq!(config.application_name, "Rate card listing");
    assert_eq!(config.version().unwrap(), ApiVersion::V201608);
    assert_eq!(config.max_retries, 5);
  }

  #[test]
  fn test_config_from_missing_file() {
    let result = Config::from_file("/nonexistent/dfp.env");
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[test]
  fn test_read_env_file_leaves_process_env_alone() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# comment").unwrap();
    writeln!(file, "DFP_TEST_ONLY_IN_FILE=present").unwrap();
    writeln!(file, "DFP_OAUTH2_ACCESS_TOKEN='ya29.quoted'").unwrap();

    let values = read_env_file(file.path()).unwrap();
    assert_eq!(values.len(), 2);
    assert_eq!(values["DFP_TEST_ONLY_IN_FILE"], "present");
    assert_eq!(values["DFP_OAUTH2_ACCESS_TOKEN"], "ya29.quoted");
    assert!(env::var("DFP_TEST_ONLY_IN_FILE").is_err());
  }
}
