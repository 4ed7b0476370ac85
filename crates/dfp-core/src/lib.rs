pub mod config;
pub mod error;
pub mod statement;

pub use config::{read_env_file, Config};
pub use error::{Error, Result};
pub use statement::{BindValue, Statement, StatementBuilder, StatementValue};

use std::str::FromStr;

/// API versions this client knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiVersion {
  V201602,
  V201605,
  V201608,
}

impl std::fmt::Display for ApiVersion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ApiVersion::V201602 => write!(f, "v201602"),
      ApiVersion::V201605 => write!(f, "v201605"),
      ApiVersion::V201608 => write!(f, "v201608"),
    }
  }
}

impl FromStr for ApiVersion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "v201602" => Ok(ApiVersion::V201602),
      "v201605" => Ok(ApiVersion::V201605),
      "v201608" => Ok(ApiVersion::V201608),
      other => Err(Error::UnsupportedVersion(other.to_string())),
    }
  }
}

impl Default for ApiVersion {
  fn default() -> Self {
    ApiVersion::V201602
  }
}

/// Remote services reachable through the service locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
  RateCardService,
}

impl ServiceName {
  /// Name of the method that lists records for a statement.
  pub fn list_method(&self) -> &'static str {
    match self {
      ServiceName::RateCardService => "getRateCardsByStatement",
    }
  }
}

impl std::fmt::Display for ServiceName {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ServiceName::RateCardService => write!(f, "RateCardService"),
    }
  }
}

impl FromStr for ServiceName {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "RateCardService" => Ok(ServiceName::RateCardService),
      other => Err(Error::UnknownService(other.to_string())),
    }
  }
}

/// Base URL for the publisher API
pub const DFP_BASE_URL: &str = "https://ads.google.com/apis/ads/publisher";

/// Page size recommended by the API for statement-based listing.
pub const SUGGESTED_PAGE_LIMIT: u64 = 500;

/// Largest `LIMIT` the API accepts in a single statement.
pub const MAX_PAGE_LIMIT: u64 = 500;

/// API rate limits
pub const DEFAULT_RATE_LIMIT: u32 = 60; // requests per minute
