use thiserror::Error;

/// The main error type for dfp-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Environment variable error
  #[error("Environment variable error: {0}")]
  EnvVar(#[from] std::env::VarError),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Credential could not be built
  #[error("Credential error: {0}")]
  Credential(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),

  /// HTTP transport error
  #[error("HTTP error: {0}")]
  Http(String),

  /// Request rejected as unauthenticated or unauthorized
  #[error("Authorization failed: {0}")]
  Auth(String),

  /// API rate limit exceeded
  #[error("Rate limit exceeded: {0}")]
  RateLimit(String),

  /// Fault reported by the remote service
  #[error("API error: {0}")]
  Api(String),

  /// Response body could not be interpreted
  #[error("Parse error: {0}")]
  Parse(String),

  /// Statement failed validation before being sent
  #[error("Invalid statement: {0}")]
  InvalidStatement(String),

  /// Service locator was asked for a service it does not know
  #[error("Unknown service: {0}")]
  UnknownService(String),

  /// Service locator was asked for an API version it does not support
  #[error("Unsupported API version: {0}")]
  UnsupportedVersion(String),

  /// Paging was cancelled before the next call was issued
  #[error("Operation cancelled")]
  Cancelled,
}

impl Error {
  /// Whether retrying the same call could plausibly succeed.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Error::Http(_) | Error::RateLimit(_))
  }
}

/// Result type alias for dfp-* crates
pub type Result<T> = std::result::Result<T, Error>;
