//! HTTP transport layer for DFP API requests

use crate::credentials::OAuth2Credential;
use dfp_core::{ApiVersion, Error, Result, ServiceName};
use dfp_models::{ApiEnvelope, ApiFaultResponse};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// HTTP transport layer for making requests to the DFP API
///
/// One call is one attempt; retrying is left to callers (see
/// [`crate::RetryingService`]).
pub struct Transport {
  client: Client,
  base_url: Url,
  network_code: String,
  application_name: String,
  credential: OAuth2Credential,
  timeout: Duration,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(
    base_url: &str,
    timeout_secs: u64,
    network_code: &str,
    application_name: &str,
    credential: OAuth2Credential,
  ) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;

    let timeout = Duration::from_secs(timeout_secs);
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(format!("dfp-client/0.1.0 ({})", application_name))
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url,
      network_code: network_code.to_string(),
      application_name: application_name.to_string(),
      credential,
      timeout,
    })
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    let credential = crate::OAuth2TokenBuilder::new().with_access_token("test-token").build().unwrap();
    Self::new("https://mock.dfp.example", 30, "1234567", "dfp-tests", credential).unwrap()
  }

  /// POST `body` to `service.method` and unwrap the `rval` envelope
  #[instrument(skip_all, fields(service = %service, version = %version, method = method))]
  pub async fn post<B, T>(
    &self,
    version: ApiVersion,
    service: ServiceName,
    method: &str,
    body: &B,
  ) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let url = self.build_url(version, service, method)?;
    debug!("Making request to: {}", url);

    let response = self
      .client
      .post(url)
      .bearer_auth(self.credential.access_token())
      .header("networkCode", &self.network_code)
      .header("applicationName", &self.application_name)
      .json(body)
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    debug!("Response status {} with body length: {} bytes", status, text.len());

    self.check_api_error(status, &text)?;

    let envelope = serde_json::from_str::<ApiEnvelope<T>>(&text).map_err(|e| {
      error!("Failed to parse JSON response: {}", e);
      Error::Parse(format!("Failed to parse response: {}. Response: {}", e, truncate(&text, 200)))
    })?;

    Ok(envelope.rval)
  }

  /// Build the full URL for a service method
  fn build_url(&self, version: ApiVersion, service: ServiceName, method: &str) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::Config(format!("Base URL cannot be a base: {}", self.base_url)))?
      .pop_if_empty()
      .push(&version.to_string())
      .push(&service.to_string())
      .push(method);
    Ok(url)
  }

  /// Map HTTP status and fault bodies onto the error taxonomy
  fn check_api_error(&self, status: StatusCode, body: &str) -> Result<()> {
    if let Ok(fault) = serde_json::from_str::<ApiFaultResponse>(body) {
      return Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(fault.fault.to_string()),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimit(fault.fault.to_string()),
        _ => Error::Api(fault.fault.to_string()),
      });
    }

    match status {
      s if s.is_success() => Ok(()),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
        Err(Error::Auth(format!("HTTP {}: {}", status, truncate(body, 200))))
      }
      StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimit(format!("HTTP {}", status))),
      s if s.is_client_error() => {
        error!("Request rejected with status: {}", status);
        Err(Error::Api(format!("HTTP {}: {}", status, truncate(body, 200))))
      }
      _ => {
        error!("Request failed with status: {}", status);
        Err(Error::Http(format!("HTTP error: {}", status)))
      }
    }
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    self.base_url.as_str()
  }

  pub fn network_code(&self) -> &str {
    &self.network_code
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url.as_str())
      .field("network_code", &self.network_code)
      .field("application_name", &self.application_name)
      .field("timeout", &self.timeout)
      .finish()
  }
}

fn truncate(text: &str, max: usize) -> &str {
  match text.char_indices().nth(max) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_build_url() {
    let transport = Transport::new_mock();
    let url = transport
      .build_url(ApiVersion::V201602, ServiceName::RateCardService, "getRateCardsByStatement")
      .unwrap();

    assert_eq!(
      url.as_str(),
      "https://mock.dfp.example/v201602/RateCardService/getRateCardsByStatement"
    );
  }

  #[test]
  fn test_build_url_keeps_base_path() {
    let credential = crate::OAuth2TokenBuilder::new().with_access_token("t").build().unwrap();
    let transport =
      Transport::new("https://ads.example/apis/ads/publisher/", 30, "1", "app", credential).unwrap();
    let url = transport
      .build_url(ApiVersion::V201608, ServiceName::RateCardService, "getRateCardsByStatement")
      .unwrap();

    assert_eq!(
      url.as_str(),
      "https://ads.example/apis/ads/publisher/v201608/RateCardService/getRateCardsByStatement"
    );
  }

  #[test]
  fn test_check_api_error_fault_body() {
    let transport = Transport::new_mock();
    let body = r#"{"fault": {"faultString": "PublisherQueryLanguageSyntaxError.UNPARSABLE"}}"#;

    let result = transport.check_api_error(StatusCode::INTERNAL_SERVER_ERROR, body);
    assert!(matches!(result, Err(Error::Api(msg)) if msg.contains("UNPARSABLE")));
  }

  #[test]
  fn test_check_api_error_statuses() {
    let transport = Transport::new_mock();

    assert!(matches!(
      transport.check_api_error(StatusCode::UNAUTHORIZED, "expired"),
      Err(Error::Auth(_))
    ));
    assert!(matches!(
      transport.check_api_error(StatusCode::TOO_MANY_REQUESTS, ""),
      Err(Error::RateLimit(_))
    ));
    assert!(matches!(
      transport.check_api_error(StatusCode::BAD_GATEWAY, "<html>"),
      Err(Error::Http(_))
    ));
  }

  #[test]
  fn test_other_client_errors_are_not_retryable() {
    let transport = Transport::new_mock();

    for status in [StatusCode::BAD_REQUEST, StatusCode::NOT_FOUND, StatusCode::UNPROCESSABLE_ENTITY] {
      let err = transport.check_api_error(status, "bad statement").unwrap_err();
      assert!(matches!(err, Error::Api(ref msg) if msg.contains(status.as_str())), "{}", status);
      assert!(!err.is_retryable());
    }
    assert!(transport.check_api_error(StatusCode::SERVICE_UNAVAILABLE, "").unwrap_err().is_retryable());
  }

  #[test]
  fn test_check_api_error_success() {
    let transport = Transport::new_mock();
    let body = r#"{"rval": {"results": [], "startIndex": 0, "totalResultSetSize": 0}}"#;
    assert!(transport.check_api_error(StatusCode::OK, body).is_ok());
  }

  #[test]
  fn test_truncate_respects_char_boundaries() {
    assert_eq!(truncate("héllo", 2), "hé");
    assert_eq!(truncate("abc", 10), "abc");
  }
}
