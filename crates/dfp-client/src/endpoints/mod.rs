pub mod rate_card;

use crate::session::SessionRateLimiter;
use crate::transport::Transport;
use dfp_core::Result;
use std::sync::Arc;

/// Base trait for endpoint implementations
///
/// Provides common functionality needed by all service handles
pub trait EndpointBase {
  /// Wait for rate limit before making a request
  async fn wait_for_rate_limit(&self) -> Result<()>;

  /// Get a reference to the transport layer
  fn transport(&self) -> &Arc<Transport>;
}

/// Macro to implement the EndpointBase trait for endpoint structs
macro_rules! impl_endpoint_base {
  ($struct_name:ident) => {
    impl $crate::endpoints::EndpointBase for $struct_name {
      async fn wait_for_rate_limit(&self) -> dfp_core::Result<()> {
        self.rate_limiter.until_ready().await;
        Ok(())
      }

      fn transport(&self) -> &std::sync::Arc<$crate::transport::Transport> {
        &self.transport
      }
    }
  };
}

pub(crate) use impl_endpoint_base;

/// Shared state every service handle is built from
#[derive(Clone)]
pub struct EndpointCore {
  pub transport: Arc<Transport>,
  pub rate_limiter: Arc<SessionRateLimiter>,
}

impl EndpointCore {
  /// Create a new endpoint core
  pub fn new(transport: Arc<Transport>, rate_limiter: Arc<SessionRateLimiter>) -> Self {
    Self { transport, rate_limiter }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use governor::{Quota, RateLimiter};
  use std::num::NonZeroU32;

  #[test]
  fn test_endpoint_core_creation() {
    let transport = Arc::new(Transport::new_mock());
    let quota = Quota::per_minute(NonZeroU32::new(60).unwrap());
    let rate_limiter = Arc::new(RateLimiter::direct(quota));

    let core = EndpointCore::new(transport, rate_limiter);

    assert_eq!(core.transport.base_url(), "https://mock.dfp.example/");
  }
}
