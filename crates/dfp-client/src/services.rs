//! Service locator: hands out service handles by name and version

use crate::endpoints::{rate_card::RateCardService, EndpointCore};
use crate::session::DfpSession;
use dfp_core::{ApiVersion, Result, ServiceName};
use tracing::debug;

/// A service handle returned by [`DfpServices::get`]
#[derive(Debug, Clone)]
pub enum ServiceHandle {
  RateCard(RateCardService),
}

impl ServiceHandle {
  pub fn name(&self) -> ServiceName {
    match self {
      ServiceHandle::RateCard(_) => ServiceName::RateCardService,
    }
  }

  pub fn into_rate_card_service(self) -> Result<RateCardService> {
    match self {
      ServiceHandle::RateCard(service) => Ok(service),
    }
  }
}

/// Looks up remote services for a session
///
/// # Examples
///
/// ```rust,no_run
/// # use dfp_client::{DfpServices, DfpSession};
/// # fn example(session: &DfpSession) -> dfp_core::Result<()> {
/// let services = DfpServices::new();
/// let rate_cards = services.get(session, "RateCardService", "v201602")?.into_rate_card_service()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DfpServices;

impl DfpServices {
  pub fn new() -> Self {
    Self
  }

  /// Get a service by its remote name and API version string
  pub fn get(&self, session: &DfpSession, service: &str, version: &str) -> Result<ServiceHandle> {
    let name: ServiceName = service.parse()?;
    let version: ApiVersion = version.parse()?;
    self.get_typed(session, name, version)
  }

  /// Get a service by enum name and version
  pub fn get_typed(
    &self,
    session: &DfpSession,
    name: ServiceName,
    version: ApiVersion,
  ) -> Result<ServiceHandle> {
    debug!(service = %name, version = %version, network = session.network_code(), "Creating service");
    let core = EndpointCore::new(session.transport(), session.rate_limiter());

    match name {
      ServiceName::RateCardService => Ok(ServiceHandle::RateCard(RateCardService::new(core, version))),
    }
  }

  /// `RateCardService` at the session's default version
  pub fn rate_card_service(&self, session: &DfpSession) -> Result<RateCardService> {
    self
      .get_typed(session, ServiceName::RateCardService, session.default_version())?
      .into_rate_card_service()
  }
}
