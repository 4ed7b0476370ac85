use super::{impl_endpoint_base, EndpointBase, EndpointCore};
use crate::pager::RecordService;
use crate::session::SessionRateLimiter;
use crate::transport::Transport;
use async_trait::async_trait;
use dfp_core::{ApiVersion, Result, ServiceName, Statement};
use dfp_models::{RateCard, RateCardPage};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterStatementRequest<'a> {
  filter_statement: &'a Statement,
}

/// Handle on `RateCardService` for one session and API version
#[derive(Clone)]
pub struct RateCardService {
  transport: Arc<Transport>,
  rate_limiter: Arc<SessionRateLimiter>,
  version: ApiVersion,
}

impl RateCardService {
  /// Create a new rate card service handle
  pub fn new(core: EndpointCore, version: ApiVersion) -> Self {
    Self { transport: core.transport, rate_limiter: core.rate_limiter, version }
  }

  pub fn version(&self) -> ApiVersion {
    self.version
  }

  /// Get one page of rate cards matching `statement`
  ///
  /// # Examples
  ///
  /// ```rust,no_run
  /// # use dfp_client::RateCardService;
  /// # use dfp_core::StatementBuilder;
  /// # async fn example(service: RateCardService) -> dfp_core::Result<()> {
  /// let statement = StatementBuilder::new()
  ///   .where_clause("currencyCode = :currencyCode")
  ///   .limit(500)
  ///   .with_bind_variable("currencyCode", "USD")
  ///   .to_statement()?;
  ///
  /// let page = service.get_rate_cards_by_statement(&statement).await?;
  /// println!("{} of {} rate cards", page.len(), page.total_result_set_size);
  /// # Ok(())
  /// # }
  /// ```
  #[instrument(skip(self, statement), fields(query = %statement.query, version = %self.version))]
  pub async fn get_rate_cards_by_statement(&self, statement: &Statement) -> Result<RateCardPage> {
    self.wait_for_rate_limit().await?;

    let body = FilterStatementRequest { filter_statement: statement };
    let page: RateCardPage = self
      .transport
      .post(
        self.version,
        ServiceName::RateCardService,
        ServiceName::RateCardService.list_method(),
        &body,
      )
      .await?;

    debug!(
      start_index = page.start_index,
      returned = page.len(),
      total = page.total_result_set_size,
      "Received rate card page"
    );
    Ok(page)
  }
}

impl_endpoint_base!(RateCardService);

#[async_trait]
impl RecordService for RateCardService {
  type Record = RateCard;

  async fn execute_query(&self, statement: &Statement) -> Result<RateCardPage> {
    self.get_rate_cards_by_statement(statement).await
  }
}

impl std::fmt::Debug for RateCardService {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RateCardService")
      .field("transport", &self.transport)
      .field("version", &self.version)
      .finish()
  }
}
