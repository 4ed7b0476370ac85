//! Get USD Rate Cards Example
//!
//! This example demonstrates how to use dfp-client to:
//! - Build an OAuth2 credential and a session from the environment
//! - Look up RateCardService by name and version
//! - Page through every rate card priced in US dollars
//!
//! Required environment (or `.env`): `DFP_NETWORK_CODE`,
//! `DFP_APPLICATION_NAME`, `DFP_OAUTH2_ACCESS_TOKEN`.

use dfp_client::{DfpServices, DfpSession, DfpSessionBuilder, OAuth2TokenBuilder, PagedQueryRunner};
use dfp_core::{Config, StatementBuilder, SUGGESTED_PAGE_LIMIT};

async fn run_example(services: &DfpServices, session: &DfpSession) -> dfp_core::Result<()> {
  let rate_card_service =
    services.get(session, "RateCardService", "v201602")?.into_rate_card_service()?;

  // Select rate cards by currency, one suggested page at a time
  let statement = StatementBuilder::new()
    .where_clause("currencyCode = :currencyCode")
    .order_by("id ASC")
    .limit(SUGGESTED_PAGE_LIMIT)
    .with_bind_variable("currencyCode", "USD");

  let summary = PagedQueryRunner::new(&rate_card_service, statement)?
    .for_each(|indexed| {
      let card = indexed.record;
      println!(
        "{}) Rate card with ID {}, name '{}', and currency code '{}' was found.",
        indexed.sequence, card.id, card.name, card.currency_code
      );
    })
    .await?;

  println!("Number of results found: {}", summary.total_result_set_size);
  Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // Initialize logging
  tracing_subscriber::fmt::init();

  let credential = OAuth2TokenBuilder::new().load_env().build()?;

  let session = DfpSessionBuilder::from_config(&Config::from_env()?)
    .with_oauth2_credential(credential)
    .build()?;

  run_example(&DfpServices::new(), &session).await?;
  Ok(())
}
