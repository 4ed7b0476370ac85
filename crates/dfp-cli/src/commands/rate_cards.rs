/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::config::AppConfig;
use anyhow::{bail, Result};
use clap::Args;
use dfp_client::{DfpServices, DfpSession, PagedQueryRunner, RecordService, RetryingService};
use dfp_core::{StatementBuilder, MAX_PAGE_LIMIT, SUGGESTED_PAGE_LIMIT};
use dfp_models::RateCard;
use std::io::Write;
use tracing::info;

#[derive(Args, Debug)]
pub struct RateCardsCommand {
  /// Currency code rate cards must be priced in
  #[arg(long, default_value = "USD")]
  pub currency: String,

  /// Records requested per call
  #[arg(long, default_value_t = SUGGESTED_PAGE_LIMIT)]
  pub page_size: u64,

  /// API version to call instead of the configured one
  #[arg(long)]
  pub api_version: Option<String>,

  /// Retry transient failures up to the configured retry budget
  #[arg(long)]
  pub retry: bool,
}

pub async fn execute(cmd: RateCardsCommand, config: AppConfig) -> Result<()> {
  let session = config.session()?;
  let services = DfpServices::new();
  let mut out = std::io::stdout();

  run_rate_card_listing(&services, &session, &cmd, &mut out).await?;
  Ok(())
}

/// Look up `RateCardService` and print every rate card priced in the requested currency
pub async fn run_rate_card_listing<W: Write>(
  services: &DfpServices,
  session: &DfpSession,
  cmd: &RateCardsCommand,
  out: &mut W,
) -> Result<u64> {
  if cmd.page_size == 0 || cmd.page_size > MAX_PAGE_LIMIT {
    bail!("--page-size must be between 1 and {}", MAX_PAGE_LIMIT);
  }

  let version = cmd.api_version.clone().unwrap_or_else(|| session.default_version().to_string());
  let service = services.get(session, "RateCardService", &version)?.into_rate_card_service()?;

  info!(currency = %cmd.currency, version = %version, retry = cmd.retry, "Listing rate cards");

  if cmd.retry {
    let service = RetryingService::new(service, session.max_retries());
    list_rate_cards(&service, &cmd.currency, cmd.page_size, out).await
  } else {
    list_rate_cards(&service, &cmd.currency, cmd.page_size, out).await
  }
}

/// Page through rate cards in `currency`, writing one line per card and the total
pub async fn list_rate_cards<S, W>(
  service: &S,
  currency: &str,
  page_size: u64,
  out: &mut W,
) -> Result<u64>
where
  S: RecordService<Record = RateCard>,
  W: Write,
{
  let currency = currency.trim().to_ascii_uppercase();
  if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
    bail!("Currency code must be three letters, got '{}'", currency);
  }

  let statement = StatementBuilder::new()
    .where_clause("currencyCode = :currencyCode")
    .order_by("id ASC")
    .limit(page_size)
    .with_bind_variable("currencyCode", currency);

  let mut runner = PagedQueryRunner::new(service, statement)?;
  while let Some(records) = runner.next_page().await? {
    for indexed in records {
      let card = &indexed.record;
      writeln!(
        out,
        "{}) Rate card with ID {}, name '{}', and currency code '{}' was found.",
        indexed.sequence, card.id, card.name, card.currency_code
      )?;
    }
  }

  let total = runner.total_result_set_size();
  writeln!(out, "Number of results found: {}", total)?;
  Ok(total)
}
