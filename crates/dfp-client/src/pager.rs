//! Offset paging over statement-based listing calls
//!
//! [`PagedQueryRunner`] retrieves every record matching a statement from a
//! service that only returns bounded pages. It issues one call, forwards the
//! page's records, advances the statement offset by the page size, and stops
//! once the offset reaches the total the service reported:
//!
//! ```text
//! total = 0
//! do {
//!   page = service.execute_query(statement)
//!   if page.results is present { total = page.total; forward records }
//!   statement.offset += limit
//! } while statement.offset < total
//! ```
//!
//! At least one call is always made, so an empty result set costs one call.
//!
//! The total is taken from the most recent page that carried results. If the
//! underlying data changes while paging, later pages may report a different
//! total and the number of remaining calls changes with it. Such changes are
//! logged at `warn` but not otherwise corrected.
//!
//! No retrying happens here: the first failed call ends paging and its error
//! is returned. Wrap the service in [`crate::RetryingService`] for resilience.

use async_trait::async_trait;
use dfp_core::{Error, Result, Statement, StatementBuilder};
use dfp_models::Page;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// A service that can list records for a statement, one page per call
#[async_trait]
pub trait RecordService: Send + Sync {
  /// Record type carried in each page
  type Record: Send;

  /// Execute `statement` and return the page it selects
  async fn execute_query(&self, statement: &Statement) -> Result<Page<Self::Record>>;
}

/// A record together with its 1-based position in the full result set
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedRecord<T> {
  pub sequence: u64,
  pub record: T,
}

/// Everything a completed paging run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResults<T> {
  pub records: Vec<T>,
  pub total_result_set_size: u64,
  pub calls: u64,
}

/// Totals reported once a callback-driven run finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingSummary {
  pub total_result_set_size: u64,
  pub records_seen: u64,
  pub calls: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagingState {
  Fetching,
  Done,
}

/// Drives the offset-paging loop against a [`RecordService`]
///
/// The runner owns the statement builder for the duration of the run and is
/// not restartable: once it reports done (or fails) it yields nothing more.
pub struct PagedQueryRunner<'a, S: RecordService> {
  service: &'a S,
  statement: StatementBuilder,
  page_size: u64,
  total_result_set_size: u64,
  calls: u64,
  saw_results: bool,
  state: PagingState,
  cancel: Option<CancellationToken>,
}

impl<'a, S: RecordService> PagedQueryRunner<'a, S> {
  /// Prepare a run. The statement must have a limit and start at offset 0.
  pub fn new(service: &'a S, statement: StatementBuilder) -> Result<Self> {
    let page_size = match statement.current_limit() {
      Some(limit) if limit > 0 => limit,
      _ => {
        return Err(Error::InvalidStatement(
          "Paging requires a statement with a positive LIMIT".to_string(),
        ));
      }
    };

    if statement.current_offset() != 0 {
      return Err(Error::InvalidStatement(format!(
        "Paging must start at offset 0, not {}",
        statement.current_offset()
      )));
    }

    // Surface statement errors before the first call.
    statement.to_statement()?;

    Ok(Self {
      service,
      statement,
      page_size,
      total_result_set_size: 0,
      calls: 0,
      saw_results: false,
      state: PagingState::Fetching,
      cancel: None,
    })
  }

  /// Stop before the next call once `token` is cancelled
  pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
    self.cancel = Some(token);
    self
  }

  /// Total reported by the most recent page that carried results
  pub fn total_result_set_size(&self) -> u64 {
    self.total_result_set_size
  }

  /// Calls issued so far
  pub fn calls(&self) -> u64 {
    self.calls
  }

  /// Offset the next call would use
  pub fn current_offset(&self) -> u64 {
    self.statement.current_offset()
  }

  pub fn is_done(&self) -> bool {
    self.state == PagingState::Done
  }

  /// Fetch the next page and return its records.
  ///
  /// Returns `Ok(None)` once paging is complete. A page whose result
  /// sequence was absent comes back as `Some(vec![])`.
  #[instrument(skip(self), fields(offset = self.statement.current_offset(), page_size = self.page_size))]
  pub async fn next_page(&mut self) -> Result<Option<Vec<IndexedRecord<S::Record>>>> {
    if self.state == PagingState::Done {
      return Ok(None);
    }

    if self.cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
      self.state = PagingState::Done;
      info!(calls = self.calls, "Paging cancelled");
      return Err(Error::Cancelled);
    }

    let statement = match self.statement.to_statement() {
      Ok(statement) => statement,
      Err(e) => {
        self.state = PagingState::Done;
        return Err(e);
      }
    };

    self.calls += 1;
    let page = match self.service.execute_query(&statement).await {
      Ok(page) => page,
      Err(e) => {
        self.state = PagingState::Done;
        warn!(calls = self.calls, error = %e, "Paging aborted by failed call");
        return Err(e);
      }
    };

    let mut records = Vec::new();
    if let Some(results) = page.results {
      if self.saw_results && page.total_result_set_size != self.total_result_set_size {
        warn!(
          previous = self.total_result_set_size,
          reported = page.total_result_set_size,
          "Total result set size changed between pages"
        );
      }
      self.saw_results = true;
      self.total_result_set_size = page.total_result_set_size;

      records.reserve(results.len());
      for (position, record) in results.into_iter().enumerate() {
        records.push(IndexedRecord { sequence: page.start_index + position as u64 + 1, record });
      }
    }

    debug!(
      returned = records.len(),
      total = self.total_result_set_size,
      "Fetched page"
    );

    self.statement.increase_offset_by(self.page_size);
    if self.statement.current_offset() >= self.total_result_set_size {
      self.state = PagingState::Done;
      info!(
        total = self.total_result_set_size,
        calls = self.calls,
        "Paging complete"
      );
    }

    Ok(Some(records))
  }

  /// Run to completion, handing each record to `f` as its page arrives
  pub async fn for_each<F>(mut self, mut f: F) -> Result<PagingSummary>
  where
    F: FnMut(IndexedRecord<S::Record>),
  {
    let mut records_seen = 0;
    while let Some(records) = self.next_page().await? {
      records_seen += records.len() as u64;
      records.into_iter().for_each(&mut f);
    }

    Ok(PagingSummary {
      total_result_set_size: self.total_result_set_size,
      records_seen,
      calls: self.calls,
    })
  }

  /// Run to completion and keep every record in memory
  ///
  /// Nothing is returned if any call fails.
  pub async fn collect(self) -> Result<PagedResults<S::Record>> {
    let mut records = Vec::new();
    let summary = self.for_each(|indexed| records.push(indexed.record)).await?;

    Ok(PagedResults {
      records,
      total_result_set_size: summary.total_result_set_size,
      calls: summary.calls,
    })
  }

  /// Lazy stream of records, fetching pages on demand
  ///
  /// Records already yielded stay valid if a later call fails; the failure is
  /// yielded once and the stream ends.
  pub fn into_stream(self) -> BoxStream<'a, Result<IndexedRecord<S::Record>>>
  where
    S: 'a,
  {
    stream::try_unfold(self, |mut runner| async move {
      let page = runner.next_page().await?;
      Ok::<_, Error>(page.map(|records| (records, runner)))
    })
    .map_ok(|records| stream::iter(records.into_iter().map(Ok)))
    .try_flatten()
    .boxed()
  }
}
