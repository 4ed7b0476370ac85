//! In-memory [`RecordService`] for exercising paging without a server

use crate::pager::RecordService;
use async_trait::async_trait;
use dfp_core::{Error, Result, Statement};
use dfp_models::Page;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Source<T> {
  Records(Vec<T>),
  Scripted(VecDeque<Result<Page<T>>>),
}

struct FakeState<T> {
  source: Source<T>,
  fail_on_call: Option<usize>,
  calls: usize,
  offsets: Vec<u64>,
  page_sizes: Vec<usize>,
}

/// Serves pages out of memory and records every call it receives
pub struct FakeRecordService<T> {
  state: Mutex<FakeState<T>>,
}

impl<T> FakeRecordService<T> {
  fn with_source(source: Source<T>) -> Self {
    Self {
      state: Mutex::new(FakeState {
        source,
        fail_on_call: None,
        calls: 0,
        offsets: Vec::new(),
        page_sizes: Vec::new(),
      }),
    }
  }

  /// Page through `records` honouring each statement's limit and offset.
  /// An empty data set is answered with an absent page.
  pub fn from_records(records: Vec<T>) -> Self {
    Self::with_source(Source::Records(records))
  }

  /// Answer calls with `responses` in order, then with an API error
  pub fn scripted(responses: Vec<Result<Page<T>>>) -> Self {
    Self::with_source(Source::Scripted(responses.into()))
  }

  /// Fail the `call`-th call (1-based) with an HTTP error
  pub fn failing_on_call(self, call: usize) -> Self {
    self.lock().fail_on_call = Some(call);
    self
  }

  pub fn calls(&self) -> usize {
    self.lock().calls
  }

  /// Statement offsets in call order
  pub fn offsets(&self) -> Vec<u64> {
    self.lock().offsets.clone()
  }

  /// Number of records returned by each successful call
  pub fn page_sizes(&self) -> Vec<usize> {
    self.lock().page_sizes.clone()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, FakeState<T>> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

#[async_trait]
impl<T> RecordService for FakeRecordService<T>
where
  T: Clone + Send + Sync,
{
  type Record = T;

  async fn execute_query(&self, statement: &Statement) -> Result<Page<T>> {
    let mut state = self.lock();
    state.calls += 1;
    state.offsets.push(statement.offset());

    if state.fail_on_call == Some(state.calls) {
      return Err(Error::Http(format!("injected failure on call {}", state.calls)));
    }

    let page = match &mut state.source {
      Source::Records(records) => {
        let total = records.len() as u64;
        if total == 0 {
          Page::absent()
        } else {
          let start = (statement.offset() as usize).min(records.len());
          let limit = statement.limit().map_or(records.len(), |l| l as usize);
          let end = start.saturating_add(limit).min(records.len());
          Page::new(records[start..end].to_vec(), statement.offset(), total)
        }
      }
      Source::Scripted(responses) => responses
        .pop_front()
        .unwrap_or_else(|| Err(Error::Api("no scripted response left".to_string())))?,
    };

    state.page_sizes.push(page.len());
    Ok(page)
  }
}
