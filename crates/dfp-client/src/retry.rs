//! Retrying decorator for record services

use crate::pager::RecordService;
use async_trait::async_trait;
use dfp_core::{Result, Statement};
use dfp_models::Page;
use std::time::Duration;
use tracing::warn;

/// Wraps a [`RecordService`] and retries transient failures
///
/// Only errors for which [`dfp_core::Error::is_retryable`] holds are retried.
/// The first retry waits `base_delay` and each later one doubles the wait.
/// Paging itself never retries; callers opt in by wrapping the service they
/// hand to the runner.
pub struct RetryingService<S> {
  inner: S,
  max_retries: u32,
  base_delay: Duration,
}

impl<S> RetryingService<S> {
  pub fn new(inner: S, max_retries: u32) -> Self {
    Self { inner, max_retries, base_delay: Duration::from_secs(1) }
  }

  pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
    self.base_delay = base_delay;
    self
  }

  pub fn inner(&self) -> &S {
    &self.inner
  }

  /// Wait before retry number `retry + 1`
  fn delay_for(&self, retry: u32) -> Duration {
    self.base_delay.saturating_mul(2_u32.saturating_pow(retry))
  }
}

#[async_trait]
impl<S: RecordService> RecordService for RetryingService<S> {
  type Record = S::Record;

  async fn execute_query(&self, statement: &Statement) -> Result<Page<S::Record>> {
    let mut attempt = 0;
    loop {
      match self.inner.execute_query(statement).await {
        Ok(page) => return Ok(page),
        Err(e) if e.is_retryable() && attempt < self.max_retries => {
          let delay = self.delay_for(attempt);
          attempt += 1;
          warn!(
            "Retrying request in {}ms (attempt {}): {}",
            delay.as_millis(),
            attempt + 1,
            e
          );
          tokio::time::sleep(delay).await;
        }
        Err(e) => return Err(e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::FakeRecordService;
  use crate::PagedQueryRunner;
  use dfp_core::{Error, StatementBuilder};

  fn statement() -> Statement {
    StatementBuilder::new().limit(10).to_statement().unwrap()
  }

  #[tokio::test]
  async fn test_retries_transient_errors() {
    let fake = FakeRecordService::scripted(vec![
      Err(Error::Http("connection reset".to_string())),
      Err(Error::RateLimit("quota".to_string())),
      Ok(Page::new(vec![1_u8], 0, 1)),
    ]);
    let service = RetryingService::new(fake, 3).with_base_delay(Duration::ZERO);

    let page = service.execute_query(&statement()).await.unwrap();
    assert_eq!(page.records(), &[1]);
    assert_eq!(service.inner().calls(), 3);
  }

  #[tokio::test]
  async fn test_gives_up_after_max_retries() {
    let fake = FakeRecordService::<u8>::scripted(vec![
      Err(Error::Http("1".to_string())),
      Err(Error::Http("2".to_string())),
      Err(Error::Http("3".to_string())),
    ]);
    let service = RetryingService::new(fake, 2).with_base_delay(Duration::ZERO);

    let result = service.execute_query(&statement()).await;
    assert!(matches!(result, Err(Error::Http(msg)) if msg == "3"));
    assert_eq!(service.inner().calls(), 3);
  }

  #[tokio::test]
  async fn test_does_not_retry_permanent_errors() {
    let fake = FakeRecordService::<u8>::scripted(vec![Err(Error::Auth("expired".to_string()))]);
    let service = RetryingService::new(fake, 5).with_base_delay(Duration::ZERO);

    assert!(matches!(service.execute_query(&statement()).await, Err(Error::Auth(_))));
    assert_eq!(service.inner().calls(), 1);
  }

  #[tokio::test]
  async fn test_runner_over_retrying_service_recovers() {
    let fake = FakeRecordService::from_records((1..=6_u32).collect()).failing_on_call(2);
    let service = RetryingService::new(fake, 1).with_base_delay(Duration::ZERO);

    let results = PagedQueryRunner::new(&service, StatementBuilder::new().limit(3))
      .unwrap()
      .collect()
      .await
      .unwrap();

    assert_eq!(results.records, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(results.calls, 2);
    assert_eq!(service.inner().offsets(), vec![0, 3, 3]);
  }

  #[test]
  fn test_backoff_starts_at_base_delay_and_doubles() {
    let service = RetryingService::new(FakeRecordService::<u8>::from_records(vec![]), 3);
    assert_eq!(service.delay_for(0), Duration::from_secs(1));
    assert_eq!(service.delay_for(1), Duration::from_secs(2));
    assert_eq!(service.delay_for(2), Duration::from_secs(4));
  }

  #[tokio::test]
  async fn test_single_retry_waits_base_delay() {
    let fake = FakeRecordService::scripted(vec![
      Err(Error::Http("connection reset".to_string())),
      Ok(Page::new(vec![1_u8], 0, 1)),
    ]);
    let service = RetryingService::new(fake, 1).with_base_delay(Duration::from_millis(100));

    let started = std::time::Instant::now();
    service.execute_query(&statement()).await.unwrap();
    let waited = started.elapsed();

    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_millis(200), "waited {:?}", waited);
  }
}
