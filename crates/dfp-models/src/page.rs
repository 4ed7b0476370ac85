//! Page envelope returned by statement-based listing calls

use serde::{Deserialize, Serialize};

/// One bounded chunk of a statement's result set
///
/// `results` is `None` when the server reports no results at all for the
/// requested window; this is distinct from an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  /// Records in this page, in server order
  pub results: Option<Vec<T>>,

  /// Offset into the full result set at which this page begins
  #[serde(default)]
  pub start_index: u64,

  /// Count of all records matching the filter, independent of paging
  #[serde(default)]
  pub total_result_set_size: u64,
}

impl<T> Page<T> {
  pub fn new(results: Vec<T>, start_index: u64, total_result_set_size: u64) -> Self {
    Self { results: Some(results), start_index, total_result_set_size }
  }

  /// A page with no result sequence at all
  pub fn absent() -> Self {
    Self { results: None, start_index: 0, total_result_set_size: 0 }
  }

  pub fn is_absent(&self) -> bool {
    self.results.is_none()
  }

  /// Records in this page; empty when absent
  pub fn records(&self) -> &[T] {
    self.results.as_deref().unwrap_or(&[])
  }

  pub fn len(&self) -> usize {
    self.records().len()
  }

  pub fn is_empty(&self) -> bool {
    self.records().is_empty()
  }

  /// Offset one past the last record of this page
  pub fn end_index(&self) -> u64 {
    self.start_index + self.len() as u64
  }
}

impl<T> IntoIterator for Page<T> {
  type Item = T;
  type IntoIter = std::vec::IntoIter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.results.unwrap_or_default().into_iter()
  }
}
