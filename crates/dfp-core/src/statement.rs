//! Statement building for statement-based (PQL) listing calls
//!
//! A [`StatementBuilder`] collects a filter, bind variables, ordering and the
//! paging window, and renders them into an immutable [`Statement`] that is
//! sent to the remote service. Paging callers keep the builder and advance it
//! with [`StatementBuilder::increase_offset_by`] between calls.

use crate::error::{Error, Result};
use crate::MAX_PAGE_LIMIT;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Typed value bound to a `:name` placeholder in a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BindValue {
  #[serde(rename = "TextValue")]
  Text(String),
  #[serde(rename = "NumberValue")]
  Number(i64),
  #[serde(rename = "BooleanValue")]
  Boolean(bool),
  #[serde(rename = "DateValue")]
  Date(NaiveDate),
  #[serde(rename = "SetValue")]
  Set(Vec<BindValue>),
}

impl From<&str> for BindValue {
  fn from(value: &str) -> Self {
    BindValue::Text(value.to_string())
  }
}

impl From<String> for BindValue {
  fn from(value: String) -> Self {
    BindValue::Text(value)
  }
}

impl From<i64> for BindValue {
  fn from(value: i64) -> Self {
    BindValue::Number(value)
  }
}

impl From<bool> for BindValue {
  fn from(value: bool) -> Self {
    BindValue::Boolean(value)
  }
}

impl From<NaiveDate> for BindValue {
  fn from(value: NaiveDate) -> Self {
    BindValue::Date(value)
  }
}

impl<T: Into<BindValue>> From<Vec<T>> for BindValue {
  fn from(values: Vec<T>) -> Self {
    BindValue::Set(values.into_iter().map(Into::into).collect())
  }
}

/// A named bind variable as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementValue {
  pub key: String,
  pub value: BindValue,
}

/// Immutable query descriptor sent with a listing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
  /// Rendered PQL text, including `LIMIT`/`OFFSET` when set
  pub query: String,

  /// Bind variables in the order they were added
  pub values: Vec<StatementValue>,

  #[serde(skip)]
  limit: Option<u64>,

  #[serde(skip)]
  offset: u64,
}

impl Statement {
  /// Page size this statement was rendered with
  pub fn limit(&self) -> Option<u64> {
    self.limit
  }

  /// Offset this statement was rendered with
  pub fn offset(&self) -> u64 {
    self.offset
  }

  /// Look up a bind variable by name
  pub fn value(&self, key: &str) -> Option<&BindValue> {
    self.values.iter().find(|v| v.key == key).map(|v| &v.value)
  }
}

/// Fluent builder for [`Statement`]s.
///
/// ```
/// use dfp_core::{StatementBuilder, SUGGESTED_PAGE_LIMIT};
///
/// let statement = StatementBuilder::new()
///   .where_clause("currencyCode = :currencyCode")
///   .order_by("id ASC")
///   .limit(SUGGESTED_PAGE_LIMIT)
///   .with_bind_variable("currencyCode", "USD")
///   .to_statement()
///   .unwrap();
///
/// assert_eq!(
///   statement.query,
///   "WHERE currencyCode = :currencyCode ORDER BY id ASC LIMIT 500 OFFSET 0"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
  where_clause: Option<String>,
  order_by: Option<String>,
  limit: Option<u64>,
  offset: u64,
  values: Vec<StatementValue>,
}

impl StatementBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Set the filter predicate. A leading `WHERE` keyword is accepted and dropped.
  pub fn where_clause(mut self, predicate: impl Into<String>) -> Self {
    let predicate = predicate.into();
    let trimmed = strip_keyword(predicate.trim(), "WHERE");
    self.where_clause = Some(trimmed.to_string()).filter(|p| !p.is_empty());
    self
  }

  /// Alias of [`StatementBuilder::where_clause`]
  pub fn with_filter(self, predicate: impl Into<String>) -> Self {
    self.where_clause(predicate)
  }

  /// Set the ordering clause. A leading `ORDER BY` is accepted and dropped.
  pub fn order_by(mut self, clause: impl Into<String>) -> Self {
    let clause = clause.into();
    let trimmed = strip_keyword(clause.trim(), "ORDER BY");
    self.order_by = Some(trimmed.to_string()).filter(|c| !c.is_empty());
    self
  }

  pub fn limit(mut self, limit: u64) -> Self {
    self.limit = Some(limit);
    self
  }

  pub fn offset(mut self, offset: u64) -> Self {
    self.offset = offset;
    self
  }

  /// Bind `value` to the `:name` placeholder, replacing any earlier binding.
  pub fn with_bind_variable(mut self, name: impl Into<String>, value: impl Into<BindValue>) -> Self {
    let key = name.into();
    let value = value.into();
    match self.values.iter_mut().find(|v| v.key == key) {
      Some(existing) => existing.value = value,
      None => self.values.push(StatementValue { key, value }),
    }
    self
  }

  /// Advance the paging window in place.
  pub fn increase_offset_by(&mut self, amount: u64) -> &mut Self {
    self.offset = self.offset.saturating_add(amount);
    self
  }

  pub fn current_offset(&self) -> u64 {
    self.offset
  }

  pub fn current_limit(&self) -> Option<u64> {
    self.limit
  }

  /// Drop the paging window, e.g. for action statements.
  pub fn remove_limit_and_offset(&mut self) -> &mut Self {
    self.limit = None;
    self.offset = 0;
    self
  }

  /// Validate and render the current state into a [`Statement`].
  pub fn to_statement(&self) -> Result<Statement> {
    match self.limit {
      Some(0) => {
        return Err(Error::InvalidStatement("LIMIT must be greater than zero".to_string()));
      }
      Some(limit) if limit > MAX_PAGE_LIMIT => {
        return Err(Error::InvalidStatement(format!(
          "LIMIT {} exceeds the maximum page size of {}",
          limit, MAX_PAGE_LIMIT
        )));
      }
      None if self.offset > 0 => {
        return Err(Error::InvalidStatement("OFFSET requires a LIMIT".to_string()));
      }
      _ => {}
    }

    if let Some(predicate) = &self.where_clause {
      for name in placeholders(predicate) {
        if !self.values.iter().any(|v| v.key == name) {
          return Err(Error::InvalidStatement(format!("No value bound for :{}", name)));
        }
      }
    }

    let mut parts = Vec::with_capacity(4);
    if let Some(predicate) = &self.where_clause {
      parts.push(format!("WHERE {}", predicate));
    }
    if let Some(order) = &self.order_by {
      parts.push(format!("ORDER BY {}", order));
    }
    if let Some(limit) = self.limit {
      parts.push(format!("LIMIT {}", limit));
      parts.push(format!("OFFSET {}", self.offset));
    }

    Ok(Statement {
      query: parts.join(" "),
      values: self.values.clone(),
      limit: self.limit,
      offset: self.offset,
    })
  }
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> &'a str {
  match text.get(..keyword.len()) {
    Some(head) if head.eq_ignore_ascii_case(keyword) => {
      let rest = &text[keyword.len()..];
      if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest.trim_start()
      } else {
        text
      }
    }
    _ => text,
  }
}

/// Names of `:placeholders` outside quoted literals.
fn placeholders(predicate: &str) -> Vec<String> {
  let mut names = Vec::new();
  let mut in_literal = false;
  let mut chars = predicate.chars().peekable();

  while let Some(c) = chars.next() {
    match c {
      '\'' => in_literal = !in_literal,
      ':' if !in_literal => {
        let mut name = String::new();
        while let Some(&next) = chars.peek() {
          if next.is_ascii_alphanumeric() || next == '_' {
            name.push(next);
            chars.next();
          } else {
            break;
          }
        }
        if !name.is_empty() && !names.contains(&name) {
          names.push(name);
        }
      }
      _ => {}
    }
  }

  names
}

#[cfg(test)]
mod tests {
  use super::*;

  fn usd_builder() -> StatementBuilder {
    StatementBuilder::new()
      .where_clause("currencyCode = :currencyCode")
      .order_by("id ASC")
      .limit(500)
      .with_bind_variable("currencyCode", "USD")
  }

  #[test]
  fn test_renders_full_query() {
    let statement = usd_builder().to_statement().unwrap();
    assert_eq!(
      statement.query,
      "WHERE currencyCode = :currencyCode ORDER BY id ASC LIMIT 500 OFFSET 0"
    );
    assert_eq!(statement.value("currencyCode"), Some(&BindValue::Text("USD".to_string())));
    assert_eq!(statement.limit(), Some(500));
    assert_eq!(statement.offset(), 0);
  }

  #[test]
  fn test_increase_offset_is_reflected_in_next_statement() {
    let mut builder = usd_builder();
    builder.increase_offset_by(500);
    builder.increase_offset_by(500);
    assert_eq!(builder.current_offset(), 1000);

    let statement = builder.to_statement().unwrap();
    assert!(statement.query.ends_with("LIMIT 500 OFFSET 1000"));
    assert_eq!(statement.offset(), 1000);
  }

  #[test]
  fn test_keywords_are_optional() {
    let statement = StatementBuilder::new()
      .where_clause("WHERE status = 'ACTIVE'")
      .order_by("ORDER BY name DESC")
      .to_statement()
      .unwrap();
    assert_eq!(statement.query, "WHERE status = 'ACTIVE' ORDER BY name DESC");
  }

  #[test]
  fn test_rejects_zero_and_oversized_limit() {
    let zero = StatementBuilder::new().limit(0).to_statement();
    assert!(matches!(zero, Err(Error::InvalidStatement(_))));

    let huge = StatementBuilder::new().limit(MAX_PAGE_LIMIT + 1).to_statement();
    assert!(matches!(huge, Err(Error::InvalidStatement(_))));
  }

  #[test]
  fn test_rejects_offset_without_limit() {
    let result = StatementBuilder::new().offset(10).to_statement();
    assert!(matches!(result, Err(Error::InvalidStatement(_))));
  }

  #[test]
  fn test_rejects_unbound_placeholder() {
    let result = StatementBuilder::new().where_clause("currencyCode = :currencyCode").to_statement();
    assert!(matches!(result, Err(Error::InvalidStatement(msg)) if msg.contains(":currencyCode")));
  }

  #[test]
  fn test_colons_inside_literals_are_not_placeholders() {
    let result = StatementBuilder::new().where_clause("name = 'Rates: 2016'").to_statement();
    assert!(result.is_ok());
  }

  #[test]
  fn test_rebinding_replaces_value_in_place() {
    let statement = usd_builder()
      .with_bind_variable("status", "ACTIVE")
      .with_bind_variable("currencyCode", "EUR")
      .to_statement()
      .unwrap();
    let keys: Vec<_> = statement.values.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(keys, vec!["currencyCode", "status"]);
    assert_eq!(statement.value("currencyCode"), Some(&BindValue::from("EUR")));
  }

  #[test]
  fn test_remove_limit_and_offset() {
    let mut builder = usd_builder();
    builder.increase_offset_by(500);
    builder.remove_limit_and_offset();
    let statement = builder.to_statement().unwrap();
    assert_eq!(statement.query, "WHERE currencyCode = :currencyCode ORDER BY id ASC");
    assert_eq!(statement.limit(), None);
  }

  #[test]
  fn test_wire_format() {
    let statement = StatementBuilder::new()
      .where_clause("id IN (:ids) AND isActive = :active")
      .with_bind_variable("ids", vec![1_i64, 2])
      .with_bind_variable("active", true)
      .to_statement()
      .unwrap();

    let json = serde_json::to_value(&statement).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "query": "WHERE id IN (:ids) AND isActive = :active",
        "values": [
          {"key": "ids", "value": {"type": "SetValue", "value": [
            {"type": "NumberValue", "value": 1},
            {"type": "NumberValue", "value": 2}
          ]}},
          {"key": "active", "value": {"type": "BooleanValue", "value": true}}
        ]
      })
    );
  }
}
