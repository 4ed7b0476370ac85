//! Rate card records returned by `RateCardService`

use crate::page::Page;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rate card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateCardStatus {
  Active,
  Inactive,
  Archived,
  /// Value not known to this client version
  #[serde(other)]
  Unknown,
}

/// Whether rates on the card are quoted net or gross of agency commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
  Net,
  Gross,
  #[serde(other)]
  Unknown,
}

/// A rate card: a named set of rates in one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
  /// Server-assigned identifier
  pub id: i64,

  /// Display name, unique within the network
  pub name: String,

  /// ISO 4217 code of the currency rates are quoted in
  pub currency_code: String,

  #[serde(default)]
  pub status: Option<RateCardStatus>,

  #[serde(default)]
  pub pricing_model: Option<PricingModel>,

  /// Rate from `currency_code` to the network currency, in micros
  #[serde(default)]
  pub foreign_exchange_rate: Option<i64>,

  #[serde(default)]
  pub for_marketplace: Option<bool>,

  /// Teams allowed to use this rate card
  #[serde(default)]
  pub applied_team_ids: Vec<i64>,
}

impl RateCard {
  pub fn is_active(&self) -> bool {
    self.status == Some(RateCardStatus::Active)
  }

  /// Exchange rate to the network currency as an exact decimal
  pub fn exchange_rate(&self) -> Option<Decimal> {
    self.foreign_exchange_rate.map(|micros| Decimal::new(micros, 6).normalize())
  }
}

/// Page of rate cards as returned by `getRateCardsByStatement`
pub type RateCardPage = Page<RateCard>;

#[cfg(test)]
mod tests {
  use super::*;
  use std::str::FromStr;

  #[test]
  fn test_rate_card_deserialization() {
    let json = r#"{
      "id": 4201,
      "name": "North America 2016",
      "currencyCode": "USD",
      "status": "ACTIVE",
      "pricingModel": "NET",
      "foreignExchangeRate": 1250000,
      "appliedTeamIds": [11, 12]
    }"#;

    let card: RateCard = serde_json::from_str(json).unwrap();
    assert_eq!(card.id, 4201);
    assert_eq!(card.name, "North America 2016");
    assert_eq!(card.currency_code, "USD");
    assert!(card.is_active());
    assert_eq!(card.pricing_model, Some(PricingModel::Net));
    assert_eq!(card.exchange_rate(), Some(Decimal::from_str("1.25").unwrap()));
    assert_eq!(card.applied_team_ids, vec![11, 12]);
    assert_eq!(card.for_marketplace, None);
  }

  #[test]
  fn test_unknown_enum_values_are_tolerated() {
    let json = r#"{"id": 1, "name": "Legacy", "currencyCode": "EUR", "status": "PAUSED", "pricingModel": "HYBRID"}"#;
    let card: RateCard = serde_json::from_str(json).unwrap();
    assert_eq!(card.status, Some(RateCardStatus::Unknown));
    assert_eq!(card.pricing_model, Some(PricingModel::Unknown));
    assert!(!card.is_active());
  }

  #[test]
  fn test_rate_card_page() {
    let json = r#"{
      "results": [
        {"id": 1, "name": "A", "currencyCode": "USD"},
        {"id": 2, "name": "B", "currencyCode": "USD"}
      ],
      "startIndex": 0,
      "totalResultSetSize": 3
    }"#;
    let page: RateCardPage = serde_json::from_str(json).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page.total_result_set_size, 3);
    assert_eq!(page.records()[1].name, "B");
  }

  #[test]
  fn test_rate_card_page_without_results_is_absent() {
    let page: RateCardPage =
      serde_json::from_str(r#"{"startIndex": 0, "totalResultSetSize": 0}"#).unwrap();
    assert!(page.is_absent());
    assert_eq!(page.total_result_set_size, 0);

    let page: RateCardPage = serde_json::from_str(r#"{"results": null}"#).unwrap();
    assert!(page.is_absent());
    assert_eq!(page.start_index, 0);
  }
}
