pub mod rate_cards;
