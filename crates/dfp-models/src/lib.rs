//! # dfp-models
//!
//! Data models for DFP API responses.
//!
//! This crate provides strongly-typed Rust structures for the responses of
//! statement-based listing calls: the generic [`Page`] envelope and the
//! records it carries, such as [`RateCard`].
//!
//! ## Usage
//!
//! ```ignore
//! use dfp_models::{Page, RateCard};
//!
//! let page: Page<RateCard> = serde_json::from_str(&response_json)?;
//! println!("{} rate cards match", page.total_result_set_size);
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod page;
pub mod rate_card;

pub use common::*;
pub use page::*;
pub use rate_card::*;
