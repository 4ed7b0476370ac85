//! # dfp-client
//!
//! A DFP (ad-management) API client for Rust focused on statement-based
//! listing calls.
//!
//! ## Features
//!
//! - **Sessions**: OAuth2 bearer credential plus network code and application name
//! - **Service lookup**: services by remote name and API version
//! - **Paging**: [`PagedQueryRunner`] walks a statement through every page
//! - **Rate Limiting**: one `governor` limiter shared by a session's services
//! - **Opt-in retries**: [`RetryingService`] wraps any [`RecordService`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dfp_client::{DfpServices, DfpSessionBuilder, OAuth2TokenBuilder, PagedQueryRunner};
//! use dfp_core::{Config, StatementBuilder, SUGGESTED_PAGE_LIMIT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credential = OAuth2TokenBuilder::new().load_env().build()?;
//!     let session = DfpSessionBuilder::from_config(&Config::from_env()?)
//!         .with_oauth2_credential(credential)
//!         .build()?;
//!     let rate_cards = DfpServices::new().get(&session, "RateCardService", "v201602")?
//!         .into_rate_card_service()?;
//!
//!     let statement = StatementBuilder::new()
//!         .where_clause("currencyCode = :currencyCode")
//!         .order_by("id ASC")
//!         .limit(SUGGESTED_PAGE_LIMIT)
//!         .with_bind_variable("currencyCode", "USD");
//!
//!     let summary = PagedQueryRunner::new(&rate_cards, statement)?
//!         .for_each(|r| println!("{}) {}", r.sequence, r.record.name))
//!         .await?;
//!     println!("Number of results found: {}", summary.total_result_set_size);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All methods return `Result<T, dfp_core::Error>` for consistent error handling
//! across the dfp-* crates.

#![warn(clippy::all)]

pub mod credentials;
pub mod endpoints;
pub mod pager;
pub mod retry;
pub mod services;
pub mod session;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use credentials::{OAuth2Credential, OAuth2TokenBuilder};
pub use dfp_core::{Config, Error, Result};
pub use endpoints::rate_card::RateCardService;
pub use pager::{IndexedRecord, PagedQueryRunner, PagedResults, PagingSummary, RecordService};
pub use retry::RetryingService;
pub use services::{DfpServices, ServiceHandle};
pub use session::{DfpSession, DfpSessionBuilder};
