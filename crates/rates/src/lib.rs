//! Default exchange rates for Tripsplit.
//!
//! Rates are a convenience: the expense form is pre-filled with the day's
//! rate when one can be fetched, and the user types one in when it cannot.
//! Nothing in here ever blocks or fails share and balance computation.
//!
//! - `provider` - Rate source trait and the HTTP implementation
//! - `cache` - One cached rate per currency pair and day
//! - `service` - Lookup that degrades to `None` on any failure

pub mod cache;
pub mod error;
pub mod provider;
pub mod service;

pub use cache::DailyRateCache;
pub use error::RateError;
pub use provider::{HttpRateProvider, RateProvider};
pub use service::RateService;
