//! Core splitting logic for Tripsplit.
//!
//! This crate contains pure computation with ZERO network or storage dependencies.
//! Amounts are integer minor units end to end; floats never touch money.
//!
//! # Modules
//!
//! - `money` - Parsing and formatting of minor-unit amounts
//! - `currency` - Conversion into the trip base currency
//! - `allocation` - Exact, equal, percent and weight splits
//! - `ledger` - Expenses, settlements, net balances and settlement plans
//! - `trip` - Membership, invites and the snapshot summary

pub mod allocation;
pub mod currency;
pub mod error;
pub mod ledger;
pub mod money;
pub mod trip;

pub use error::{IntegrityError, ValidationError};
