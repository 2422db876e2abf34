//! Trip ledger: expenses, settlements, net balances, and settlement plans.
//!
//! This module implements the core ledger functionality:
//! - Expense records computed from user drafts
//! - Recorded settlements and suggested transfers
//! - Net balance calculation
//! - Greedy settlement planning

pub mod balance;
pub mod expense;
pub mod planner;
pub mod settlement;

#[cfg(test)]
mod props;

pub use balance::{NetBalances, compute_net_balances};
pub use expense::{Expense, ExpenseDraft};
pub use planner::{apply_transfers, suggest_transfers};
pub use settlement::{Settlement, Transfer};
