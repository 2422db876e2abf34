//! Common types used across the application.

pub mod id;
pub mod money;
pub mod participant;

pub use id::*;
pub use money::{Currency, Money, MoneyError, UnknownCurrency};
pub use participant::ParticipantId;
