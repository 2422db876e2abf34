//! Share allocation across trip participants.
//!
//! Every policy returns one integer share per participant and the shares
//! always add up to the total exactly. No minor unit is lost or invented.

pub mod allocator;
pub mod policy;

#[cfg(test)]
mod props;

pub use allocator::{Shares, allocate, equal_split};
pub use policy::{SplitMode, SplitPolicy};
