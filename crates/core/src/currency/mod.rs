//! Multi-currency handling and exchange rates.

pub mod conversion;
pub mod exchange;

#[cfg(test)]
mod props;

pub use conversion::{Conversion, convert, resolve_rate};
pub use exchange::ExchangeRate;
