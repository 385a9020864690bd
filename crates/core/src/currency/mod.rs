//! Currency and exchange-rate logic.
//!
//! Rates are append-only and time-ordered; "latest" always means the most
//! recent capture for the exact pair. Resolution tries the direct pair,
//! then the inverse pair, and otherwise fails — rates are never chained
//! through a third currency.

pub mod conversion;
pub mod exchange;

pub use conversion::{ConvertedAmount, RateError, convert_amount, resolve_pair_rate, round_money};
pub use exchange::ExchangeRate;
