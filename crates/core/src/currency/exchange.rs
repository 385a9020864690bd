//! Exchange rate types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Exchange rate between two currencies at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Base currency code.
    pub base: String,
    /// Target currency code.
    pub target: String,
    /// Exchange rate (1 base = rate target).
    pub rate: Decimal,
    /// When this rate was captured.
    pub captured_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        base: String,
        target: String,
        rate: Decimal,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            base,
            target,
            rate,
            captured_at,
        }
    }

    /// Returns true if this rate covers the given pair.
    #[must_use]
    pub fn covers(&self, base: &str, target: &str) -> bool {
        self.base == base && self.target == target
    }
}
