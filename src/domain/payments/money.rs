//! Money value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used when the caller omits one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// A positive amount in the currency's smallest unit (cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    /// Converts a major-unit amount (e.g. dollars) to minor units, rounding
    /// half away from zero.
    ///
    /// Returns `None` for non-finite values, for anything that rounds to
    /// zero or below, and for amounts that do not fit in an `i64`.
    pub fn from_major(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let minor = (amount * 100.0).round();
        if minor < 1.0 || minor >= i64::MAX as f64 {
            return None;
        }
        Some(Self(minor as i64))
    }

    /// Accepts an amount already expressed in minor units.
    pub fn try_new(minor: i64) -> Option<Self> {
        (minor > 0).then_some(Self(minor))
    }

    /// Returns the value in minor units.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Three-letter ISO currency code, lowercased the way Stripe reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Normalizes a caller-supplied code; blank or missing means USD.
    pub fn or_default(code: Option<&str>) -> Self {
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Self(code.to_ascii_lowercase()),
            None => Self(DEFAULT_CURRENCY.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
