//! Fixed-point price type.
//!
//! Uses a cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Prices are capped
//! at 7 total digits with 2 decimal places (max 99999.99); anything
//! outside that range is a validation error, never a silent truncation.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest representable amount in cents (99999.99).
pub const MAX_PRICE_CENTS: i64 = 9_999_999;

/// Default price applied when a product is created without one (99.99).
pub const DEFAULT_PRICE_CENTS: i64 = 9_999;

/// A catalog price.
///
/// Stored as whole cents; two fractional digits are always implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from whole cents, validating the representable range.
    pub fn from_cents(cents: i64) -> Result<Self, CatalogError> {
        if cents < 0 {
            return Err(CatalogError::validation("price must not be negative"));
        }
        if cents > MAX_PRICE_CENTS {
            return Err(CatalogError::validation(format!(
                "price {}.{:02} exceeds maximum 99999.99",
                cents / 100,
                cents % 100
            )));
        }
        Ok(Self(cents))
    }

    /// Parse a decimal string such as `"19.99"` or `"19"`.
    ///
    /// More than two fractional digits is rejected outright - a caller
    /// sending `"19.999"` gets an error, not a rounded value.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CatalogError::validation("empty price"));
        }

        let (whole, frac) = match s.split_once('.') {
            // A bare trailing dot ("19.") is malformed, not 19.00.
            Some((_, "")) => {
                return Err(CatalogError::validation(format!("malformed price: {s}")));
            }
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if frac.len() > 2 {
            return Err(CatalogError::validation(format!(
                "price {s} has more than 2 decimal places"
            )));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(CatalogError::validation(format!("malformed price: {s}")));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CatalogError::validation(format!("malformed price: {s}")))?
        };

        // Pad "9" -> 90 cents, "99" -> 99 cents.
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse::<i64>().unwrap_or(0),
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(|| CatalogError::validation(format!("price {s} out of range")))?;

        Self::from_cents(cents)
    }

    /// The amount in whole cents.
    pub fn cents(&self) -> i64 {
        self.0
    }
}

impl Default for Price {
    /// 99.99, the catalog-wide default.
    fn default() -> Self {
        Self(DEFAULT_PRICE_CENTS)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
