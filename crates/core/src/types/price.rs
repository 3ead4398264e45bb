//! Fixed-point rupee price type.
//!
//! [`Price`] stores paise (hundredths of a rupee) as an `i64`, so the
//! 2-decimal rounding and formatting required by the prediction contract
//! are exact rather than subject to floating-point display drift.
//! `Price::from_f64(5_700_000.0).formatted()` yields `"₹5,700,000.00"`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An amount of Indian rupees with paise precision.
///
/// # Examples
///
/// ```
/// use hv_core::types::Price;
///
/// let price = Price::from_f64(50000.504);
/// assert_eq!(price.to_f64(), 50000.50);
/// assert_eq!(price.formatted(), "₹50,000.50");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    paise: i64,
}

impl Price {
    /// Create a price from a raw paise count.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Create a price from a rupee amount, rounding half away from zero
    /// to the nearest paisa.
    #[inline]
    pub fn from_f64(rupees: f64) -> Self {
        Self {
            paise: (rupees * 100.0).round() as i64,
        }
    }

    /// The zero price.
    #[inline]
    pub const fn zero() -> Self {
        Self { paise: 0 }
    }

    /// Returns `true` if this price is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.paise == 0
    }

    /// Returns the raw paise count.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.paise
    }

    /// Convert back to rupees as `f64`. Exact for amounts below 2^53 paise.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.paise as f64 / 100.0
    }

    /// Currency display: `₹` prefix, thousands-separated whole part, two
    /// decimal places. Negative amounts render as `₹-1,234.56`.
    pub fn formatted(&self) -> String {
        let whole = (self.paise / 100).unsigned_abs();
        let frac = (self.paise % 100).unsigned_abs();
        let sign = if self.paise < 0 { "-" } else { "" };

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("₹{sign}{grouped}.{frac:02}")
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.paise < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:02}",
            (self.paise / 100).unsigned_abs(),
            (self.paise % 100).unsigned_abs()
        )
    }
}

impl From<f64> for Price {
    fn from(rupees: f64) -> Self {
        Self::from_f64(rupees)
    }
}
