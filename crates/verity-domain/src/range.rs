//! Numeric range module

use serde::{Deserialize, Serialize};

/// Smallest lower bound accepted for a monetary range.
///
/// Anything below this is far more likely to be a percentage, a year, or a
/// page number than a price.
pub const PLAUSIBILITY_FLOOR: f64 = 10_000.0;

/// A currency/quantity interval `[low, high]` extracted from a miner answer
///
/// Construction enforces `low >= PLAUSIBILITY_FLOOR` and `high > low`, so any
/// `NumericRange` value in the system is plausible by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Lower bound
    pub low: f64,
    /// Upper bound
    pub high: f64,
}

impl NumericRange {
    /// Create a range, returning `None` if it is not plausible
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::NumericRange;
    ///
    /// assert!(NumericRange::new(100_000.0, 110_000.0).is_some());
    /// assert!(NumericRange::new(300.0, 400.0).is_none());
    /// assert!(NumericRange::new(120_000.0, 110_000.0).is_none());
    /// ```
    pub fn new(low: f64, high: f64) -> Option<Self> {
        if !low.is_finite() || !high.is_finite() {
            return None;
        }
        if low < PLAUSIBILITY_FLOOR || high <= low {
            return None;
        }
        Some(Self { low, high })
    }

    /// Length of the intersection with another range (0 when disjoint)
    pub fn overlap(&self, other: &NumericRange) -> f64 {
        (self.high.min(other.high) - self.low.max(other.low)).max(0.0)
    }

    /// Check if the range contains a value
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}
