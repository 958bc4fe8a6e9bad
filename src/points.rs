//! Points
//!
//! A user's spendable balance. Points are whole, non-negative numbers:
//! credits saturate and debits never overdraw.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points awarded for every newly collected stamp unless configured otherwise.
pub const DEFAULT_POINTS_PER_STAMP: u64 = 50;

/// A debit was larger than the available balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient points: balance {balance}, required {required}")]
pub struct InsufficientPoints {
    /// Balance at the time of the debit.
    pub balance: Points,

    /// Amount that was requested.
    pub required: Points,
}

impl InsufficientPoints {
    /// How many more points are needed for the debit to succeed.
    #[must_use]
    pub const fn shortfall(&self) -> Points {
        Points(self.required.0.saturating_sub(self.balance.0))
    }
}

/// A points balance or amount.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u64);

impl Points {
    /// No points.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw amount.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Add `amount` to the balance.
    #[must_use]
    pub const fn credit(self, amount: Self) -> Self {
        Self(self.0.saturating_add(amount.0))
    }

    /// Subtract `amount` from the balance.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientPoints`] when the balance is smaller than `amount`;
    /// the balance is left untouched.
    pub const fn debit(self, amount: Self) -> Result<Self, InsufficientPoints> {
        match self.0.checked_sub(amount.0) {
            Some(remaining) => Ok(Self(remaining)),
            None => Err(InsufficientPoints {
                balance: self,
                required: amount,
            }),
        }
    }

    /// Decode a balance from its persisted string form.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not a non-negative integer.
    pub fn decode(value: &str) -> Result<Self, ParseIntError> {
        value.trim().parse()
    }

    /// Encode the balance into its persisted string form.
    #[must_use]
    pub fn encode(self) -> String {
        self.0.to_string()
    }
}

impl From<u64> for Points {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Points> for u64 {
    fn from(value: Points) -> Self {
        value.0
    }
}

impl FromStr for Points {
    type Err = ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.parse().map(Self)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn credit_adds_to_balance() {
        let balance = Points::ZERO.credit(Points::new(50)).credit(Points::new(50));

        assert_eq!(balance, Points::new(100));
    }

    #[test]
    fn credit_saturates_instead_of_wrapping() {
        let balance = Points::new(u64::MAX).credit(Points::new(1));

        assert_eq!(balance, Points::new(u64::MAX));
    }

    #[test]
    fn debit_subtracts_when_balance_is_sufficient() -> TestResult {
        let balance = Points::new(150).debit(Points::new(100))?;

        assert_eq!(balance, Points::new(50));

        Ok(())
    }

    #[test]
    fn debit_of_exact_balance_leaves_zero() -> TestResult {
        let balance = Points::new(100).debit(Points::new(100))?;

        assert_eq!(balance, Points::ZERO);

        Ok(())
    }

    #[test]
    fn debit_rejects_overdraw() {
        let result = Points::new(30).debit(Points::new(100));

        assert_eq!(
            result,
            Err(InsufficientPoints {
                balance: Points::new(30),
                required: Points::new(100),
            })
        );
    }

    #[test]
    fn shortfall_reports_missing_points() {
        let error = InsufficientPoints {
            balance: Points::new(30),
            required: Points::new(100),
        };

        assert_eq!(error.shortfall(), Points::new(70));
    }

    #[test]
    fn decode_accepts_stringified_integers() -> TestResult {
        assert_eq!(Points::decode("150")?, Points::new(150));
        assert_eq!(Points::decode(" 7 ")?, Points::new(7));

        Ok(())
    }

    #[test]
    fn decode_rejects_negative_and_fractional_values() {
        assert!(Points::decode("-5").is_err());
        assert!(Points::decode("1.5").is_err());
        assert!(Points::decode("").is_err());
    }
}
