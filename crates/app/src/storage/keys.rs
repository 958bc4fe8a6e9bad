//! Storage Keys

use std::fmt;

use crate::domain::accounts::records::UserId;

/// A per-user ledger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerKey {
    /// Emirate → collected stamps.
    CollectedStamps,

    /// Stringified points balance.
    UserPoints,

    /// Append-only voucher history.
    RedeemedRewards,
}

impl LedgerKey {
    /// Every value stored for a user.
    pub const ALL: [Self; 3] = [Self::CollectedStamps, Self::UserPoints, Self::RedeemedRewards];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectedStamps => "collectedStamps",
            Self::UserPoints => "userPoints",
            Self::RedeemedRewards => "redeemedRewards",
        }
    }

    /// The key under which `user`'s value is stored.
    #[must_use]
    pub fn namespaced(self, user: &UserId) -> String {
        format!("{user}_{}", self.as_str())
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn keys_are_prefixed_with_the_user() -> TestResult {
        let user = UserId::new("explorer@example.com")?;

        assert_eq!(
            LedgerKey::UserPoints.namespaced(&user),
            "explorer@example.com_userPoints"
        );
        assert_eq!(
            LedgerKey::CollectedStamps.namespaced(&user),
            "explorer@example.com_collectedStamps"
        );

        Ok(())
    }
}
