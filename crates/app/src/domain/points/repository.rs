//! Points Repository

use masar::points::{InsufficientPoints, Points};
use tracing::warn;

use crate::storage::{LedgerKey, UserTransaction};

#[derive(Debug, Clone, Default)]
pub(crate) struct StorePointsRepository;

impl StorePointsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Current balance. A missing or unreadable value counts as zero.
    pub(crate) fn balance(&self, tx: &UserTransaction) -> Points {
        let Some(raw) = tx.get(LedgerKey::UserPoints) else {
            return Points::ZERO;
        };

        Points::decode(raw).unwrap_or_else(|error| {
            warn!(
                user = %tx.user(),
                key = %LedgerKey::UserPoints,
                %error,
                value = raw,
                "discarding unreadable points balance"
            );

            Points::ZERO
        })
    }

    pub(crate) fn credit(&self, tx: &mut UserTransaction, amount: Points) -> Points {
        let balance = self.balance(tx).credit(amount);

        tx.set(LedgerKey::UserPoints, balance.encode());

        balance
    }

    pub(crate) fn debit(
        &self,
        tx: &mut UserTransaction,
        amount: Points,
    ) -> Result<Points, InsufficientPoints> {
        let balance = self.balance(tx).debit(amount)?;

        tx.set(LedgerKey::UserPoints, balance.encode());

        Ok(balance)
    }
}
