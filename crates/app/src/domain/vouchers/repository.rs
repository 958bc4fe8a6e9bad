//! Vouchers Repository

use masar::vouchers::Voucher;
use tracing::warn;

use crate::storage::{LedgerKey, StorageError, UserTransaction};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreVouchersRepository;

impl StoreVouchersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Vouchers in issue order. A missing or unreadable value is no vouchers.
    pub(crate) fn vouchers(&self, tx: &UserTransaction) -> Vec<Voucher> {
        let Some(raw) = tx.get(LedgerKey::RedeemedRewards) else {
            return Vec::new();
        };

        serde_json::from_str(raw).unwrap_or_else(|error| {
            warn!(
                user = %tx.user(),
                key = %LedgerKey::RedeemedRewards,
                %error,
                "discarding unreadable voucher history"
            );

            Vec::new()
        })
    }

    pub(crate) fn save_vouchers(
        &self,
        tx: &mut UserTransaction,
        vouchers: &[Voucher],
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(vouchers).map_err(StorageError::Encode)?;

        tx.set(LedgerKey::RedeemedRewards, encoded);

        Ok(())
    }
}
