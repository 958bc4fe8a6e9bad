//! Stamps Repository

use masar::stamps::StampBook;
use tracing::warn;

use crate::storage::{LedgerKey, StorageError, UserTransaction};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreStampsRepository;

impl StoreStampsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The user's stamp book. A missing or unreadable value is an empty book.
    pub(crate) fn stamp_book(&self, tx: &UserTransaction) -> StampBook {
        let Some(raw) = tx.get(LedgerKey::CollectedStamps) else {
            return StampBook::new();
        };

        StampBook::decode(raw).unwrap_or_else(|error| {
            warn!(
                user = %tx.user(),
                key = %LedgerKey::CollectedStamps,
                %error,
                "discarding unreadable stamp book"
            );

            StampBook::new()
        })
    }

    pub(crate) fn save_stamp_book(
        &self,
        tx: &mut UserTransaction,
        book: &StampBook,
    ) -> Result<(), StorageError> {
        let encoded = book.encode().map_err(StorageError::Encode)?;

        tx.set(LedgerKey::CollectedStamps, encoded);

        Ok(())
    }
}
