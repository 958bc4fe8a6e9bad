//! Accounts service errors.

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AccountsServiceError {
    #[error("storage error")]
    Storage(#[from] StorageError),
}
