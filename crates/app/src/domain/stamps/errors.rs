//! Stamps service errors.

use masar::scan::ScanError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StampsServiceError {
    #[error(transparent)]
    InvalidScan(#[from] ScanError),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
