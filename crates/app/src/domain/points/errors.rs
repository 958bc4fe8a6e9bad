//! Points service errors.

use masar::points::InsufficientPoints;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PointsServiceError {
    #[error(transparent)]
    InsufficientPoints(#[from] InsufficientPoints),

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("storage error")]
    Storage(#[from] StorageError),
}
