//! Voucher service errors.

use masar::{
    points::InsufficientPoints,
    vouchers::{VoucherId, VoucherState},
};
use thiserror::Error;

use crate::storage::StorageError;

/// Reasons a reward could not be redeemed.
#[derive(Debug, Error)]
pub enum RedemptionError {
    #[error("unknown reward {0}")]
    UnknownReward(String),

    #[error("voucher {voucher} is still active")]
    ActiveVoucherExists { voucher: VoucherId },

    #[error(transparent)]
    InsufficientPoints(#[from] InsufficientPoints),

    #[error("could not generate a unique voucher code")]
    CodeGeneration,

    #[error("voucher expiry is out of range")]
    Timestamp(#[from] jiff::Error),

    #[error("storage error")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum VouchersServiceError {
    #[error("voucher not found")]
    NotFound,

    #[error("voucher is {0}")]
    NotActive(VoucherState),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
