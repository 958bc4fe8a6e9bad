//! Masar prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    emirates::{Emirate, Location, UnknownEmirate},
    passport::{EmirateProgress, Passport},
    points::{DEFAULT_POINTS_PER_STAMP, InsufficientPoints, Points},
    rewards::{Reward, RewardCatalog, RewardCatalogError},
    scan::{ScanError, ScannedStamp},
    stamps::{StampBook, StampInsert, StampRecord},
    vouchers::{
        VOUCHER_CODE_LEN, VOUCHER_LIFETIME, Voucher, VoucherCode, VoucherId, VoucherState,
        VoucherStatus, active_voucher, format_countdown, remaining_seconds, settle_expired,
    },
};
