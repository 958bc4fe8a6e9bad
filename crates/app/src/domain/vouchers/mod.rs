//! Vouchers

pub mod codes;
pub mod countdown;
pub mod errors;
mod repository;
pub mod service;

pub use errors::{RedemptionError, VouchersServiceError};
pub use service::*;
