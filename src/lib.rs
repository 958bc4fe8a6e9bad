//! Masar
//!
//! Masar is the progress and rewards ledger behind a UAE landmark passport:
//! visitors scan QR codes at landmarks to collect stamps per emirate, earn
//! points for each new stamp, and exchange points for time-boxed partner
//! vouchers.
//!
//! This crate is the pure core. It holds no storage, clock or randomness; the
//! caller supplies `now` and persists the encoded values.

pub mod emirates;
pub mod passport;
pub mod points;
pub mod prelude;
pub mod rewards;
pub mod scan;
pub mod stamps;
pub mod vouchers;
