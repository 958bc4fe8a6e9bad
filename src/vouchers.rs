//! Vouchers
//!
//! A voucher is issued when a reward is redeemed and stays usable for a fixed
//! window. The stored status records how a voucher left the active state;
//! [`Voucher::state_at`] folds in the passage of time so expiry can be decided
//! without a running timer.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::points::Points;

/// How long a voucher stays usable after it is issued.
pub const VOUCHER_LIFETIME: SignedDuration = SignedDuration::from_secs(60 * 60);

/// Number of characters in a voucher code.
pub const VOUCHER_CODE_LEN: usize = 8;

/// Voucher identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(Uuid);

impl VoucherId {
    /// Generate a new, time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for VoucherId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VoucherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque code presented at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherCode(String);

impl VoucherCode {
    /// Build a code from characters, upper-casing them.
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self(chars.into_iter().map(|c| c.to_ascii_uppercase()).collect())
    }

    /// The code as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoucherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted status of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum VoucherStatus {
    /// Issued and not yet consumed or expired.
    Active,

    /// Explicitly consumed by the user.
    #[serde(rename_all = "camelCase")]
    Used {
        /// When the voucher was consumed.
        used_at: Timestamp,
    },

    /// Passed its expiry time without being consumed.
    #[serde(rename_all = "camelCase")]
    Expired {
        /// When the voucher stopped being usable.
        expired_at: Timestamp,
    },
}

/// Effective state of a voucher at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoucherState {
    /// Can still be presented.
    Active,

    /// Consumed.
    Used,

    /// Timed out.
    Expired,
}

impl VoucherState {
    /// Whether the voucher can no longer be presented.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for VoucherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voucher issued for a redeemed reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// Identifier.
    pub id: VoucherId,

    /// Reward this voucher was issued for.
    pub reward_id: String,

    /// Points debited to issue the voucher.
    pub points_cost: Points,

    /// When the voucher was issued.
    pub issued_at: Timestamp,

    /// When the voucher stops being usable.
    pub expires_at: Timestamp,

    /// Code presented at checkout.
    pub code: VoucherCode,

    /// How the voucher left the active state, if it has.
    pub status: VoucherStatus,
}

impl Voucher {
    /// Issue a voucher at `issued_at` that expires after [`VOUCHER_LIFETIME`].
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry time is out of range.
    pub fn issue(
        reward_id: &str,
        points_cost: Points,
        code: VoucherCode,
        issued_at: Timestamp,
    ) -> Result<Self, jiff::Error> {
        Ok(Self {
            id: VoucherId::new(),
            reward_id: reward_id.to_string(),
            points_cost,
            issued_at,
            expires_at: issued_at.checked_add(VOUCHER_LIFETIME)?,
            code,
            status: VoucherStatus::Active,
        })
    }

    /// Effective state at `now`.
    #[must_use]
    pub fn state_at(&self, now: Timestamp) -> VoucherState {
        match self.status {
            VoucherStatus::Used { .. } => VoucherState::Used,
            VoucherStatus::Expired { .. } => VoucherState::Expired,
            VoucherStatus::Active if now >= self.expires_at => VoucherState::Expired,
            VoucherStatus::Active => VoucherState::Active,
        }
    }

    /// Whether the voucher has left the active state, however it did so.
    #[must_use]
    pub fn is_used(&self, now: Timestamp) -> bool {
        self.state_at(now).is_terminal()
    }

    /// Seconds until expiry, see [`remaining_seconds`].
    #[must_use]
    pub fn remaining_seconds(&self, now: Timestamp) -> u64 {
        remaining_seconds(now, self.expires_at)
    }
}

/// Seconds from `now` until `expires_at`, rounded up and clamped at zero.
///
/// Zero exactly when `now >= expires_at`, matching [`Voucher::state_at`].
#[must_use]
pub fn remaining_seconds(now: Timestamp, expires_at: Timestamp) -> u64 {
    let remaining = expires_at.duration_since(now);

    if remaining.is_negative() || remaining.is_zero() {
        return 0;
    }

    let partial = i64::from(remaining.subsec_nanos() > 0);

    u64::try_from(remaining.as_secs().saturating_add(partial)).unwrap_or(0)
}

/// Render a countdown as `MM:SS`.
#[must_use]
pub fn format_countdown(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// The voucher that is still usable at `now`, if any.
pub fn active_voucher(vouchers: &[Voucher], now: Timestamp) -> Option<&Voucher> {
    vouchers
        .iter()
        .find(|voucher| voucher.state_at(now) == VoucherState::Active)
}

/// Record expiry on every voucher whose window has closed by `now`.
///
/// The recorded expiry time is the voucher's own `expires_at`, not `now`, so
/// settling late does not move the history. Returns how many changed.
pub fn settle_expired(vouchers: &mut [Voucher], now: Timestamp) -> usize {
    let mut settled = 0;

    for voucher in vouchers.iter_mut() {
        if voucher.status == VoucherStatus::Active && voucher.state_at(now) == VoucherState::Expired
        {
            voucher.status = VoucherStatus::Expired {
                expired_at: voucher.expires_at,
            };
            settled += 1;
        }
    }

    settled
}
