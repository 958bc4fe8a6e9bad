//! Voucher code generation.

use std::fmt::Debug;

use masar::vouchers::{VOUCHER_CODE_LEN, VoucherCode};
use rand::{Rng, distributions::Alphanumeric};

/// Produces candidate voucher codes. Uniqueness is checked by the caller.
pub trait VoucherCodeGenerator: Debug + Send + Sync {
    fn generate(&self) -> VoucherCode;
}

/// Random uppercase alphanumeric codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl VoucherCodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> VoucherCode {
        VoucherCode::from_chars(
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(VOUCHER_CODE_LEN)
                .map(char::from),
        )
    }
}
