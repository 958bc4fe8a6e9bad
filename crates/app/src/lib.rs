//! Masar application services over a local key-value ledger.

pub mod clock;
pub mod context;
pub mod domain;
pub mod storage;

#[cfg(test)]
mod test;
