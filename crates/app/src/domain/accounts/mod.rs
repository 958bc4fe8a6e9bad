//! Accounts

pub mod errors;
pub mod records;
pub mod service;

pub use errors::AccountsServiceError;
pub use service::*;
