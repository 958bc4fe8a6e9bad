//! Masar Domain Concerns

pub mod accounts;
pub mod points;
pub mod stamps;
pub mod vouchers;
