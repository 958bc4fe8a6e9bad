//! Points

pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::PointsServiceError;
pub use service::*;
