//! Test support

mod fakes;

pub(crate) use context::TestContext;
pub(crate) use fakes::{FailingBackend, FixedCodes, TokioClock};
