//! Test doubles

use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use jiff::Timestamp;
use masar::vouchers::VoucherCode;
use tokio::time::Instant;

use crate::{
    clock::Clock,
    domain::vouchers::codes::VoucherCodeGenerator,
    storage::{Entries, MemoryBackend, StorageBackend, StorageError},
};

/// An in-memory backend that fails to persist once its allowance of
/// successful writes is used up.
#[derive(Debug, Default)]
pub(crate) struct FailingBackend {
    inner: MemoryBackend,
    successes: AtomicUsize,
}

impl FailingBackend {
    pub fn after(successes: usize) -> Self {
        Self {
            inner: MemoryBackend::default(),
            successes: AtomicUsize::new(successes),
        }
    }
}

#[async_trait]
impl StorageBackend for FailingBackend {
    async fn load(&self) -> Result<Entries, StorageError> {
        self.inner.load().await
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let allowed = self
            .successes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if allowed {
            self.inner.persist(entries).await
        } else {
            Err(io::Error::other("disk full").into())
        }
    }
}

/// Hands out the given codes in order, cycling.
#[derive(Debug)]
pub(crate) struct FixedCodes {
    codes: Vec<VoucherCode>,
    next: AtomicUsize,
}

impl FixedCodes {
    pub fn new<const N: usize>(codes: [&str; N]) -> Self {
        Self {
            codes: codes
                .into_iter()
                .map(|code| VoucherCode::from_chars(code.chars()))
                .collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl VoucherCodeGenerator for FixedCodes {
    fn generate(&self) -> VoucherCode {
        let index = self.next.fetch_add(1, Ordering::SeqCst) % self.codes.len().max(1);

        self.codes
            .get(index)
            .cloned()
            .expect("FixedCodes needs at least one code")
    }
}

/// Wall clock driven by tokio's (pausable) time.
#[derive(Debug)]
pub(crate) struct TokioClock {
    origin: Timestamp,
    started: Instant,
}

impl TokioClock {
    pub fn new(origin: Timestamp) -> Self {
        Self {
            origin,
            started: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        self.origin
            .checked_add(self.started.elapsed())
            .expect("Test clock out of range")
    }
}
