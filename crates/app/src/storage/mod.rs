//! Ledger storage
//!
//! Every ledger value is a string stored under a key namespaced by user. Reads
//! and writes happen inside a [`UserTransaction`], which holds the store lock
//! until it is committed or dropped, so a check-then-write sequence (such as
//! "is the balance high enough? then debit") cannot interleave with another.
//!
//! The backend is the source of truth. A transaction reads a fresh copy of it
//! when it begins, and commit merges only the user's staged keys into another
//! fresh copy, so writes other processes made to other users survive.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::accounts::records::UserId;

mod backends;
mod errors;
mod keys;

pub use backends::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use errors::StorageError;
pub use keys::LedgerKey;

/// Raw key-value entries.
pub type Entries = FxHashMap<String, String>;

#[derive(Debug, Clone)]
pub struct Store {
    lock: Arc<Mutex<()>>,
    backend: Arc<dyn StorageBackend>,
}

impl Store {
    /// Open a store over `backend`, checking that its entries can be read.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    pub async fn open(backend: impl StorageBackend + 'static) -> Result<Self, StorageError> {
        backend.load().await?;

        Ok(Self {
            lock: Arc::new(Mutex::new(())),
            backend: Arc::new(backend),
        })
    }

    /// A store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
            backend: Arc::new(MemoryBackend::default()),
        }
    }

    /// Begin a transaction scoped to one user's keys.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot be read.
    pub async fn begin_user_transaction(
        &self,
        user: UserId,
    ) -> Result<UserTransaction, StorageError> {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        let entries = self.backend.load().await?;

        Ok(UserTransaction {
            user,
            _guard: guard,
            entries,
            staged: FxHashMap::default(),
            backend: Arc::clone(&self.backend),
        })
    }
}

/// Staged reads and writes against one user's keys.
///
/// Writes are only visible to other transactions once [`commit`](Self::commit)
/// succeeds. Dropping the transaction discards them.
#[derive(Debug)]
pub struct UserTransaction {
    user: UserId,
    _guard: OwnedMutexGuard<()>,
    entries: Entries,
    staged: FxHashMap<LedgerKey, Option<String>>,
    backend: Arc<dyn StorageBackend>,
}

impl UserTransaction {
    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Current value of `key`, including staged writes.
    #[must_use]
    pub fn get(&self, key: LedgerKey) -> Option<&str> {
        match self.staged.get(&key) {
            Some(staged) => staged.as_deref(),
            None => self
                .entries
                .get(&key.namespaced(&self.user))
                .map(String::as_str),
        }
    }

    pub fn set(&mut self, key: LedgerKey, value: String) {
        self.staged.insert(key, Some(value));
    }

    pub fn remove(&mut self, key: LedgerKey) {
        self.staged.insert(key, None);
    }

    /// Apply every staged write, all or nothing.
    ///
    /// Only this user's staged keys are written; every other entry is taken
    /// from the backend as it stands at commit time.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails to load or persist; in that
    /// case no staged write is applied.
    pub async fn commit(mut self) -> Result<(), StorageError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut next = self.backend.load().await?;

        for (key, value) in self.staged.drain() {
            let key = key.namespaced(&self.user);

            match value {
                Some(value) => next.insert(key, value),
                None => next.remove(&key),
            };
        }

        self.backend.persist(&next).await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::FailingBackend;

    #[tokio::test]
    async fn committed_writes_are_visible_to_later_transactions() -> TestResult {
        let store = Store::in_memory();
        let user = UserId::new("a@example.com")?;

        let mut tx = store.begin_user_transaction(user.clone()).await?;
        tx.set(LedgerKey::UserPoints, "50".to_string());
        tx.commit().await?;

        let tx = store.begin_user_transaction(user).await?;

        assert_eq!(tx.get(LedgerKey::UserPoints), Some("50"));

        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_discards_writes() -> TestResult {
        let store = Store::in_memory();
        let user = UserId::new("a@example.com")?;

        {
            let mut tx = store.begin_user_transaction(user.clone()).await?;
            tx.set(LedgerKey::UserPoints, "50".to_string());

            assert_eq!(tx.get(LedgerKey::UserPoints), Some("50"));
        }

        let tx = store.begin_user_transaction(user).await?;

        assert_eq!(tx.get(LedgerKey::UserPoints), None);

        Ok(())
    }

    #[tokio::test]
    async fn users_do_not_see_each_others_keys() -> TestResult {
        let store = Store::in_memory();
        let alice = UserId::new("alice@example.com")?;
        let bob = UserId::new("bob@example.com")?;

        let mut tx = store.begin_user_transaction(alice).await?;
        tx.set(LedgerKey::UserPoints, "100".to_string());
        tx.commit().await?;

        let tx = store.begin_user_transaction(bob).await?;

        assert_eq!(tx.get(LedgerKey::UserPoints), None);

        Ok(())
    }

    #[tokio::test]
    async fn failed_commit_applies_nothing() -> TestResult {
        let store = Store::open(FailingBackend::default()).await?;
        let user = UserId::new("a@example.com")?;

        let mut tx = store.begin_user_transaction(user.clone()).await?;
        tx.set(LedgerKey::UserPoints, "50".to_string());
        tx.set(LedgerKey::RedeemedRewards, "[]".to_string());

        assert!(tx.commit().await.is_err());

        let tx = store.begin_user_transaction(user).await?;

        assert_eq!(tx.get(LedgerKey::UserPoints), None);
        assert_eq!(tx.get(LedgerKey::RedeemedRewards), None);

        Ok(())
    }

    #[tokio::test]
    async fn remove_deletes_committed_value() -> TestResult {
        let store = Store::in_memory();
        let user = UserId::new("a@example.com")?;

        let mut tx = store.begin_user_transaction(user.clone()).await?;
        tx.set(LedgerKey::UserPoints, "50".to_string());
        tx.commit().await?;

        let mut tx = store.begin_user_transaction(user.clone()).await?;
        tx.remove(LedgerKey::UserPoints);

        assert_eq!(tx.get(LedgerKey::UserPoints), None);

        tx.commit().await?;

        let tx = store.begin_user_transaction(user).await?;

        assert_eq!(tx.get(LedgerKey::UserPoints), None);

        Ok(())
    }

    #[tokio::test]
    async fn commit_keeps_writes_from_another_store_on_the_same_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ledger.json");
        let alice = UserId::new("alice@example.com")?;
        let bob = UserId::new("bob@example.com")?;

        let first = Store::open(JsonFileBackend::new(&path)).await?;
        let second = Store::open(JsonFileBackend::new(&path)).await?;

        let mut tx = second.begin_user_transaction(bob.clone()).await?;
        tx.set(LedgerKey::UserPoints, "50".to_string());
        tx.commit().await?;

        let mut tx = first.begin_user_transaction(alice.clone()).await?;
        tx.set(LedgerKey::UserPoints, "100".to_string());
        tx.commit().await?;

        let reopened = Store::open(JsonFileBackend::new(&path)).await?;

        let tx = reopened.begin_user_transaction(bob).await?;
        assert_eq!(tx.get(LedgerKey::UserPoints), Some("50"));
        drop(tx);

        let tx = reopened.begin_user_transaction(alice).await?;
        assert_eq!(tx.get(LedgerKey::UserPoints), Some("100"));

        Ok(())
    }
}
