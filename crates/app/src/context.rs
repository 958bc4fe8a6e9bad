//! App Context

use std::{path::PathBuf, sync::Arc};

use masar::{
    points::{DEFAULT_POINTS_PER_STAMP, Points},
    rewards::{RewardCatalog, RewardCatalogError},
};
use thiserror::Error;

use crate::{
    clock::{Clock, SystemClock},
    domain::{
        accounts::{AccountsService, StoreAccountsService},
        points::{PointsService, StorePointsService},
        stamps::{StampsService, StoreStampsService},
        vouchers::{StoreVouchersService, VouchersService},
    },
    storage::{JsonFileBackend, StorageError, Store},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open ledger storage")]
    Storage(#[from] StorageError),

    #[error("failed to load reward catalog")]
    Catalog(#[from] RewardCatalogError),
}

/// Where the ledger lives and how it is scored.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// JSON file backing the store; in-memory when `None`.
    pub data_file: Option<PathBuf>,

    /// YAML reward catalog; the built-in catalog when `None`.
    pub rewards_file: Option<PathBuf>,

    pub points_per_stamp: Points,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_file: None,
            rewards_file: None,
            points_per_stamp: Points::new(DEFAULT_POINTS_PER_STAMP),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub stamps: Arc<dyn StampsService>,
    pub points: Arc<dyn PointsService>,
    pub vouchers: Arc<dyn VouchersService>,
    pub accounts: Arc<dyn AccountsService>,
    pub clock: Arc<dyn Clock>,
    pub catalog: Arc<RewardCatalog>,
}

impl AppContext {
    /// Build application context from settings, using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error when the data file is unreadable or the reward catalog
    /// fails to load.
    pub async fn from_settings(settings: &AppSettings) -> Result<Self, AppInitError> {
        let store = match &settings.data_file {
            Some(path) => Store::open(JsonFileBackend::new(path)).await?,
            None => Store::in_memory(),
        };

        let catalog = match &settings.rewards_file {
            Some(path) => RewardCatalog::from_file(path)?,
            None => RewardCatalog::default(),
        };

        Ok(Self::new(
            store,
            Arc::new(SystemClock),
            catalog,
            settings.points_per_stamp,
        ))
    }

    /// Wire every service over one store.
    #[must_use]
    pub fn new(
        store: Store,
        clock: Arc<dyn Clock>,
        catalog: RewardCatalog,
        points_per_stamp: Points,
    ) -> Self {
        let catalog = Arc::new(catalog);

        Self {
            stamps: Arc::new(StoreStampsService::new(
                store.clone(),
                Arc::clone(&clock),
                points_per_stamp,
            )),
            points: Arc::new(StorePointsService::new(store.clone())),
            vouchers: Arc::new(StoreVouchersService::new(
                store.clone(),
                Arc::clone(&clock),
                Arc::clone(&catalog),
            )),
            accounts: Arc::new(StoreAccountsService::new(store)),
            clock,
            catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use masar::emirates::Emirate;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::domain::{
        accounts::records::UserId,
        stamps::data::NewStamp,
    };

    use super::*;

    #[tokio::test]
    async fn ledger_survives_reopening_the_data_file() -> TestResult {
        let dir = TempDir::new()?;
        let settings = AppSettings {
            data_file: Some(dir.path().join("ledger.json")),
            ..AppSettings::default()
        };
        let user = UserId::new("traveller@example.com")?;

        let ctx = AppContext::from_settings(&settings).await?;

        ctx.stamps
            .record_stamp(
                user.clone(),
                NewStamp {
                    emirate: Emirate::RasAlKhaimah,
                    location_id: 1,
                },
            )
            .await?;

        drop(ctx);

        let reopened = AppContext::from_settings(&settings).await?;

        assert_eq!(reopened.points.balance(user.clone()).await?, Points::new(50));
        assert_eq!(reopened.stamps.stamp_book(user).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn contexts_sharing_a_data_file_keep_each_others_writes() -> TestResult {
        let dir = TempDir::new()?;
        let settings = AppSettings {
            data_file: Some(dir.path().join("ledger.json")),
            ..AppSettings::default()
        };
        let alice = UserId::new("alice@example.com")?;
        let bob = UserId::new("bob@example.com")?;

        let long_lived = AppContext::from_settings(&settings).await?;
        let other = AppContext::from_settings(&settings).await?;

        other
            .stamps
            .record_stamp(
                bob.clone(),
                NewStamp {
                    emirate: Emirate::Dubai,
                    location_id: 1,
                },
            )
            .await?;

        long_lived.points.credit(alice.clone(), Points::new(30)).await?;

        // Writes from the other context are visible without reopening
        assert_eq!(long_lived.points.balance(bob.clone()).await?, Points::new(50));

        let reopened = AppContext::from_settings(&settings).await?;

        assert_eq!(reopened.points.balance(bob.clone()).await?, Points::new(50));
        assert_eq!(reopened.stamps.stamp_book(bob).await?.len(), 1);
        assert_eq!(reopened.points.balance(alice).await?, Points::new(30));

        Ok(())
    }

    #[tokio::test]
    async fn rewards_file_replaces_built_in_catalog() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("rewards.yaml");

        fs::write(
            &path,
            "rewards:\n  - id: desert-safari\n    name: Desert Safari\n    points_cost: 300\n",
        )?;

        let ctx = AppContext::from_settings(&AppSettings {
            rewards_file: Some(path),
            ..AppSettings::default()
        })
        .await?;

        assert_eq!(ctx.catalog.len(), 1);
        assert!(ctx.catalog.get("desert-safari").is_some());
        assert!(ctx.catalog.get("noon-discount").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_data_file_fails_to_open() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("ledger.json");

        fs::write(&path, "not json")?;

        let result = AppContext::from_settings(&AppSettings {
            data_file: Some(path),
            ..AppSettings::default()
        })
        .await;

        assert!(
            matches!(result, Err(AppInitError::Storage(StorageError::Corrupt { .. }))),
            "expected Corrupt storage"
        );

        Ok(())
    }
}
