//! Points Service

use async_trait::async_trait;
use masar::points::Points;
use mockall::automock;
use tracing::info;

use crate::{
    domain::{
        accounts::records::UserId,
        points::{PointsServiceError, repository::StorePointsRepository},
    },
    storage::Store,
};

#[derive(Debug, Clone)]
pub struct StorePointsService {
    store: Store,
    repository: StorePointsRepository,
}

impl StorePointsService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            repository: StorePointsRepository::new(),
        }
    }
}

#[async_trait]
impl PointsService for StorePointsService {
    async fn balance(&self, user: UserId) -> Result<Points, PointsServiceError> {
        let tx = self.store.begin_user_transaction(user).await?;

        Ok(self.repository.balance(&tx))
    }

    #[tracing::instrument(
        name = "points.service.credit",
        skip(self, user, amount),
        fields(user = %user, amount = %amount),
        err
    )]
    async fn credit(&self, user: UserId, amount: Points) -> Result<Points, PointsServiceError> {
        if amount == Points::ZERO {
            return Err(PointsServiceError::ZeroAmount);
        }

        let mut tx = self.store.begin_user_transaction(user).await?;

        let balance = self.repository.credit(&mut tx, amount);

        tx.commit().await?;

        info!(%balance, "credited points");

        Ok(balance)
    }

    #[tracing::instrument(
        name = "points.service.debit",
        skip(self, user, amount),
        fields(user = %user, amount = %amount),
        err
    )]
    async fn debit(&self, user: UserId, amount: Points) -> Result<Points, PointsServiceError> {
        if amount == Points::ZERO {
            return Err(PointsServiceError::ZeroAmount);
        }

        let mut tx = self.store.begin_user_transaction(user).await?;

        let balance = self.repository.debit(&mut tx, amount)?;

        tx.commit().await?;

        info!(%balance, "debited points");

        Ok(balance)
    }
}

#[automock]
#[async_trait]
pub trait PointsService: Send + Sync {
    /// Current balance for `user`.
    async fn balance(&self, user: UserId) -> Result<Points, PointsServiceError>;

    /// Add `amount` to the balance, returning the new balance.
    async fn credit(&self, user: UserId, amount: Points) -> Result<Points, PointsServiceError>;

    /// Remove `amount` from the balance, returning the new balance.
    ///
    /// Fails without changing anything when the balance is too low.
    async fn debit(&self, user: UserId, amount: Points) -> Result<Points, PointsServiceError>;
}
