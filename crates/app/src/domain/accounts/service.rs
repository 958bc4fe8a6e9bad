//! Accounts Service

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::accounts::{AccountsServiceError, records::UserId},
    storage::{LedgerKey, Store},
};

#[derive(Debug, Clone)]
pub struct StoreAccountsService {
    store: Store,
}

impl StoreAccountsService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountsService for StoreAccountsService {
    #[tracing::instrument(
        name = "accounts.service.delete_account",
        skip(self, user),
        fields(user = %user),
        err
    )]
    async fn delete_account(&self, user: UserId) -> Result<(), AccountsServiceError> {
        let mut tx = self.store.begin_user_transaction(user).await?;

        for key in LedgerKey::ALL {
            tx.remove(key);
        }

        tx.commit().await?;

        info!("deleted account data");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Purge every ledger entry belonging to `user`.
    async fn delete_account(&self, user: UserId) -> Result<(), AccountsServiceError>;
}

#[cfg(test)]
mod tests {
    use masar::emirates::Emirate;
    use testresult::TestResult;

    use crate::{
        domain::{
            points::PointsService,
            stamps::{StampsService, data::NewStamp},
            vouchers::VouchersService,
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn delete_account_clears_every_ledger() -> TestResult {
        let ctx = TestContext::new();

        ctx.collect(Emirate::Dubai, 1).await?;
        ctx.collect(Emirate::Dubai, 2).await?;
        ctx.vouchers
            .redeem(ctx.user.clone(), "noon-discount".to_string())
            .await?;

        ctx.accounts.delete_account(ctx.user.clone()).await?;

        assert_eq!(ctx.points.balance(ctx.user.clone()).await?.get(), 0);
        assert!(ctx.stamps.stamp_book(ctx.user.clone()).await?.is_empty());
        assert!(ctx.vouchers.vouchers(ctx.user.clone()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_account_leaves_other_users_alone() -> TestResult {
        let ctx = TestContext::new();
        let other = UserId::new("other@example.com")?;

        ctx.collect(Emirate::Ajman, 1).await?;
        ctx.stamps
            .record_stamp(
                other.clone(),
                NewStamp {
                    emirate: Emirate::Ajman,
                    location_id: 1,
                },
            )
            .await?;

        ctx.accounts.delete_account(ctx.user.clone()).await?;

        assert_eq!(ctx.points.balance(other).await?.get(), 50);

        Ok(())
    }
}
