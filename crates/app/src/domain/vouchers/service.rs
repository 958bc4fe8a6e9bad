//! Vouchers Service

use std::{iter, sync::Arc};

use async_trait::async_trait;
use masar::{
    rewards::RewardCatalog,
    vouchers::{
        Voucher, VoucherCode, VoucherId, VoucherState, VoucherStatus, active_voucher,
        settle_expired,
    },
};
use mockall::automock;
use tracing::info;

use crate::{
    clock::Clock,
    domain::{
        accounts::records::UserId,
        points::repository::StorePointsRepository,
        vouchers::{
            RedemptionError, VouchersServiceError,
            codes::{RandomCodeGenerator, VoucherCodeGenerator},
            repository::StoreVouchersRepository,
        },
    },
    storage::Store,
};

/// Attempts at drawing a code not already in the user's history.
const MAX_CODE_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub struct StoreVouchersService {
    store: Store,
    clock: Arc<dyn Clock>,
    catalog: Arc<RewardCatalog>,
    codes: Arc<dyn VoucherCodeGenerator>,
    vouchers: StoreVouchersRepository,
    points: StorePointsRepository,
}

impl StoreVouchersService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, catalog: Arc<RewardCatalog>) -> Self {
        Self {
            store,
            clock,
            catalog,
            codes: Arc::new(RandomCodeGenerator),
            vouchers: StoreVouchersRepository::new(),
            points: StorePointsRepository::new(),
        }
    }

    #[must_use]
    pub fn with_code_generator(mut self, codes: Arc<dyn VoucherCodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    fn unique_code(&self, existing: &[Voucher]) -> Result<VoucherCode, RedemptionError> {
        iter::repeat_with(|| self.codes.generate())
            .take(MAX_CODE_ATTEMPTS)
            .find(|code| existing.iter().all(|voucher| &voucher.code != code))
            .ok_or(RedemptionError::CodeGeneration)
    }
}

#[async_trait]
impl VouchersService for StoreVouchersService {
    #[tracing::instrument(
        name = "vouchers.service.redeem",
        skip(self, user, reward_id),
        fields(user = %user, reward_id = %reward_id, voucher_id = tracing::field::Empty),
        err
    )]
    async fn redeem(&self, user: UserId, reward_id: String) -> Result<Voucher, RedemptionError> {
        let reward = self
            .catalog
            .get(&reward_id)
            .ok_or_else(|| RedemptionError::UnknownReward(reward_id.clone()))?;

        let mut tx = self.store.begin_user_transaction(user).await?;

        let now = self.clock.now();
        let mut vouchers = self.vouchers.vouchers(&tx);

        if let Some(active) = active_voucher(&vouchers, now) {
            return Err(RedemptionError::ActiveVoucherExists { voucher: active.id });
        }

        let balance = self.points.debit(&mut tx, reward.points_cost)?;

        let code = self.unique_code(&vouchers)?;
        let voucher = Voucher::issue(&reward.id, reward.points_cost, code, now)?;

        tracing::Span::current().record("voucher_id", tracing::field::display(voucher.id));

        settle_expired(&mut vouchers, now);
        vouchers.push(voucher.clone());

        self.vouchers.save_vouchers(&mut tx, &vouchers)?;

        tx.commit().await?;

        info!(code = %voucher.code, %balance, "issued voucher");

        Ok(voucher)
    }

    #[tracing::instrument(
        name = "vouchers.service.use_voucher",
        skip(self, user, voucher),
        fields(user = %user, voucher_id = %voucher),
        err
    )]
    async fn use_voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<Voucher, VouchersServiceError> {
        let mut tx = self.store.begin_user_transaction(user).await?;

        let now = self.clock.now();
        let mut vouchers = self.vouchers.vouchers(&tx);

        let found = vouchers
            .iter_mut()
            .find(|v| v.id == voucher)
            .ok_or(VouchersServiceError::NotFound)?;

        match found.state_at(now) {
            VoucherState::Active => {
                found.status = VoucherStatus::Used { used_at: now };

                let used = found.clone();

                self.vouchers.save_vouchers(&mut tx, &vouchers)?;

                tx.commit().await?;

                info!("used voucher");

                Ok(used)
            }
            state => {
                if settle_expired(&mut vouchers, now) > 0 {
                    self.vouchers.save_vouchers(&mut tx, &vouchers)?;

                    tx.commit().await?;
                }

                Err(VouchersServiceError::NotActive(state))
            }
        }
    }

    #[tracing::instrument(
        name = "vouchers.service.expire_voucher",
        skip(self, user, voucher),
        fields(user = %user, voucher_id = %voucher),
        err
    )]
    async fn expire_voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<VoucherState, VouchersServiceError> {
        let mut tx = self.store.begin_user_transaction(user).await?;

        let now = self.clock.now();
        let mut vouchers = self.vouchers.vouchers(&tx);

        let found = vouchers
            .iter_mut()
            .find(|v| v.id == voucher)
            .ok_or(VouchersServiceError::NotFound)?;

        let state = found.state_at(now);

        if found.status != VoucherStatus::Active || state == VoucherState::Active {
            return Ok(state);
        }

        found.status = VoucherStatus::Expired {
            expired_at: found.expires_at,
        };

        self.vouchers.save_vouchers(&mut tx, &vouchers)?;

        tx.commit().await?;

        info!("expired voucher");

        Ok(VoucherState::Expired)
    }

    async fn voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<Voucher, VouchersServiceError> {
        let tx = self.store.begin_user_transaction(user).await?;

        self.vouchers
            .vouchers(&tx)
            .into_iter()
            .find(|v| v.id == voucher)
            .ok_or(VouchersServiceError::NotFound)
    }

    async fn active_voucher(&self, user: UserId) -> Result<Option<Voucher>, VouchersServiceError> {
        let tx = self.store.begin_user_transaction(user).await?;

        let vouchers = self.vouchers.vouchers(&tx);

        Ok(active_voucher(&vouchers, self.clock.now()).cloned())
    }

    async fn vouchers(&self, user: UserId) -> Result<Vec<Voucher>, VouchersServiceError> {
        let tx = self.store.begin_user_transaction(user).await?;

        let mut vouchers = self.vouchers.vouchers(&tx);

        vouchers.reverse();

        Ok(vouchers)
    }
}

#[automock]
#[async_trait]
pub trait VouchersService: Send + Sync {
    /// Spend points on a reward and issue a voucher for it.
    ///
    /// Fails while another voucher is still active, or when the balance does
    /// not cover the reward. Nothing changes on failure.
    async fn redeem(&self, user: UserId, reward_id: String) -> Result<Voucher, RedemptionError>;

    /// Consume an active voucher.
    async fn use_voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<Voucher, VouchersServiceError>;

    /// Record expiry once a voucher's window has closed.
    ///
    /// Returns the voucher's state afterwards. Terminal vouchers are left
    /// as they are, and a voucher that is not yet due stays active.
    async fn expire_voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<VoucherState, VouchersServiceError>;

    /// Look up one voucher as stored.
    async fn voucher(
        &self,
        user: UserId,
        voucher: VoucherId,
    ) -> Result<Voucher, VouchersServiceError>;

    /// The voucher that can still be presented, if any.
    async fn active_voucher(&self, user: UserId) -> Result<Option<Voucher>, VouchersServiceError>;

    /// Every voucher issued to the user, newest first.
    async fn vouchers(&self, user: UserId) -> Result<Vec<Voucher>, VouchersServiceError>;
}
