//! Voucher Countdown
//!
//! A background task that ticks once a second while a voucher is active and
//! records its expiry exactly once when the window closes. It stops early
//! when the voucher is used in the meantime. Remaining time is always
//! recomputed from the voucher's `expires_at` and the clock, never from a tick
//! count, so a countdown started late (after a restart, say) picks up where
//! the wall clock says it should be.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use masar::vouchers::{Voucher, VoucherId, VoucherState, VoucherStatus, remaining_seconds};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{
    clock::Clock,
    domain::{
        accounts::records::UserId,
        vouchers::{VouchersService, VouchersServiceError},
    },
};

const TICK: Duration = Duration::from_secs(1);

/// Latest countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running { remaining_seconds: u64 },
    Finished(VoucherState),
}

/// Handle to a running countdown. Dropping it stops the task.
#[derive(Debug)]
pub struct VoucherCountdown {
    ticks: watch::Receiver<CountdownTick>,
    handle: Option<JoinHandle<()>>,
}

impl VoucherCountdown {
    /// Spawn a countdown for `voucher` on the current runtime.
    #[must_use]
    pub fn start(
        vouchers: Arc<dyn VouchersService>,
        clock: Arc<dyn Clock>,
        user: UserId,
        voucher: &Voucher,
    ) -> Self {
        let initial = CountdownTick::Running {
            remaining_seconds: voucher.remaining_seconds(clock.now()),
        };

        let (sender, ticks) = watch::channel(initial);

        let handle = tokio::spawn(run_countdown(
            vouchers,
            clock,
            user,
            voucher.id,
            voucher.expires_at,
            sender,
        ));

        Self {
            ticks,
            handle: Some(handle),
        }
    }

    /// Subscribe to tick updates.
    #[must_use]
    pub fn ticks(&self) -> watch::Receiver<CountdownTick> {
        self.ticks.clone()
    }

    #[must_use]
    pub fn latest(&self) -> CountdownTick {
        *self.ticks.borrow()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the countdown to finish and return its final tick.
    pub async fn wait(&mut self) -> CountdownTick {
        if let Some(handle) = self.handle.take() {
            if let Err(error) = handle.await {
                warn!(%error, "voucher countdown stopped unexpectedly");
            }
        }

        self.latest()
    }

    /// Stop the countdown without touching the voucher.
    pub fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for VoucherCountdown {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_countdown(
    vouchers: Arc<dyn VouchersService>,
    clock: Arc<dyn Clock>,
    user: UserId,
    voucher: VoucherId,
    expires_at: Timestamp,
    ticks: watch::Sender<CountdownTick>,
) {
    let mut interval = time::interval(TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        match vouchers.voucher(user.clone(), voucher).await {
            Ok(stored) if stored.status != VoucherStatus::Active => {
                let state = stored.state_at(clock.now());

                info!(
                    %user,
                    voucher_id = %voucher,
                    %state,
                    "voucher settled before countdown ended"
                );

                ticks.send_replace(CountdownTick::Finished(state));

                break;
            }
            Ok(_) => {}
            Err(VouchersServiceError::NotFound) => {
                warn!(%user, voucher_id = %voucher, "voucher no longer exists");

                ticks.send_replace(CountdownTick::Finished(VoucherState::Expired));

                break;
            }
            Err(error) => {
                warn!(%user, voucher_id = %voucher, %error, "failed to read voucher");
            }
        }

        let remaining = remaining_seconds(clock.now(), expires_at);

        if remaining > 0 {
            ticks.send_replace(CountdownTick::Running {
                remaining_seconds: remaining,
            });

            continue;
        }

        let state = match vouchers.expire_voucher(user.clone(), voucher).await {
            Ok(state) => state,
            Err(error) => {
                warn!(%user, voucher_id = %voucher, %error, "failed to record voucher expiry");

                VoucherState::Expired
            }
        };

        info!(%user, voucher_id = %voucher, %state, "voucher countdown finished");

        ticks.send_replace(CountdownTick::Finished(state));

        break;
    }
}

#[cfg(test)]
mod tests {
    use masar::{points::Points, rewards::RewardCatalog, vouchers::VoucherCode};
    use testresult::TestResult;

    use crate::{
        domain::{
            points::{PointsService, StorePointsService},
            vouchers::{MockVouchersService, StoreVouchersService},
        },
        storage::Store,
        test::TokioClock,
    };

    use super::*;

    fn user() -> Result<UserId, crate::domain::accounts::records::UserIdError> {
        UserId::new("traveller@example.com")
    }

    #[tokio::test(start_paused = true)]
    async fn expires_voucher_exactly_once_at_zero() -> TestResult {
        let clock = Arc::new(TokioClock::new(Timestamp::UNIX_EPOCH));
        let code = VoucherCode::from_chars("ZXCV9876".chars());
        let voucher = Voucher::issue("noon-discount", Points::new(100), code, clock.now())?;
        let id = voucher.id;

        let mut mock = MockVouchersService::new();
        let stored = voucher.clone();

        mock.expect_voucher()
            .withf(move |_, v| *v == id)
            .returning(move |_, _| Ok(stored.clone()));

        mock.expect_expire_voucher()
            .withf(move |_, v| *v == id)
            .times(1)
            .returning(|_, _| Ok(VoucherState::Expired));

        let mock = Arc::new(mock);

        let mut countdown = VoucherCountdown::start(mock.clone(), clock.clone(), user()?, &voucher);

        assert_eq!(
            countdown.latest(),
            CountdownTick::Running {
                remaining_seconds: 3600
            }
        );

        let last = countdown.wait().await;

        assert_eq!(last, CountdownTick::Finished(VoucherState::Expired));
        assert!(!countdown.is_running());
        assert!(clock.now() >= voucher.expires_at, "fired before expiry");

        Arc::into_inner(mock)
            .ok_or("countdown still holds the service")?
            .checkpoint();

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_the_clock() -> TestResult {
        let clock = Arc::new(TokioClock::new(Timestamp::UNIX_EPOCH));
        let code = VoucherCode::from_chars("ZXCV9876".chars());
        let voucher = Voucher::issue("noon-discount", Points::new(100), code, clock.now())?;

        let mut mock = MockVouchersService::new();
        let stored = voucher.clone();

        mock.expect_voucher().returning(move |_, _| Ok(stored.clone()));

        let countdown = VoucherCountdown::start(Arc::new(mock), clock, user()?, &voucher);

        time::sleep(Duration::from_millis(5_500)).await;

        assert_eq!(
            countdown.latest(),
            CountdownTick::Running {
                remaining_seconds: 3595
            }
        );

        countdown.cancel();

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_reopens_redemption() -> TestResult {
        let store = Store::in_memory();
        let clock = Arc::new(TokioClock::new(Timestamp::UNIX_EPOCH));
        let points = StorePointsService::new(store.clone());
        let vouchers = Arc::new(StoreVouchersService::new(
            store,
            clock.clone(),
            Arc::new(RewardCatalog::default()),
        ));

        points.credit(user()?, Points::new(250)).await?;

        let voucher = vouchers.redeem(user()?, "noon-discount".to_string()).await?;

        let mut countdown =
            VoucherCountdown::start(vouchers.clone(), clock.clone(), user()?, &voucher);

        let last = countdown.wait().await;

        assert_eq!(last, CountdownTick::Finished(VoucherState::Expired));

        let stored = vouchers.vouchers(user()?).await?;

        assert_eq!(
            stored.first().map(|v| v.status),
            Some(VoucherStatus::Expired {
                expired_at: voucher.expires_at
            })
        );

        let next = vouchers
            .redeem(user()?, "talabat-discount".to_string())
            .await?;

        assert!(next.issued_at >= voucher.expires_at, "issued before the first expired");
        assert_eq!(points.balance(user()?).await?, Points::ZERO);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn using_the_voucher_stops_the_countdown() -> TestResult {
        let store = Store::in_memory();
        let clock = Arc::new(TokioClock::new(Timestamp::UNIX_EPOCH));
        let points = StorePointsService::new(store.clone());
        let vouchers = Arc::new(StoreVouchersService::new(
            store,
            clock.clone(),
            Arc::new(RewardCatalog::default()),
        ));

        points.credit(user()?, Points::new(100)).await?;

        let voucher = vouchers.redeem(user()?, "noon-discount".to_string()).await?;

        let mut countdown =
            VoucherCountdown::start(vouchers.clone(), clock.clone(), user()?, &voucher);

        time::sleep(Duration::from_secs(3)).await;

        vouchers.use_voucher(user()?, voucher.id).await?;

        time::sleep(Duration::from_secs(2)).await;

        assert_eq!(countdown.latest(), CountdownTick::Finished(VoucherState::Used));
        assert!(!countdown.is_running());
        assert_eq!(
            countdown.wait().await,
            CountdownTick::Finished(VoucherState::Used)
        );

        let stored = vouchers.voucher(user()?, voucher.id).await?;

        assert!(matches!(stored.status, VoucherStatus::Used { .. }));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_leaves_voucher_active() -> TestResult {
        let store = Store::in_memory();
        let clock = Arc::new(TokioClock::new(Timestamp::UNIX_EPOCH));
        let points = StorePointsService::new(store.clone());
        let vouchers = Arc::new(StoreVouchersService::new(
            store,
            clock.clone(),
            Arc::new(RewardCatalog::default()),
        ));

        points.credit(user()?, Points::new(100)).await?;

        let voucher = vouchers.redeem(user()?, "noon-discount".to_string()).await?;

        let countdown =
            VoucherCountdown::start(vouchers.clone(), clock.clone(), user()?, &voucher);

        time::sleep(Duration::from_secs(10)).await;

        countdown.cancel();

        time::sleep(Duration::from_secs(2 * 3600)).await;

        let stored = vouchers.vouchers(user()?).await?;

        // Past expiry, but nothing recorded it
        assert_eq!(stored.first().map(|v| v.status), Some(VoucherStatus::Active));
        assert_eq!(
            stored.first().map(|v| v.state_at(clock.now())),
            Some(VoucherState::Expired)
        );

        Ok(())
    }
}
