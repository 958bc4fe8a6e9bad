//! Stamps Service

use std::sync::Arc;

use async_trait::async_trait;
use masar::{
    passport::Passport,
    points::Points,
    scan::ScannedStamp,
    stamps::{StampBook, StampInsert},
};
use mockall::automock;
use tracing::info;

use crate::{
    clock::Clock,
    domain::{
        accounts::records::UserId,
        points::repository::StorePointsRepository,
        stamps::{
            StampsServiceError, data::NewStamp, records::StampOutcome,
            repository::StoreStampsRepository,
        },
    },
    storage::Store,
};

#[derive(Debug, Clone)]
pub struct StoreStampsService {
    store: Store,
    clock: Arc<dyn Clock>,
    points_per_stamp: Points,
    stamps: StoreStampsRepository,
    points: StorePointsRepository,
}

impl StoreStampsService {
    #[must_use]
    pub fn new(store: Store, clock: Arc<dyn Clock>, points_per_stamp: Points) -> Self {
        Self {
            store,
            clock,
            points_per_stamp,
            stamps: StoreStampsRepository::new(),
            points: StorePointsRepository::new(),
        }
    }

    /// Insert the stamp and credit points in one transaction.
    async fn collect(
        &self,
        user: UserId,
        scanned: ScannedStamp,
    ) -> Result<StampOutcome, StampsServiceError> {
        let mut tx = self.store.begin_user_transaction(user).await?;

        let mut book = self.stamps.stamp_book(&tx);

        let insert = book.insert(
            scanned.emirate,
            scanned.location.id,
            scanned.name(),
            self.clock.now(),
        );

        let record = match insert {
            StampInsert::Duplicate(record) => {
                info!(
                    emirate = %scanned.emirate,
                    location_id = scanned.location.id,
                    "stamp already collected"
                );

                return Ok(StampOutcome::AlreadyCollected {
                    emirate: scanned.emirate,
                    record,
                });
            }
            StampInsert::Inserted(record) => record,
        };

        self.stamps.save_stamp_book(&mut tx, &book)?;

        let balance = self.points.credit(&mut tx, self.points_per_stamp);

        tx.commit().await?;

        info!(
            emirate = %scanned.emirate,
            location_id = record.location_id,
            %balance,
            "collected stamp"
        );

        Ok(StampOutcome::Collected {
            emirate: scanned.emirate,
            record,
            points_awarded: self.points_per_stamp,
            balance,
        })
    }
}

#[async_trait]
impl StampsService for StoreStampsService {
    #[tracing::instrument(
        name = "stamps.service.record_stamp",
        skip(self, user, stamp),
        fields(user = %user, emirate = %stamp.emirate, location_id = stamp.location_id),
        err
    )]
    async fn record_stamp(
        &self,
        user: UserId,
        stamp: NewStamp,
    ) -> Result<StampOutcome, StampsServiceError> {
        let scanned = ScannedStamp::new(stamp.emirate, stamp.location_id)?;

        self.collect(user, scanned).await
    }

    #[tracing::instrument(
        name = "stamps.service.record_scan",
        skip(self, user, payload),
        fields(user = %user, payload_len = payload.len()),
        err
    )]
    async fn record_scan(
        &self,
        user: UserId,
        payload: String,
    ) -> Result<StampOutcome, StampsServiceError> {
        let scanned = ScannedStamp::parse(&payload)?;

        self.collect(user, scanned).await
    }

    async fn stamp_book(&self, user: UserId) -> Result<StampBook, StampsServiceError> {
        let tx = self.store.begin_user_transaction(user).await?;

        Ok(self.stamps.stamp_book(&tx))
    }

    async fn passport(&self, user: UserId) -> Result<Passport, StampsServiceError> {
        let book = self.stamp_book(user).await?;

        Ok(Passport::from_book(&book))
    }
}

#[automock]
#[async_trait]
pub trait StampsService: Send + Sync {
    /// Record a landmark by catalog ids.
    async fn record_stamp(
        &self,
        user: UserId,
        stamp: NewStamp,
    ) -> Result<StampOutcome, StampsServiceError>;

    /// Record a landmark from a decoded QR payload.
    async fn record_scan(
        &self,
        user: UserId,
        payload: String,
    ) -> Result<StampOutcome, StampsServiceError>;

    /// Every stamp the user has collected.
    async fn stamp_book(&self, user: UserId) -> Result<StampBook, StampsServiceError>;

    /// Collection progress per emirate.
    async fn passport(&self, user: UserId) -> Result<Passport, StampsServiceError>;
}
