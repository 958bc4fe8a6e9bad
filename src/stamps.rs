//! Stamps
//!
//! A [`StampBook`] is the per-user ledger of collected landmarks, keyed by
//! emirate. Recording a landmark that is already present is a no-op.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::emirates::Emirate;

/// A collected landmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampRecord {
    /// Landmark identifier within its emirate.
    pub location_id: u32,

    /// Landmark name at the time it was collected.
    pub name: String,

    /// When the landmark was scanned.
    pub collected_at: Timestamp,
}

/// Result of inserting a stamp into a [`StampBook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampInsert {
    /// The landmark was not yet in the book and has been added.
    Inserted(StampRecord),

    /// The landmark was already collected; the existing record is returned.
    Duplicate(StampRecord),
}

impl StampInsert {
    /// Whether the insert added a new record.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }

    /// The record that is now in the book.
    #[must_use]
    pub const fn record(&self) -> &StampRecord {
        match self {
            Self::Inserted(record) | Self::Duplicate(record) => record,
        }
    }
}

/// All stamps a user has collected, grouped by emirate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StampBook {
    stamps: BTreeMap<Emirate, Vec<StampRecord>>,
}

impl StampBook {
    /// Create an empty stamp book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stamp book from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error when `json` is not a valid stamp book.
    pub fn decode(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Encode the stamp book into its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Record a landmark unless it has already been collected.
    pub fn insert(
        &mut self,
        emirate: Emirate,
        location_id: u32,
        name: &str,
        collected_at: Timestamp,
    ) -> StampInsert {
        let records = self.stamps.entry(emirate).or_default();

        if let Some(existing) = records.iter().find(|r| r.location_id == location_id) {
            return StampInsert::Duplicate(existing.clone());
        }

        let record = StampRecord {
            location_id,
            name: name.to_string(),
            collected_at,
        };

        records.push(record.clone());

        StampInsert::Inserted(record)
    }

    /// Whether a landmark has been collected.
    #[must_use]
    pub fn contains(&self, emirate: Emirate, location_id: u32) -> bool {
        self.collected_in(emirate)
            .iter()
            .any(|r| r.location_id == location_id)
    }

    /// Stamps collected in a single emirate, in collection order.
    #[must_use]
    pub fn collected_in(&self, emirate: Emirate) -> &[StampRecord] {
        self.stamps
            .get(&emirate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of stamps across all emirates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.values().map(Vec::len).sum()
    }

    /// Whether no stamps have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every `(emirate, record)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (Emirate, &StampRecord)> {
        self.stamps
            .iter()
            .flat_map(|(emirate, records)| records.iter().map(move |r| (*emirate, r)))
    }
}
