//! Stamp Records

use masar::{emirates::Emirate, points::Points, stamps::StampRecord};

/// What happened when a landmark was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// First visit: the stamp was stored and points were awarded.
    Collected {
        emirate: Emirate,
        record: StampRecord,
        points_awarded: Points,
        balance: Points,
    },

    /// The landmark was already in the passport; nothing changed.
    AlreadyCollected {
        emirate: Emirate,
        record: StampRecord,
    },
}

impl StampOutcome {
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Collected { .. })
    }

    #[must_use]
    pub const fn emirate(&self) -> Emirate {
        match self {
            Self::Collected { emirate, .. } | Self::AlreadyCollected { emirate, .. } => *emirate,
        }
    }

    #[must_use]
    pub const fn record(&self) -> &StampRecord {
        match self {
            Self::Collected { record, .. } | Self::AlreadyCollected { record, .. } => record,
        }
    }
}
