//! Passport Progress

use smallvec::SmallVec;

use crate::{emirates::Emirate, stamps::StampBook};

/// Collection progress within one emirate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmirateProgress {
    /// The emirate.
    pub emirate: Emirate,

    /// Stamps collected in the emirate.
    pub collected: usize,

    /// Stamps available in the emirate.
    pub total: usize,
}

/// Collection progress across the whole passport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    emirates: SmallVec<[EmirateProgress; 7]>,
}

impl Passport {
    /// Summarise a stamp book against the location catalog.
    ///
    /// Stamps whose location is no longer in the catalog are not counted.
    #[must_use]
    pub fn from_book(book: &StampBook) -> Self {
        let emirates = Emirate::ALL
            .into_iter()
            .map(|emirate| {
                let collected = emirate
                    .locations()
                    .iter()
                    .filter(|location| book.contains(emirate, location.id))
                    .count();

                EmirateProgress {
                    emirate,
                    collected,
                    total: emirate.locations().len(),
                }
            })
            .collect();

        Self { emirates }
    }

    /// Per-emirate progress in passport order.
    #[must_use]
    pub fn emirates(&self) -> &[EmirateProgress] {
        &self.emirates
    }

    /// Progress for one emirate.
    #[must_use]
    pub fn emirate(&self, emirate: Emirate) -> Option<&EmirateProgress> {
        self.emirates.iter().find(|p| p.emirate == emirate)
    }

    /// Stamps collected overall.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.emirates.iter().map(|p| p.collected).sum()
    }

    /// Stamps available overall.
    #[must_use]
    pub fn total(&self) -> usize {
        self.emirates.iter().map(|p| p.total).sum()
    }

    /// Completion percentage, rounded to the nearest whole percent.
    #[must_use]
    pub fn completion_percent(&self) -> usize {
        let total = self.total();

        if total == 0 {
            return 0;
        }

        (self.collected() * 100 + total / 2) / total
    }
}
