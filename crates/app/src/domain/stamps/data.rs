//! Stamp Data

use masar::emirates::Emirate;

/// A landmark to record, identified by catalog ids only.
///
/// The stored name always comes from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewStamp {
    pub emirate: Emirate,
    pub location_id: u32,
}
