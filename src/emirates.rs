//! Emirates & Locations
//!
//! The seven regions stamps are grouped by, and the fixed set of landmarks
//! that can be collected in each of them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of locations that can be collected in every emirate.
pub const LOCATIONS_PER_EMIRATE: usize = 5;

/// Error returned when a slug does not name one of the seven emirates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emirate: {0}")]
pub struct UnknownEmirate(pub String);

/// One of the seven emirates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Emirate {
    /// Abu Dhabi
    AbuDhabi,

    /// Dubai
    Dubai,

    /// Sharjah
    Sharjah,

    /// Ajman
    Ajman,

    /// Umm Al Quwain
    UmmAlQuwain,

    /// Fujairah
    Fujairah,

    /// Ras Al Khaimah
    RasAlKhaimah,
}

/// A collectible landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Identifier, unique within its emirate.
    pub id: u32,

    /// Display name.
    pub name: &'static str,
}

const fn location(id: u32, name: &'static str) -> Location {
    Location { id, name }
}

const ABU_DHABI: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Sheikh Zayed Grand Mosque"),
    location(2, "Louvre Abu Dhabi"),
    location(3, "Ferrari World"),
    location(4, "Qasr Al Watan"),
    location(5, "Yas Marina Circuit"),
];

const DUBAI: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Burj Khalifa"),
    location(2, "Dubai Mall"),
    location(3, "Palm Jumeirah"),
    location(4, "Dubai Creek"),
    location(5, "Dubai Museum"),
];

const SHARJAH: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Al Noor Island"),
    location(2, "Sharjah Museum of Islamic Civilization"),
    location(3, "Al Qasba Canal"),
    location(4, "Rain Room Sharjah"),
    location(5, "Sharjah Art Museum"),
];

const AJMAN: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Ajman Museum"),
    location(2, "Ajman Corniche"),
    location(3, "Al Zorah Nature Reserve"),
    location(4, "Ajman Marina"),
    location(5, "Masfout Mountains"),
];

const UMM_AL_QUWAIN: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "UAQ Museum"),
    location(2, "Dreamland Aqua Park"),
    location(3, "Al Sinniyah Island"),
    location(4, "UAQ Marine Club"),
    location(5, "Ed Dasoodi Wildlife Sanctuary"),
];

const FUJAIRAH: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Al Bidyah Mosque"),
    location(2, "Fujairah Fort"),
    location(3, "Snoopy Island"),
    location(4, "Wadi Wurayah"),
    location(5, "Ain Al Madhab Gardens"),
];

const RAS_AL_KHAIMAH: [Location; LOCATIONS_PER_EMIRATE] = [
    location(1, "Jebel Jais"),
    location(2, "RAK National Museum"),
    location(3, "Al Jazirah Al Hamra"),
    location(4, "Dhayah Fort"),
    location(5, "Iceland Water Park"),
];

impl Emirate {
    /// All emirates, in passport order.
    pub const ALL: [Self; 7] = [
        Self::AbuDhabi,
        Self::Dubai,
        Self::Sharjah,
        Self::Ajman,
        Self::UmmAlQuwain,
        Self::Fujairah,
        Self::RasAlKhaimah,
    ];

    /// Stable identifier used in QR payloads and persisted ledgers.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::AbuDhabi => "abu-dhabi",
            Self::Dubai => "dubai",
            Self::Sharjah => "sharjah",
            Self::Ajman => "ajman",
            Self::UmmAlQuwain => "umm-al-quwain",
            Self::Fujairah => "fujairah",
            Self::RasAlKhaimah => "ras-al-khaimah",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AbuDhabi => "Abu Dhabi",
            Self::Dubai => "Dubai",
            Self::Sharjah => "Sharjah",
            Self::Ajman => "Ajman",
            Self::UmmAlQuwain => "Umm Al Quwain",
            Self::Fujairah => "Fujairah",
            Self::RasAlKhaimah => "Ras Al Khaimah",
        }
    }

    /// Landmarks that can be collected in this emirate.
    #[must_use]
    pub const fn locations(self) -> &'static [Location] {
        match self {
            Self::AbuDhabi => &ABU_DHABI,
            Self::Dubai => &DUBAI,
            Self::Sharjah => &SHARJAH,
            Self::Ajman => &AJMAN,
            Self::UmmAlQuwain => &UMM_AL_QUWAIN,
            Self::Fujairah => &FUJAIRAH,
            Self::RasAlKhaimah => &RAS_AL_KHAIMAH,
        }
    }

    /// Looks up a landmark by its identifier.
    #[must_use]
    pub fn location(self, id: u32) -> Option<&'static Location> {
        self.locations().iter().find(|location| location.id == id)
    }

    /// Total number of stamps that exist across every emirate.
    #[must_use]
    pub fn total_locations() -> usize {
        Self::ALL.iter().map(|emirate| emirate.locations().len()).sum()
    }
}

impl fmt::Display for Emirate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Emirate {
    type Err = UnknownEmirate;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|emirate| emirate.slug() == value)
            .ok_or_else(|| UnknownEmirate(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn slugs_round_trip_through_from_str() -> TestResult {
        for emirate in Emirate::ALL {
            assert_eq!(emirate.slug().parse::<Emirate>()?, emirate);
        }

        Ok(())
    }

    #[test]
    fn unknown_slug_is_rejected() {
        let result = "al-ain".parse::<Emirate>();

        assert_eq!(result, Err(UnknownEmirate("al-ain".to_string())));
    }

    #[test]
    fn every_emirate_has_five_numbered_locations() {
        for emirate in Emirate::ALL {
            let ids: Vec<u32> = emirate.locations().iter().map(|l| l.id).collect();

            assert_eq!(ids, vec![1, 2, 3, 4, 5], "{emirate} location ids");
        }

        assert_eq!(Emirate::total_locations(), 35);
    }

    #[test]
    fn location_lookup_by_id() {
        let mall = Emirate::Dubai.location(2);

        assert_eq!(mall.map(|l| l.name), Some("Dubai Mall"));
        assert!(Emirate::Dubai.location(6).is_none());
    }

    #[test]
    fn serde_uses_kebab_case_slugs() -> TestResult {
        let json = serde_json::to_string(&Emirate::RasAlKhaimah)?;

        assert_eq!(json, "\"ras-al-khaimah\"");

        let parsed: Emirate = serde_json::from_str("\"umm-al-quwain\"")?;

        assert_eq!(parsed, Emirate::UmmAlQuwain);

        Ok(())
    }
}
