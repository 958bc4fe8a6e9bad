//! Scanned QR Payloads
//!
//! Landmark QR codes carry a JSON object naming the emirate and location. The
//! decoder library is external; this module only validates what it produced.

use serde::Deserialize;
use thiserror::Error;

use crate::emirates::{Emirate, Location};

/// Reasons a scanned payload is not a valid landmark code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Not a JSON object of the expected shape
    #[error("invalid code: {0}")]
    Malformed(String),

    /// A required field is absent
    #[error("invalid code: missing {0}")]
    MissingField(&'static str),

    /// The emirate slug is not one of the seven emirates
    #[error("invalid code: unknown emirate {0}")]
    UnknownEmirate(String),

    /// The emirate has no location with this id
    #[error("invalid code: {emirate} has no location {location_id}")]
    UnknownLocation {
        /// Emirate named by the payload.
        emirate: Emirate,

        /// Location id named by the payload.
        location_id: u32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScanPayload {
    emirate_id: Option<String>,
    location_id: Option<u32>,
}

/// A validated landmark scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedStamp {
    /// Emirate the landmark belongs to.
    pub emirate: Emirate,

    /// The landmark itself.
    pub location: &'static Location,
}

impl ScannedStamp {
    /// Validate an emirate and location id against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::UnknownLocation`] if the emirate has no such location.
    pub fn new(emirate: Emirate, location_id: u32) -> Result<Self, ScanError> {
        let location = emirate
            .location(location_id)
            .ok_or(ScanError::UnknownLocation {
                emirate,
                location_id,
            })?;

        Ok(Self { emirate, location })
    }

    /// Decode and validate a payload produced by the QR decoder.
    ///
    /// Display fields such as `name` or `description` are ignored; the
    /// catalog is the source of truth for landmark names.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] describing why the payload was rejected.
    pub fn parse(payload: &str) -> Result<Self, ScanError> {
        let raw: RawScanPayload = serde_json::from_str(payload)
            .map_err(|error| ScanError::Malformed(error.to_string()))?;

        let slug = raw.emirate_id.ok_or(ScanError::MissingField("emirateId"))?;
        let location_id = raw.location_id.ok_or(ScanError::MissingField("locationId"))?;

        let emirate = slug
            .parse::<Emirate>()
            .map_err(|unknown| ScanError::UnknownEmirate(unknown.0))?;

        Self::new(emirate, location_id)
    }

    /// Landmark name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.location.name
    }
}
