//! Account Records

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a user identifier is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserIdError {
    #[error("user id cannot be empty")]
    Empty,

    #[error("user id cannot contain whitespace")]
    Whitespace,
}

/// Identifier of the signed-in user, typically their email address.
///
/// Ledger keys are namespaced by this value, so it must be non-empty and free
/// of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a user identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the identifier is empty or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(UserIdError::Empty);
        }

        if id.chars().any(char::is_whitespace) {
            return Err(UserIdError::Whitespace);
        }

        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
