//! Rewards
//!
//! Third-party discounts that can be exchanged for points. The ledger only
//! depends on a reward's `id` and `points_cost`; everything else is display
//! data.

use std::{fs, path::Path, slice};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::points::{InsufficientPoints, Points};

/// Errors raised while loading a reward catalog.
#[derive(Debug, Error)]
pub enum RewardCatalogError {
    /// IO error reading the catalog file
    #[error("failed to read reward catalog: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse reward catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two rewards share an id
    #[error("duplicate reward id: {0}")]
    DuplicateId(String),

    /// A reward costs nothing
    #[error("reward {0} must cost at least one point")]
    FreeReward(String),
}

/// A redeemable reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Stable identifier, e.g. `noon-discount`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description shown before redeeming.
    #[serde(default)]
    pub description: String,

    /// Points required to redeem.
    pub points_cost: Points,

    /// Partner platform the voucher is valid on.
    #[serde(default)]
    pub platform: String,

    /// Discount label, e.g. `15% OFF`.
    #[serde(default)]
    pub discount: String,
}

impl Reward {
    /// How many more points `balance` needs to afford this reward.
    #[must_use]
    pub fn shortfall(&self, balance: Points) -> Option<Points> {
        balance
            .debit(self.points_cost)
            .err()
            .as_ref()
            .map(InsufficientPoints::shortfall)
    }
}

#[derive(Debug, Deserialize)]
struct RewardCatalogFixture {
    rewards: Vec<Reward>,
}

/// The set of rewards a user can choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardCatalog {
    rewards: Vec<Reward>,
}

impl RewardCatalog {
    /// Build a catalog, rejecting duplicate ids and free rewards.
    ///
    /// # Errors
    ///
    /// Returns an error when two rewards share an id or a reward costs zero.
    pub fn new(rewards: Vec<Reward>) -> Result<Self, RewardCatalogError> {
        for (idx, reward) in rewards.iter().enumerate() {
            if reward.points_cost == Points::ZERO {
                return Err(RewardCatalogError::FreeReward(reward.id.clone()));
            }

            if rewards.iter().take(idx).any(|other| other.id == reward.id) {
                return Err(RewardCatalogError::DuplicateId(reward.id.clone()));
            }
        }

        Ok(Self { rewards })
    }

    /// Parse a catalog from YAML of the form `rewards: [...]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or fails catalog validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, RewardCatalogError> {
        let fixture: RewardCatalogFixture = serde_norway::from_str(yaml)?;

        Self::new(fixture.rewards)
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RewardCatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Find a reward by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|reward| reward.id == id)
    }

    /// Iterate over rewards in catalog order.
    pub fn iter(&self) -> slice::Iter<'_, Reward> {
        self.rewards.iter()
    }

    /// Number of rewards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

impl Default for RewardCatalog {
    /// The partner rewards that ship with the app.
    fn default() -> Self {
        let reward = |id: &str, name: &str, description: &str, cost, platform: &str, discount: &str| {
            Reward {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                points_cost: Points::new(cost),
                platform: platform.to_string(),
                discount: discount.to_string(),
            }
        };

        Self {
            rewards: vec![
                reward(
                    "noon-discount",
                    "noon.com Discount",
                    "15% off on your next purchase",
                    100,
                    "noon.com",
                    "15% OFF",
                ),
                reward(
                    "talabat-discount",
                    "Talabat Voucher",
                    "20 AED off on your next order",
                    150,
                    "Talabat",
                    "20 AED OFF",
                ),
                reward(
                    "smile-discount",
                    "Smiles App Points",
                    "Get 500 Smiles points",
                    200,
                    "Smiles App",
                    "500 POINTS",
                ),
            ],
        }
    }
}
