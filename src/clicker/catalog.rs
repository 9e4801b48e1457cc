//! Static upgrade catalog, embedded as JSON and validated once at startup.

use std::collections::HashSet;

use serde::Deserialize;

use super::state::UpgradeDefinition;

const BUILTIN_UPGRADES: &str = include_str!("upgrades.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate upgrade name: {0}")]
    DuplicateName(String),
    #[error("upgrade {0}: base price must be a finite number >= 0")]
    InvalidBasePrice(String),
    #[error("upgrade {0}: generation rate must be a finite number >= 0")]
    InvalidGenerationRate(String),
    #[error("upgrade {0}: price multiplier must be a finite number > 1")]
    InvalidPriceMultiplier(String),
}

#[derive(Deserialize)]
struct CatalogFile {
    upgrades: Vec<UpgradeDefinition>,
}

/// Ordered, immutable list of upgrade definitions.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    upgrades: Vec<UpgradeDefinition>,
}

impl Catalog {
    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_UPGRADES)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.upgrades)
    }

    /// Validate and wrap a list of definitions. Display order is preserved.
    pub fn new(upgrades: Vec<UpgradeDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for u in &upgrades {
            if !seen.insert(u.name.as_str()) {
                return Err(CatalogError::DuplicateName(u.name.clone()));
            }
            if !u.base_price.is_finite() || u.base_price < 0.0 {
                return Err(CatalogError::InvalidBasePrice(u.name.clone()));
            }
            if !u.base_generation_rate.is_finite() || u.base_generation_rate < 0.0 {
                return Err(CatalogError::InvalidGenerationRate(u.name.clone()));
            }
            if !u.price_multiplier.is_finite() || u.price_multiplier <= 1.0 {
                return Err(CatalogError::InvalidPriceMultiplier(u.name.clone()));
            }
        }
        Ok(Self { upgrades })
    }

    pub fn get(&self, name: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.name == name)
    }

    pub fn upgrades(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }
}
