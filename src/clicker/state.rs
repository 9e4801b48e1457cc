/// Mushroom economy state definitions.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A purchasable upgrade, loaded once from the embedded catalog.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDefinition {
    /// Unique key; also the key in `EconomyState::owned_counts`.
    pub name: String,
    pub description: String,
    /// Price of the first unit.
    pub base_price: f64,
    /// Mushrooms per second contributed by each owned unit.
    pub base_generation_rate: f64,
    /// Growth factor applied per unit already owned (> 1).
    pub price_multiplier: f64,
}

impl UpgradeDefinition {
    /// Display glyph for falling sprites and list markers.
    pub fn glyph(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('*')
    }
}

/// How many units a single purchase buys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BulkQuantity {
    #[default]
    One,
    Ten,
    Hundred,
}

impl BulkQuantity {
    /// All quantities in display order.
    pub fn all() -> &'static [BulkQuantity] {
        &[BulkQuantity::One, BulkQuantity::Ten, BulkQuantity::Hundred]
    }

    pub fn count(self) -> u32 {
        match self {
            BulkQuantity::One => 1,
            BulkQuantity::Ten => 10,
            BulkQuantity::Hundred => 100,
        }
    }

    /// Parse a stored count. Only 1, 10 and 100 are valid.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(BulkQuantity::One),
            10 => Some(BulkQuantity::Ten),
            100 => Some(BulkQuantity::Hundred),
            _ => None,
        }
    }

    /// Index into `all()`.
    pub fn index(self) -> usize {
        match self {
            BulkQuantity::One => 0,
            BulkQuantity::Ten => 1,
            BulkQuantity::Hundred => 2,
        }
    }
}

/// The single mutable economy record. Owned by `logic::Economy`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EconomyState {
    /// Current mushrooms. Never negative.
    pub balance: f64,
    /// Units owned per upgrade name. Missing names count as zero.
    pub owned_counts: BTreeMap<String, u32>,
    /// One-time unlock bought with the grand prize.
    pub grand_prize_unlocked: bool,
}

impl EconomyState {
    pub fn owned(&self, name: &str) -> u32 {
        self.owned_counts.get(name).copied().unwrap_or(0)
    }

    /// Total units owned across every upgrade.
    pub fn total_owned(&self) -> u64 {
        self.owned_counts.values().map(|&c| c as u64).sum()
    }
}
