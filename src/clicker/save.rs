//! Save/load for the mushroom economy.
//!
//! Each field lives under its own key so that one corrupt value never takes
//! the rest of the save down with it. Key names match the earlier web build,
//! so existing browser saves keep loading.
//!
//! Loading decodes every key independently and falls back to the field's
//! default on any failure (missing, non-numeric, out of range, bad JSON).

use std::collections::{BTreeMap, HashMap};

use super::config::AUTOSAVE_INTERVAL_TICKS;
use super::state::{BulkQuantity, EconomyState};

pub const KEY_BALANCE: &str = "mushrooms";
pub const KEY_OWNED: &str = "ownedUpgrades";
pub const KEY_BULK: &str = "bulkPurchaseAmount";
pub const KEY_GRAND_PRIZE: &str = "grandPrizeRevealed";

const ALL_KEYS: &[&str] = &[KEY_BALANCE, KEY_OWNED, KEY_BULK, KEY_GRAND_PRIZE];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(String),
}

/// A flat string key-value store (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests and when `localStorage` is unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// `None` when storage is disabled (e.g. some private browsing modes).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}

/// Everything that survives a page reload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SavedGame {
    pub economy: EconomyState,
    pub bulk: BulkQuantity,
}

/// A stored value that could not be decoded.
#[derive(Debug, thiserror::Error)]
enum CorruptField {
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("bad JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn decode_balance(raw: &str) -> Result<f64, CorruptField> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CorruptField::NotANumber(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(CorruptField::OutOfRange(raw.to_string()));
    }
    Ok(value)
}

fn decode_owned(raw: &str) -> Result<BTreeMap<String, u32>, CorruptField> {
    Ok(serde_json::from_str(raw)?)
}

fn decode_bulk(raw: &str) -> Result<BulkQuantity, CorruptField> {
    let count: u32 = raw
        .trim()
        .parse()
        .map_err(|_| CorruptField::NotANumber(raw.to_string()))?;
    BulkQuantity::from_count(count).ok_or_else(|| CorruptField::OutOfRange(raw.to_string()))
}

fn decode_flag(raw: &str) -> Result<bool, CorruptField> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(CorruptField::OutOfRange(other.to_string())),
    }
}

/// Read one key and decode it, or fall back to `T::default()`.
fn load_field<T: Default>(
    store: &dyn KeyValueStore,
    key: &str,
    decode: fn(&str) -> Result<T, CorruptField>,
) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("grzybo: failed to read {key}: {e}");
            return T::default();
        }
    };
    match decode(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("grzybo: ignoring corrupt {key} ({e}), using default");
            T::default()
        }
    }
}

/// Restore the saved game. Never fails; unusable fields become defaults.
pub fn load(store: &dyn KeyValueStore) -> SavedGame {
    let economy = EconomyState {
        balance: load_field(store, KEY_BALANCE, decode_balance),
        owned_counts: load_field(store, KEY_OWNED, decode_owned),
        grand_prize_unlocked: load_field(store, KEY_GRAND_PRIZE, decode_flag),
    };
    let bulk = load_field(store, KEY_BULK, decode_bulk);
    SavedGame { economy, bulk }
}

/// Write every field, overwriting previous values.
pub fn save(store: &mut dyn KeyValueStore, saved: &SavedGame) -> Result<(), StoreError> {
    let owned = serde_json::to_string(&saved.economy.owned_counts)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    store.set(KEY_BALANCE, &saved.economy.balance.to_string())?;
    store.set(KEY_OWNED, &owned)?;
    store.set(KEY_BULK, &saved.bulk.count().to_string())?;
    store.set(KEY_GRAND_PRIZE, &saved.economy.grand_prize_unlocked.to_string())?;
    Ok(())
}

/// Remove every key this module writes.
pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
    for key in ALL_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

/// Decides when to write. User actions save right away; passive ticks only
/// mark the state dirty and are written every `AUTOSAVE_INTERVAL_TICKS`.
#[derive(Debug)]
pub struct AutoSave {
    interval_ticks: u32,
    ticks_since_save: u32,
    dirty: bool,
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL_TICKS)
    }
}

impl AutoSave {
    pub fn new(interval_ticks: u32) -> Self {
        Self {
            interval_ticks: interval_ticks.max(1),
            ticks_since_save: 0,
            dirty: false,
        }
    }

    /// Record `ticks` passive ticks. Returns true when a save is due.
    pub fn on_ticks(&mut self, ticks: u32) -> bool {
        if ticks == 0 {
            return false;
        }
        self.dirty = true;
        self.ticks_since_save = self.ticks_since_save.saturating_add(ticks);
        self.ticks_since_save >= self.interval_ticks
    }

    /// Something changed that is not on disk yet, e.g. after a failed write.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call after a successful write.
    pub fn saved(&mut self) {
        self.dirty = false;
        self.ticks_since_save = 0;
    }
}
