//! Semantic action IDs for click targets, registered during render and
//! dispatched via `InputEvent::Click`.

// ── Main screen ─────────────────────────────────────────────────
pub const CLICK_MUSHROOM: u16 = 0;
pub const OPEN_UPGRADES: u16 = 10;
pub const CLOSE_OVERLAY: u16 = 11;
pub const SCROLL_UP: u16 = 12;
pub const SCROLL_DOWN: u16 = 13;
pub const BUY_GRAND_PRIZE: u16 = 20;

// ── Upgrades panel ──────────────────────────────────────────────
/// Bulk quantity selector (base + index into `BulkQuantity::all()`).
pub const BULK_BASE: u16 = 30;
pub const OPEN_RESET: u16 = 40;
pub const CONFIRM_RESET: u16 = 41;
pub const OPEN_CODE_ENTRY: u16 = 50;
pub const SUBMIT_CODE: u16 = 51;

// ── Upgrade purchase (base + catalog index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;
