//! Tunable constants for the mushroom economy and its UI cadence.

/// Milliseconds between passive-income ticks.
pub const TICK_INTERVAL_MS: f64 = 1000.0;

/// Milliseconds between animation frames for falling sprites and flashes.
pub const ANIM_INTERVAL_MS: f64 = 100.0;

/// Clicks closer together than this are treated as one physical press.
pub const CLICK_DEBOUNCE_MS: f64 = 100.0;

/// Price of the one-time grand prize.
pub const GRAND_PRIZE_COST: f64 = 50_000_000.0;

/// Passive ticks between debounced autosaves (5 seconds).
pub const AUTOSAVE_INTERVAL_TICKS: u32 = 5;

/// Upper bound on ticks replayed after a long pause (background tab).
pub const MAX_CATCH_UP_TICKS: u32 = 60;

/// Redeemable codes (lowercase) and the mushrooms they grant.
pub const REDEEM_CODES: &[(&str, f64)] = &[("klapaucius", 1_000.0), ("motherlode", 50_000.0)];

/// Quote shown when the grand prize is revealed.
pub const GRAND_PRIZE_QUOTE: &str = "\"Samuraj nie ma celu, tylko drogę\" ~Sumimasen";

/// Link shown below the grand prize quote.
pub const GRAND_PRIZE_LINK: &str = "https://www.youtube.com/watch?v=pzagBTcYsYQ";
