//! Grzybo Clicker: the game boundary tying input and clocks to the economy.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod falling;
pub mod format;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::time::TickClock;

use catalog::Catalog;
use config::{ANIM_INTERVAL_MS, MAX_CATCH_UP_TICKS, TICK_INTERVAL_MS};
use falling::FallingSprites;
use logic::{Economy, EconomyError};
use save::{AutoSave, KeyValueStore, SavedGame};
use state::BulkQuantity;

/// Longest code the entry box accepts.
const MAX_CODE_LEN: usize = 32;

/// Animation frames a status message stays visible.
const STATUS_FRAMES: u32 = 30;

/// What is drawn over the main screen.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    None,
    Upgrades,
    /// Hidden code box with the text typed so far.
    CodeEntry(String),
    ConfirmReset,
    GrandPrize,
}

pub struct ClickerGame {
    pub economy: Economy,
    pub bulk: BulkQuantity,
    pub overlay: Overlay,
    pub sprites: FallingSprites,
    /// Frames left on the mushroom's pressed look.
    pub click_flash: u32,
    /// Animation frame counter.
    pub anim_frame: u32,
    /// Short feedback line and the frames it has left.
    pub status: Option<(String, u32)>,
    /// First upgrade shown in the upgrades panel.
    pub upgrades_scroll: usize,
    /// Largest useful `upgrades_scroll` for the last rendered layout.
    upgrades_scroll_max: usize,
    store: Box<dyn KeyValueStore>,
    autosave: AutoSave,
    tick_clock: TickClock,
    anim_clock: TickClock,
}

impl ClickerGame {
    /// Restore from `store` (or start fresh) with the given catalog.
    pub fn new(catalog: Catalog, store: Box<dyn KeyValueStore>, seed: u32) -> Self {
        let SavedGame { economy, bulk } = save::load(store.as_ref());
        log::info!(
            "grzybo: loaded {} mushrooms, {} upgrades owned",
            economy.balance,
            economy.total_owned()
        );
        Self {
            economy: Economy::with_state(catalog, economy),
            bulk,
            overlay: Overlay::None,
            sprites: FallingSprites::new(seed),
            click_flash: 0,
            anim_frame: 0,
            status: None,
            upgrades_scroll: 0,
            upgrades_scroll_max: usize::MAX,
            store,
            autosave: AutoSave::default(),
            tick_clock: TickClock::new(TICK_INTERVAL_MS, MAX_CATCH_UP_TICKS),
            anim_clock: TickClock::new(ANIM_INTERVAL_MS, MAX_CATCH_UP_TICKS),
        }
    }

    /// Handle one input event at `now_ms`. Returns true if it was consumed.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        // shortcuts are case-insensitive; typed codes keep their case
        let shortcut = match event {
            InputEvent::Key(c) => InputEvent::Key(c.to_ascii_lowercase()),
            other => other.clone(),
        };
        match self.overlay.clone() {
            Overlay::None => self.handle_main(&shortcut, now_ms),
            Overlay::Upgrades => self.handle_upgrades(&shortcut),
            Overlay::CodeEntry(text) => self.handle_code_entry(event, text),
            Overlay::ConfirmReset => self.handle_confirm_reset(&shortcut),
            Overlay::GrandPrize => {
                // any input dismisses the reveal
                self.overlay = Overlay::None;
                true
            }
        }
    }

    fn handle_main(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        match event {
            InputEvent::Key('c') | InputEvent::Key(' ') => self.click(now_ms),
            InputEvent::Click(actions::CLICK_MUSHROOM) => self.click(now_ms),
            InputEvent::Key('u') | InputEvent::Click(actions::OPEN_UPGRADES) => {
                self.overlay = Overlay::Upgrades;
            }
            InputEvent::Key('g') | InputEvent::Click(actions::BUY_GRAND_PRIZE) => {
                self.buy_grand_prize();
            }
            _ => return false,
        }
        true
    }

    fn handle_upgrades(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('x')
            | InputEvent::Cancel
            | InputEvent::Click(actions::CLOSE_OVERLAY) => {
                self.overlay = Overlay::None;
            }
            InputEvent::ScrollUp | InputEvent::Click(actions::SCROLL_UP) => {
                self.scroll_upgrades(-1);
            }
            InputEvent::ScrollDown | InputEvent::Click(actions::SCROLL_DOWN) => {
                self.scroll_upgrades(1);
            }
            InputEvent::Key('/') | InputEvent::Click(actions::OPEN_CODE_ENTRY) => {
                self.overlay = Overlay::CodeEntry(String::new());
            }
            InputEvent::Key('!') | InputEvent::Click(actions::OPEN_RESET) => {
                self.overlay = Overlay::ConfirmReset;
            }
            InputEvent::Key(c @ '1'..='3') => {
                let idx = (*c as u8 - b'1') as usize;
                self.set_bulk(BulkQuantity::all()[idx]);
            }
            InputEvent::Click(id)
                if (actions::BULK_BASE..actions::BULK_BASE + 3).contains(id) =>
            {
                self.set_bulk(BulkQuantity::all()[(id - actions::BULK_BASE) as usize]);
            }
            InputEvent::Key(c @ 'a'..='w') => {
                let idx = (*c as u8 - b'a') as usize;
                if idx >= self.economy.upgrades().len() {
                    return false;
                }
                self.buy_upgrade(idx);
            }
            InputEvent::Click(id) if *id >= actions::BUY_UPGRADE_BASE => {
                self.buy_upgrade((id - actions::BUY_UPGRADE_BASE) as usize);
            }
            _ => return false,
        }
        true
    }

    fn handle_code_entry(&mut self, event: &InputEvent, mut text: String) -> bool {
        match event {
            InputEvent::Key(c) => {
                if text.chars().count() < MAX_CODE_LEN {
                    text.push(*c);
                }
                self.overlay = Overlay::CodeEntry(text);
            }
            InputEvent::Erase => {
                text.pop();
                self.overlay = Overlay::CodeEntry(text);
            }
            InputEvent::Confirm | InputEvent::Click(actions::SUBMIT_CODE) => {
                self.submit_code(&text);
            }
            InputEvent::Cancel | InputEvent::Click(actions::CLOSE_OVERLAY) => {
                self.overlay = Overlay::Upgrades;
            }
            _ => return false,
        }
        true
    }

    fn handle_confirm_reset(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('y') | InputEvent::Click(actions::CONFIRM_RESET) => self.reset(),
            InputEvent::Key('n')
            | InputEvent::Cancel
            | InputEvent::Click(actions::CLOSE_OVERLAY) => {
                self.overlay = Overlay::Upgrades;
            }
            _ => return false,
        }
        true
    }

    fn click(&mut self, now_ms: f64) {
        if self.economy.click(now_ms).is_some() {
            self.click_flash = 2;
            self.sprites.on_click();
            self.persist();
        }
    }

    fn buy_upgrade(&mut self, idx: usize) {
        let Some(name) = self.economy.upgrades().get(idx).map(|u| u.name.clone()) else {
            return;
        };
        let qty = self.bulk.count();
        match self.economy.purchase(&name, qty) {
            Ok(_) => {
                self.set_status(format!("Bought {}× {}", qty, name));
                self.persist();
            }
            Err(EconomyError::InsufficientFunds { .. }) => {
                self.set_status("Not enough mushrooms".to_string());
            }
            Err(e) => log::warn!("grzybo: purchase of {name} failed: {e}"),
        }
    }

    /// Move the upgrades list by `delta` entries, within the last layout's range.
    fn scroll_upgrades(&mut self, delta: isize) {
        let max = self
            .upgrades_scroll_max
            .min(self.economy.upgrades().len().saturating_sub(1));
        self.upgrades_scroll = self
            .upgrades_scroll
            .min(max)
            .saturating_add_signed(delta)
            .min(max);
    }

    fn set_bulk(&mut self, bulk: BulkQuantity) {
        if self.bulk != bulk {
            self.bulk = bulk;
            self.persist();
        }
    }

    fn buy_grand_prize(&mut self) {
        match self.economy.buy_grand_prize() {
            Ok(()) => {
                log::info!("grzybo: grand prize unlocked");
                self.overlay = Overlay::GrandPrize;
                self.persist();
            }
            Err(e) => log::debug!("grzybo: grand prize not bought: {e}"),
        }
    }

    fn submit_code(&mut self, code: &str) {
        // unrecognized codes are a silent no-op; the box stays open as typed
        if let Ok(amount) = self.economy.redeem_code(code) {
            self.set_status(format!("+{}", format::format_large_number(amount)));
            self.overlay = Overlay::Upgrades;
            self.persist();
        }
    }

    fn reset(&mut self) {
        self.economy.reset();
        self.bulk = BulkQuantity::default();
        self.sprites.clear();
        self.status = None;
        self.overlay = Overlay::None;
        self.upgrades_scroll = 0;
        match save::clear(self.store.as_mut()) {
            Ok(()) => self.autosave.saved(),
            Err(e) => {
                // a later flush writes the defaults over the stale save
                log::warn!("grzybo: failed to clear save: {e}");
                self.autosave.mark_dirty();
            }
        }
    }

    fn set_status(&mut self, text: String) {
        self.status = Some((text, STATUS_FRAMES));
    }

    /// Advance clocks to `now_ms`: passive income, animation and autosave.
    pub fn update(&mut self, now_ms: f64) {
        let ticks = self.tick_clock.update(now_ms);
        for _ in 0..ticks {
            self.economy.tick();
        }
        if self.autosave.on_ticks(ticks) {
            self.persist();
        }

        let frames = self.anim_clock.update(now_ms);
        if frames > 0 {
            let owned = self.owned_glyphs();
            self.sprites.advance(frames, &owned);
            self.anim_frame = self.anim_frame.wrapping_add(frames);
            self.click_flash = self.click_flash.saturating_sub(frames);
            if let Some((_, left)) = &mut self.status {
                *left = left.saturating_sub(frames);
            }
            if matches!(self.status, Some((_, 0))) {
                self.status = None;
            }
        }
    }

    /// Write any state not yet saved. Called when the page is hidden or closed.
    pub fn flush(&mut self) {
        if self.autosave.is_dirty() {
            self.persist();
        }
    }

    pub fn saved_game(&self) -> SavedGame {
        SavedGame {
            economy: self.economy.state().clone(),
            bulk: self.bulk,
        }
    }

    fn persist(&mut self) {
        let saved = self.saved_game();
        match save::save(self.store.as_mut(), &saved) {
            Ok(()) => self.autosave.saved(),
            Err(e) => {
                log::warn!("grzybo: save failed, will retry: {e}");
                self.autosave.mark_dirty();
            }
        }
    }

    /// `(glyph, owned)` for every catalog upgrade, in catalog order.
    fn owned_glyphs(&self) -> Vec<(char, u32)> {
        self.economy
            .upgrades()
            .iter()
            .map(|u| (u.glyph(), self.economy.owned_count(&u.name)))
            .collect()
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        if let Some(max) = render::render(self, f, area, cs) {
            self.upgrades_scroll_max = max;
            self.upgrades_scroll = self.upgrades_scroll.min(max);
        }
    }

    #[cfg(test)]
    fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}
