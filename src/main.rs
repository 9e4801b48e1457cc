mod clicker;
mod input;
mod logger;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use clicker::catalog::Catalog;
use clicker::save::{KeyValueStore, MemoryStore};
use clicker::ClickerGame;
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Milliseconds on the page's monotonic clock.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Resolve a mouse/touch position against the grid container's bounding rect.
fn dom_pixel_to_action(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();
    let action = cs.resolve_pixel(click_x, click_y, rect.width(), rect.height());

    log::debug!(
        "click: x={} y={} action={:?} targets={}",
        mouse_x,
        mouse_y,
        action,
        cs.targets.len()
    );

    action
}

#[cfg(target_arch = "wasm32")]
fn open_store() -> Box<dyn KeyValueStore> {
    match clicker::save::LocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("grzybo: localStorage unavailable, progress will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

/// Save pending progress whenever the page is hidden or unloaded.
fn install_flush_listeners(game: &Rc<RefCell<ClickerGame>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let flush = Closure::<dyn FnMut(web_sys::Event)>::new({
        let game = game.clone();
        move |_event: web_sys::Event| {
            if let Ok(mut g) = game.try_borrow_mut() {
                g.flush();
            }
        }
    });
    let callback = flush.as_ref().unchecked_ref();
    if window
        .add_event_listener_with_callback("pagehide", callback)
        .is_err()
    {
        log::warn!("grzybo: could not listen for pagehide");
    }
    if let Some(document) = window.document() {
        if document
            .add_event_listener_with_callback("visibilitychange", callback)
            .is_err()
        {
            log::warn!("grzybo: could not listen for visibilitychange");
        }
    }
    // the listeners live as long as the page
    flush.forget();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logger::init();

    let catalog =
        Catalog::builtin().map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;
    let game = Rc::new(RefCell::new(ClickerGame::new(catalog, open_store(), seed)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    install_flush_listeners(&game);

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let action = dom_pixel_to_action(mouse_event.x, mouse_event.y, &cs);
            drop(cs);

            if let Some(id) = action {
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(id), now_ms());
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Enter => InputEvent::Confirm,
                KeyCode::Esc => InputEvent::Cancel,
                KeyCode::Backspace => InputEvent::Erase,
                KeyCode::Up | KeyCode::PageUp => InputEvent::ScrollUp,
                KeyCode::Down | KeyCode::PageDown => InputEvent::ScrollDown,
                _ => return,
            };
            game.borrow_mut().handle_input(&event, now_ms());
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let area = f.area();
            let mut g = game.borrow_mut();
            g.update(now_ms());

            let mut cs = click_state.borrow_mut();
            cs.begin_frame(area.width, area.height);
            g.render(f, area, &mut cs);
        }
    });

    Ok(())
}
