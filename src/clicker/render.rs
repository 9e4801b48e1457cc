//! Grzybo Clicker rendering: counter header, the mushroom field with falling
//! sprites, the two bottom buttons and the modal overlays.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, SegmentBar};

use super::actions::*;
use super::config::{GRAND_PRIZE_COST, GRAND_PRIZE_LINK, GRAND_PRIZE_QUOTE};
use super::format::format_large_number;
use super::state::BulkQuantity;
use super::{ClickerGame, Overlay};

/// The big mushroom. Rows before `CAP_ROWS` are the cap.
const MUSHROOM_ART: &[&str] = &[
    "    .-'~~~~~'-.    ",
    "  .'  o     o  '.  ",
    " /   o    O   o  \\ ",
    "|  O     o     O  |",
    " '-.,_________,.-' ",
    "      |     |      ",
    "      |     |      ",
    "      '-----'      ",
];
const CAP_ROWS: usize = 5;
const ART_WIDTH: u16 = 19;

/// Draw the whole screen and register its click targets.
///
/// Returns the largest useful upgrades scroll when the upgrades panel is open.
pub fn render(game: &ClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) -> Option<usize> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // counter
            Constraint::Min(3),    // mushroom field
            Constraint::Length(3), // grand prize
            Constraint::Length(3), // upgrades
        ])
        .split(area);

    render_header(game, f, chunks[0]);
    render_field(game, f, chunks[1], cs);
    render_grand_prize_button(game, f, chunks[2], cs);
    render_upgrades_button(f, chunks[3], cs);

    // overlays register after the main screen so their targets sit on top
    match &game.overlay {
        Overlay::None => {}
        Overlay::Upgrades => return Some(render_upgrades(game, f, area, cs)),
        Overlay::CodeEntry(text) => render_code_entry(game, text, f, area, cs),
        Overlay::ConfirmReset => render_confirm_reset(f, area, cs),
        Overlay::GrandPrize => render_grand_prize(f, area, cs),
    }
    None
}

fn render_header(game: &ClickerGame, f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Grzybi: {}", format_large_number(game.economy.balance())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} gps", format_large_number(game.economy.generation_rate())),
            Style::default().fg(Color::White),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" 🍄 Grzybo Clicker ");
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// The clickable play field. The whole inner area counts as the mushroom.
fn render_field(game: &ClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let border_color = if game.click_flash > 0 { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);
    cs.add_click_target(inner, CLICK_MUSHROOM);

    if inner.width < 2 || inner.height == 0 {
        return;
    }

    for sprite in &game.sprites.sprites {
        let Some(row) = sprite.row(inner.height) else {
            continue;
        };
        // glyphs can be two cells wide
        let col = sprite.col(inner.width - 1);
        let style = if sprite.big {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled(sprite.glyph.to_string(), style)),
            Rect::new(inner.x + col, inner.y + row, 2, 1),
        );
    }

    let art_height = MUSHROOM_ART.len() as u16;
    if inner.width >= ART_WIDTH && inner.height > art_height {
        let pressed = game.click_flash > 0;
        let cap_color = if pressed { Color::Yellow } else { Color::Red };
        let lines: Vec<Line> = MUSHROOM_ART
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i < CAP_ROWS {
                    Style::default().fg(cap_color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(*row, style))
            })
            .collect();
        // pressed mushroom sinks one row
        let sink = u16::from(pressed);
        let y = inner.y + (inner.height - art_height) / 2 + sink;
        let x = inner.x + (inner.width - ART_WIDTH) / 2;
        let height = art_height.min(inner.y + inner.height - y);
        f.render_widget(Paragraph::new(lines), Rect::new(x, y, ART_WIDTH, height));
    } else {
        let y = inner.y + inner.height / 2;
        f.render_widget(
            Paragraph::new(Span::styled(
                "🍄 tap to click 🍄",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Rect::new(inner.x, y, inner.width, 1),
        );
    }

    if let Some((text, _)) = &game.status {
        f.render_widget(
            Paragraph::new(Span::styled(text.as_str(), Style::default().fg(Color::Green)))
                .alignment(Alignment::Center),
            Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
        );
    }
}

fn render_grand_prize_button(
    game: &ClickerGame,
    f: &mut Frame,
    area: Rect,
    cs: &mut ClickState,
) {
    let unlocked = game.economy.grand_prize_unlocked();
    let enabled = !unlocked && game.economy.balance() >= GRAND_PRIZE_COST;
    let (label, style) = if unlocked {
        (
            "★ GRAND PRIZE claimed ★".to_string(),
            Style::default().fg(Color::Green),
        )
    } else {
        let style = if enabled {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        (
            format!("[G] GRAND PRIZE ({})", format_large_number(GRAND_PRIZE_COST)),
            style,
        )
    };
    let block = Block::default().borders(Borders::ALL).border_style(style);
    f.render_widget(
        Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
    if enabled {
        cs.add_click_target(area, BUY_GRAND_PRIZE);
    }
}

fn render_upgrades_button(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
    let block = Block::default().borders(Borders::ALL).border_style(style);
    f.render_widget(
        Paragraph::new(Span::styled("[U] Upgrades", style))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
    cs.add_click_target(area, OPEN_UPGRADES);
}

/// `width` x `height` rect centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Purchase key shown next to catalog entry `index`.
fn upgrade_key(index: usize) -> char {
    match u8::try_from(index) {
        Ok(i) if i < 23 => (b'a' + i) as char,
        _ => ' ',
    }
}

/// Returns the last upgrade index the list may start at.
fn render_upgrades(game: &ClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) -> usize {
    let panel = centered(area, 64, area.height.saturating_sub(2));
    f.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Upgrades ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // bulk picker
            Constraint::Length(1), // balance
            Constraint::Min(1),    // list
            Constraint::Length(1), // footer buttons
        ])
        .split(inner);

    let mut bulk_bar = SegmentBar::new(" │ ");
    for (i, q) in BulkQuantity::all().iter().enumerate() {
        let style = if i == game.bulk.index() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        bulk_bar = bulk_bar.segment(
            format!("[{}] x{}", i + 1, q.count()),
            style,
            BULK_BASE + i as u16,
        );
    }
    bulk_bar.render(f, chunks[0], cs);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!(" Grzybi: {}", format_large_number(game.economy.balance())),
            Style::default().fg(Color::Yellow),
        )),
        chunks[1],
    );

    let narrow = is_narrow_layout(area.width);
    let qty = game.bulk.count();
    let mut cl = ClickableList::new();
    // line index where each upgrade's entry begins
    let mut starts = Vec::new();
    for (i, up) in game.economy.upgrades().iter().enumerate() {
        let id = BUY_UPGRADE_BASE + i as u16;
        starts.push(cl.next_index());
        let owned = game.economy.owned_count(&up.name);
        let price = game
            .economy
            .current_price(&up.name, qty)
            .unwrap_or(f64::INFINITY);
        let affordable = game.economy.can_afford(&up.name, qty);
        let (name_style, price_style) = if affordable {
            (
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Yellow),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };

        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!("[{}] ", upgrade_key(i)), Style::default().fg(Color::Cyan)),
                Span::styled(up.name.clone(), name_style),
                Span::styled(format!("  Owned: {}", owned), Style::default().fg(Color::White)),
            ]),
            id,
        );
        let gps = format_large_number(up.base_generation_rate * qty as f64);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!("    Price: {}", format_large_number(price)), price_style),
                Span::styled(format!("  +{} gps", gps), Style::default().fg(Color::DarkGray)),
            ]),
            id,
        );
        if !narrow {
            cl.push_clickable(
                Line::from(Span::styled(
                    format!("    {}", up.description),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                )),
                id,
            );
        }
    }
    let list_area = chunks[2];
    let width = list_area.width;
    let total = cl.visual_height(width);
    let (view, first, max_first) = if total <= list_area.height || list_area.height < 3 {
        (list_area, 0, 0)
    } else {
        // one row above and one below for the scroll arrows
        let view = Rect::new(list_area.x, list_area.y + 1, width, list_area.height - 2);
        let max_first = starts
            .iter()
            .position(|&s| total - cl.visual_start(s, width) <= view.height)
            .unwrap_or(starts.len().saturating_sub(1));
        let first = game.upgrades_scroll.min(max_first);
        let top_row = Rect::new(list_area.x, list_area.y, width, 1);
        let bottom_row = Rect::new(list_area.x, view.y + view.height, width, 1);
        render_scroll_arrow(f, cs, top_row, ScrollArrow::Up, first > 0);
        render_scroll_arrow(f, cs, bottom_row, ScrollArrow::Down, first < max_first);
        (view, first, max_first)
    };
    let scroll = starts.get(first).map_or(0, |&s| cl.visual_start(s, width));
    cl.register_targets(view, cs, 0, 0, scroll, width);
    f.render_widget(
        Paragraph::new(cl.into_lines())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        view,
    );

    SegmentBar::new(" │ ")
        .segment("[/] Code", Style::default().fg(Color::Cyan), OPEN_CODE_ENTRY)
        .segment("[!] Reset", Style::default().fg(Color::Red), OPEN_RESET)
        .segment("[X] Close", Style::default().fg(Color::White), CLOSE_OVERLAY)
        .render(f, chunks[3], cs);
    max_first
}

enum ScrollArrow {
    Up,
    Down,
}

/// One row with a scroll arrow. Tappable only while there is more to see.
fn render_scroll_arrow(
    f: &mut Frame,
    cs: &mut ClickState,
    row: Rect,
    arrow: ScrollArrow,
    active: bool,
) {
    let (text, action) = match arrow {
        ScrollArrow::Up => ("▲ more (↑)", SCROLL_UP),
        ScrollArrow::Down => ("▼ more (↓)", SCROLL_DOWN),
    };
    if !active {
        f.render_widget(
            Paragraph::new(Span::styled("·", Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
            row,
        );
        return;
    }
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::Cyan)))
            .alignment(Alignment::Center),
        row,
    );
    cs.add_click_target(row, action);
}

fn render_code_entry(
    game: &ClickerGame,
    text: &str,
    f: &mut Frame,
    area: Rect,
    cs: &mut ClickState,
) {
    let panel = centered(area, 40, 6);
    f.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Code ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let cursor = if (game.anim_frame / 5) % 2 == 0 { "_" } else { " " };
    f.render_widget(
        Paragraph::new(Span::styled("Enter a code:", Style::default().fg(Color::Gray))),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("> {}{}", text, cursor),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        chunks[1],
    );
    SegmentBar::new(" │ ")
        .segment("Redeem (Enter)", Style::default().fg(Color::Green), SUBMIT_CODE)
        .segment("Cancel (Esc)", Style::default().fg(Color::DarkGray), CLOSE_OVERLAY)
        .render(f, chunks[3], cs);
}

fn render_confirm_reset(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let panel = centered(area, 44, 7);
    f.render_widget(Clear, panel);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Reset game? ");
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(
            "All mushrooms and upgrades will be lost. This cannot be undone.",
            Style::default().fg(Color::White),
        ))
        .wrap(Wrap { trim: true }),
        chunks[0],
    );
    SegmentBar::new(" │ ")
        .segment(
            "[Y] Reset",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            CONFIRM_RESET,
        )
        .segment("[N] Cancel", Style::default().fg(Color::White), CLOSE_OVERLAY)
        .render(f, chunks[1], cs);
}

fn render_grand_prize(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    // any tap closes the reveal
    cs.add_click_target(area, CLOSE_OVERLAY);

    let panel = centered(area, 56, 10);
    f.render_widget(Clear, panel);
    let style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(Span::styled(" ★ GRAND PRIZE ★ ", style));

    let lines = vec![
        Line::from(Span::styled(
            GRAND_PRIZE_QUOTE,
            Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(Span::styled(
            GRAND_PRIZE_LINK,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(""),
        Line::from(Span::styled("tap to close", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        panel,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::catalog::Catalog;
    use crate::clicker::save::MemoryStore;
    use crate::input::InputEvent;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn game() -> ClickerGame {
        ClickerGame::new(Catalog::builtin().unwrap(), Box::new(MemoryStore::new()), 9)
    }

    fn draw(game: &mut ClickerGame, cols: u16, rows: u16) -> ClickState {
        let mut terminal = Terminal::new(TestBackend::new(cols, rows)).unwrap();
        let mut cs = ClickState::new();
        cs.begin_frame(cols, rows);
        terminal
            .draw(|f| {
                let area = f.area();
                game.render(f, area, &mut cs);
            })
            .unwrap();
        cs
    }

    fn has_target(cs: &ClickState, id: u16) -> bool {
        cs.targets.iter().any(|t| t.action_id == id)
    }

    #[test]
    fn main_screen_targets() {
        let mut g = game();
        let cs = draw(&mut g, 60, 30);
        // field inner area covers rows 5 to 22
        assert_eq!(cs.hit_test(30, 12), Some(CLICK_MUSHROOM));
        assert_eq!(cs.hit_test(30, 28), Some(OPEN_UPGRADES));
        // grand prize is not affordable yet
        assert!(!has_target(&cs, BUY_GRAND_PRIZE));
    }

    #[test]
    fn grand_prize_button_enabled_when_affordable() {
        let mut g = game();
        g.economy = crate::clicker::logic::Economy::with_state(
            Catalog::builtin().unwrap(),
            crate::clicker::state::EconomyState {
                balance: GRAND_PRIZE_COST,
                ..Default::default()
            },
        );
        let cs = draw(&mut g, 60, 30);
        assert_eq!(cs.hit_test(30, 25), Some(BUY_GRAND_PRIZE));
    }

    #[test]
    fn upgrades_overlay_registers_every_upgrade() {
        let mut g = game();
        g.overlay = Overlay::Upgrades;
        let cs = draw(&mut g, 80, 60);
        for i in 0..g.economy.upgrades().len() as u16 {
            assert!(has_target(&cs, BUY_UPGRADE_BASE + i), "upgrade {}", i);
        }
        for i in 0..3 {
            assert!(has_target(&cs, BULK_BASE + i));
        }
        assert!(has_target(&cs, OPEN_CODE_ENTRY));
        assert!(has_target(&cs, OPEN_RESET));
        assert!(has_target(&cs, CLOSE_OVERLAY));
    }

    #[test]
    fn roomy_upgrades_list_has_no_scroll_arrows() {
        let mut g = game();
        g.overlay = Overlay::Upgrades;
        let cs = draw(&mut g, 80, 60);
        assert!(!has_target(&cs, SCROLL_UP));
        assert!(!has_target(&cs, SCROLL_DOWN));
    }

    #[test]
    fn short_screen_scrolls_to_every_upgrade() {
        let count = game().economy.upgrades().len() as u16;
        for (cols, rows) in [(80, 30), (50, 24)] {
            let mut g = game();
            g.overlay = Overlay::Upgrades;
            let mut seen = std::collections::HashSet::new();
            let mut cs = draw(&mut g, cols, rows);
            assert!(!has_target(&cs, SCROLL_UP), "{}x{} starts at the top", cols, rows);
            for _ in 0..count {
                seen.extend(cs.targets.iter().map(|t| t.action_id));
                if !has_target(&cs, SCROLL_DOWN) {
                    break;
                }
                g.handle_input(&InputEvent::Click(SCROLL_DOWN), 0.0);
                cs = draw(&mut g, cols, rows);
            }
            seen.extend(cs.targets.iter().map(|t| t.action_id));
            for i in 0..count {
                assert!(seen.contains(&(BUY_UPGRADE_BASE + i)), "{}x{} upgrade {}", cols, rows, i);
            }
            assert!(!has_target(&cs, SCROLL_DOWN), "{}x{} reaches the end", cols, rows);
            assert!(has_target(&cs, SCROLL_UP));
        }
    }

    #[test]
    fn scroll_stops_at_the_last_page() {
        let mut g = game();
        g.overlay = Overlay::Upgrades;
        draw(&mut g, 80, 30);
        for _ in 0..50 {
            g.handle_input(&InputEvent::ScrollDown, 0.0);
        }
        let at_end = g.upgrades_scroll;
        assert!(at_end > 0 && at_end < g.economy.upgrades().len());
        // one step up is visible right away
        g.handle_input(&InputEvent::ScrollUp, 0.0);
        assert_eq!(g.upgrades_scroll, at_end - 1);
        // the last entry fits once scrolled to the end
        g.upgrades_scroll = at_end;
        let cs = draw(&mut g, 80, 30);
        assert!(has_target(&cs, BUY_UPGRADE_BASE + g.economy.upgrades().len() as u16 - 1));
    }

    #[test]
    fn confirm_reset_buttons() {
        let mut g = game();
        g.overlay = Overlay::ConfirmReset;
        let cs = draw(&mut g, 60, 30);
        assert!(has_target(&cs, CONFIRM_RESET));
        assert!(has_target(&cs, CLOSE_OVERLAY));
    }

    #[test]
    fn grand_prize_overlay_closes_on_any_tap() {
        let mut g = game();
        g.overlay = Overlay::GrandPrize;
        let cs = draw(&mut g, 60, 30);
        assert_eq!(cs.hit_test(0, 0), Some(CLOSE_OVERLAY));
        assert_eq!(cs.hit_test(30, 15), Some(CLOSE_OVERLAY));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut g = game();
        for _ in 0..50 {
            g.sprites.spawn_wave(&[('K', 3)]);
        }
        for overlay in [
            Overlay::None,
            Overlay::Upgrades,
            Overlay::CodeEntry("abc".into()),
            Overlay::ConfirmReset,
            Overlay::GrandPrize,
        ] {
            g.overlay = overlay;
            draw(&mut g, 10, 12);
            draw(&mut g, 37, 20);
        }
    }

    #[test]
    fn upgrade_keys() {
        assert_eq!(upgrade_key(0), 'a');
        assert_eq!(upgrade_key(10), 'k');
        assert_eq!(upgrade_key(23), ' ');
    }
}
