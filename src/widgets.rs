//! Clickable UI components: rendering and click-target registration together.
//!
//! - [`SegmentBar`] — one row of selectable labels (the bulk-quantity picker).
//! - [`ClickableList`] — lines where some rows trigger actions.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

/// A single row of labels, each bound to an action.
///
/// ```ignore
/// SegmentBar::new(" │ ")
///     .segment("x1", selected, actions::BULK_BASE)
///     .segment("x10", normal, actions::BULK_BASE + 1)
///     .render(f, area, &mut cs);
/// ```
pub struct SegmentBar<'a> {
    segments: Vec<(String, Style, u16)>,
    separator: &'a str,
}

impl<'a> SegmentBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            segments: Vec::new(),
            separator,
        }
    }

    pub fn segment(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.segments.push((label.into(), style, action_id));
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let gap = Line::from(self.separator).width() as u16;
        let mut spans: Vec<Span> = Vec::new();
        let mut widths: Vec<(u16, u16)> = Vec::new();

        for (i, (label, style, action_id)) in self.segments.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            let padded = format!(" {} ", label);
            widths.push((Line::from(padded.as_str()).width() as u16, action_id));
            spans.push(Span::styled(padded, style));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
        cs.add_segment_targets(area, &widths, gap);
    }
}

/// Lines that trigger actions when tapped.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push_clickable(Line::from("[a] kamienie"), BUY_UPGRADE_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, scroll, inner_width);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`.
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a line that triggers `action_id` when tapped.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    /// Index the next pushed line will get.
    pub fn next_index(&self) -> usize {
        self.lines.len()
    }

    /// Visual row where line `index` starts, given wrapping at `inner_width`.
    pub fn visual_start(&self, index: usize, inner_width: u16) -> u16 {
        self.lines[..index.min(self.lines.len())]
            .iter()
            .map(|l| line_height(l, inner_width))
            .sum()
    }

    /// Total visual rows when wrapped at `inner_width`.
    pub fn visual_height(&self, inner_width: u16) -> u16 {
        self.visual_start(self.lines.len(), inner_width)
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register targets for every clickable line.
    ///
    /// `top`/`bottom` are rows taken by borders, `scroll` is the paragraph's
    /// vertical scroll in visual rows and `inner_width` the wrap width
    /// (0 = no wrapping, one row per line).
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top: u16,
        bottom: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let first_row = area.y + top;
        let end_row = area.y + area.height.saturating_sub(bottom);

        for &(index, action_id) in &self.actions {
            let start = self.visual_start(index, inner_width);
            let height = line_height(&self.lines[index], inner_width);
            for visual in start..start + height {
                if visual < scroll {
                    continue;
                }
                let row = first_row + (visual - scroll);
                if row >= end_row {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

fn line_height(line: &Line<'_>, inner_width: u16) -> u16 {
    if inner_width == 0 {
        return 1;
    }
    let rows = Paragraph::new(line.clone())
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    (rows as u16).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clickable_rows_follow_their_lines() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("[a] kamienie"), 100);
        cl.push_clickable(Line::from("[b] twój stary"), 101);
        assert_eq!(cl.next_index(), 2);

        let mut cs = ClickState::new();
        let area = Rect::new(0, 5, 40, 10);
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        // border row 5, items on 6 and 7
        assert_eq!(cs.hit_test(3, 5), None);
        assert_eq!(cs.hit_test(3, 6), Some(100));
        assert_eq!(cs.hit_test(3, 7), Some(101));
        assert_eq!(cs.hit_test(3, 8), None);
    }

    #[test]
    fn scrolled_lines_shift_up() {
        let mut cl = ClickableList::new();
        for i in 0..10u16 {
            cl.push_clickable(Line::from(format!("item {}", i)), 100 + i);
        }
        let mut cs = ClickState::new();
        let area = Rect::new(0, 0, 40, 5);
        cl.register_targets(area, &mut cs, 1, 1, 4, 0);

        // 3 content rows (1..4) show items 4, 5, 6
        assert_eq!(cs.hit_test(0, 1), Some(104));
        assert_eq!(cs.hit_test(0, 3), Some(106));
        assert_eq!(cs.hit_test(0, 4), None);
        assert_eq!(cs.targets.len(), 3);
    }

    #[test]
    fn wrapped_line_claims_every_row() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("abcdefghijklmnopqrst"), 100);
        cl.push_clickable(Line::from("short"), 101);

        assert_eq!(cl.visual_height(10), 3);

        let mut cs = ClickState::new();
        let area = Rect::new(0, 0, 12, 6);
        cl.register_targets(area, &mut cs, 1, 1, 0, 10);
        assert_eq!(cs.hit_test(0, 1), Some(100));
        assert_eq!(cs.hit_test(0, 2), Some(100));
        assert_eq!(cs.hit_test(0, 3), Some(101));
    }

    #[test]
    fn visual_start_without_wrap_is_index() {
        let mut cl = ClickableList::new();
        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            cl.push_clickable(Line::from(text), 100 + i as u16);
        }
        assert_eq!(cl.visual_start(2, 0), 2);
        assert_eq!(cl.visual_height(0), 3);
    }
}
