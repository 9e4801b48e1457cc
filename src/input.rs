//! Input normalisation and tap/click hit testing.
//!
//! Keyboard, mouse and touch all end up as an [`InputEvent`]. Taps are
//! resolved against click targets registered during the last render.

use ratzilla::ratatui::layout::Rect;

/// Normalised input from keyboard, mouse or touch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable key.
    Key(char),
    /// A tap on a registered target, identified by its action ID.
    Click(u16),
    /// Enter.
    Confirm,
    /// Escape.
    Cancel,
    /// Backspace.
    Erase,
    /// Arrow up or Page Up.
    ScrollUp,
    /// Arrow down or Page Down.
    ScrollDown,
}

/// A rectangular hit region bound to an action ID.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Targets registered by the renderer plus the terminal size they refer to.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame: forget the previous frame's targets and record the size.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Register a one-row target spanning `area`'s width. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Register targets for a row of labels laid out left to right.
    ///
    /// `segments` holds `(label_width, action_id)` in display order, with
    /// `gap` cells between labels. Each gap is split between its neighbours
    /// and the outermost labels stretch to the edges of `area`, so every cell
    /// of the row maps to some label.
    pub fn add_segment_targets(&mut self, area: Rect, segments: &[(u16, u16)], gap: u16) {
        if segments.is_empty() || area.width == 0 {
            return;
        }
        let mut label_start = 0u16;
        let mut left = 0u16;
        for (i, &(width, action_id)) in segments.iter().enumerate() {
            let label_end = label_start.saturating_add(width);
            let right = if i + 1 == segments.len() {
                area.width
            } else {
                label_end.saturating_add(gap / 2).min(area.width)
            };
            if right > left {
                self.add_click_target(
                    Rect::new(area.x + left, area.y, right - left, area.height.max(1)),
                    action_id,
                );
            }
            left = right;
            label_start = label_end.saturating_add(gap);
        }
    }

    /// Action ID at a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let r = t.rect;
                col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|t| t.action_id)
    }

    /// Resolve a tap given in pixels relative to the grid's top-left corner.
    pub fn resolve_pixel(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_x_to_col(x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Narrow screens (phones) get a stacked layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Pixel Y (relative to the grid top) to terminal row, or `None` outside the grid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Pixel X (relative to the grid left) to terminal column, or `None` outside the grid.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(pos: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || pos < 0.0 {
        return None;
    }
    let cell = (pos / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
