//! src/view/layout.rs
//!
//! Geometry of the file table. Vertical positions are computed in units of
//! 1/8 cell so the extra spacing between rows can be less than a full line.

use ratatui::layout::Rect;

/// Sub-cell units per terminal cell.
pub const CELL_UNITS: usize = 8;

pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 10;

pub const MAX_INTERLINE: u8 = 6;

/// Path header plus column titles.
pub const HEADER_ROWS: usize = 2;

/// Separator, selected name, details/search line.
pub const STATUS_ROWS: usize = 3;

pub const TIME_WIDTH: u16 = 5;
pub const DATE_WIDTH: u16 = 8;
pub const SIZE_WIDTH: u16 = 4;

/// Whether `area` is big enough and lies inside `surface`.
#[must_use]
pub fn fits(area: Rect, surface: Rect) -> bool {
    area.width >= MIN_WIDTH
        && area.height >= MIN_HEIGHT
        && area.x >= surface.x
        && area.y >= surface.y
        && area.right() <= surface.right()
        && area.bottom() <= surface.bottom()
}

/// Row grid of one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMetrics {
    /// Row pitch in units.
    pub row_height: usize,

    /// Height of the area in units.
    pub height_units: usize,

    /// Grid rows that fit.
    pub total_rows: usize,

    /// Rows left for entries.
    pub list_rows: usize,
}

impl RowMetrics {
    #[must_use]
    pub fn new(height: u16, interline: u8, show_status: bool) -> Self {
        let row_height = CELL_UNITS + usize::from(interline.min(MAX_INTERLINE));
        let height_units = usize::from(height) * CELL_UNITS;
        let total_rows = height_units / row_height;
        let reserved = HEADER_ROWS + if show_status { STATUS_ROWS } else { 0 };

        Self {
            row_height,
            height_units,
            total_rows,
            list_rows: total_rows.saturating_sub(reserved),
        }
    }

    /// Cell offset of grid row `row`.
    #[must_use]
    pub fn grid_cell(&self, row: usize) -> u16 {
        u16::try_from(row * self.row_height / CELL_UNITS).unwrap_or(u16::MAX)
    }

    /// Cell offset of entry row `i` (below the two header rows).
    #[must_use]
    pub fn entry_cell(&self, i: usize) -> u16 {
        self.grid_cell(i + HEADER_ROWS)
    }

    /// Cell offset of status line `line` (0..3), anchored at the bottom.
    #[must_use]
    pub fn status_cell(&self, line: usize) -> u16 {
        let from_bottom = (STATUS_ROWS - line.min(STATUS_ROWS - 1)) * self.row_height;
        u16::try_from(self.height_units.saturating_sub(from_bottom) / CELL_UNITS)
            .unwrap_or(u16::MAX)
    }

    /// Entry index under local cell row `y`, given the window start.
    /// Inverse of [`RowMetrics::grid_cell`]; rows above the first entry map
    /// before the window and clamp at 0.
    #[must_use]
    pub fn entry_at(&self, y: u16, window_start: usize) -> usize {
        let grid_row = (usize::from(y) * CELL_UNITS + CELL_UNITS - 1) / self.row_height;
        (window_start + grid_row).saturating_sub(HEADER_ROWS)
    }
}

/// Right-packed optional columns and the name width left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnLayout {
    pub time: Option<u16>,
    pub date: Option<u16>,
    pub size: Option<u16>,

    /// Cells available for the name, cursor cell included.
    pub name_width: u16,
}

impl ColumnLayout {
    /// Columns are placed right to left (time, date, size), each followed
    /// by a one-cell gap, and only while more than one cell stays free.
    #[must_use]
    pub fn new(width: u16, show_size: bool, show_date: bool, show_time: bool) -> Self {
        let mut pos = width;
        let mut add = |enabled: bool, w: u16| -> Option<u16> {
            if !enabled || i32::from(pos) - i32::from(w) - 1 <= 1 {
                return None;
            }
            pos -= w;
            let x = pos;
            pos -= 1;
            Some(x)
        };

        let time = add(show_time, TIME_WIDTH);
        let date = add(show_date, DATE_WIDTH);
        let size = add(show_size, SIZE_WIDTH);

        Self {
            time,
            date,
            size,
            name_width: pos,
        }
    }
}

/// Fit `path` into `width` cells, keeping its head and tail around `...`.
#[must_use]
pub fn fit_path(path: &str, width: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= width {
        return path.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let keep = width - 3;
    let head = keep / 2;
    let tail = keep - head;

    let mut out: String = chars[..head].iter().collect();
    out.push_str("...");
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// `text` cut or padded to exactly `width` cells.
#[must_use]
pub fn fixed_width(text: &str, width: usize) -> String {
    format!("{:<width$.width$}", text)
}
