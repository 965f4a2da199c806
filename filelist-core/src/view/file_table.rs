//! src/view/file_table.rs
//! ============================================================================
//! # `FileTableView`: draws one frame of the file list
//!
//! Top to bottom: the current path, column titles, the visible entries and an
//! optional three-line status bar. While a confirmation is pending, a prompt
//! takes the place of the entries and the status bar. The view reads a [`TableModel`] snapshot and
//! only mutates the name scroller.

use std::path::Path;
use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::config::FileListConfig;
use crate::controller::mode::NavigationMode;
use crate::model::entry::FileEntry;
use crate::model::search::SearchState;
use crate::util::humanize::{size_column, size_status};
use crate::view::layout::{ColumnLayout, RowMetrics, fit_path, fixed_width};
use crate::view::scroll::NameScroller;
use crate::view::theme::{self, Theme};

pub const CURSOR_GLYPH: char = '▶';

pub const EMPTY_MESSAGE: &str = "directory empty";
pub const ERROR_MESSAGE: &str = "error reading directory";

/// Everything one frame needs.
pub struct TableModel<'a> {
    pub root: &'a Path,
    pub entries: &'a [FileEntry],
    pub current: usize,
    pub window_start: usize,
    pub error: bool,
    pub mode: NavigationMode,
    pub search: &'a SearchState,
    pub options: &'a FileListConfig,
    pub theme: &'a Theme,
    pub metrics: RowMetrics,
}

pub struct FileTableView<'a> {
    model: TableModel<'a>,
}

impl<'a> FileTableView<'a> {
    #[must_use]
    pub const fn new(model: TableModel<'a>) -> Self {
        Self { model }
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        scroller: &mut NameScroller,
        now: Instant,
    ) {
        frame.render_widget(Block::default().style(theme::widget_style()), area);

        let m = &self.model;
        let width = usize::from(area.width);
        let columns = ColumnLayout::new(
            area.width,
            m.options.show_size,
            m.options.show_date,
            m.options.show_time,
        );

        let path = fit_path(&m.root.to_string_lossy(), width);
        put(frame, area, m.metrics.grid_cell(0), Line::styled(path, theme::path_header_style()));
        put(frame, area, m.metrics.grid_cell(1), self.column_titles(&columns, width));

        if m.mode.is_confirming() {
            self.render_prompt(frame, area);
            return;
        }
        if m.error {
            put_centered(frame, area, m.metrics.grid_cell(2), ERROR_MESSAGE, theme::error_style());
            return;
        }
        if m.entries.is_empty() {
            put_centered(frame, area, m.metrics.grid_cell(2), EMPTY_MESSAGE, theme::message_style());
            return;
        }

        let visible = m
            .entries
            .iter()
            .enumerate()
            .skip(m.window_start)
            .take(m.metrics.list_rows);
        for (row, (index, entry)) in visible.enumerate() {
            let line = self.entry_line(entry, index, &columns, width, scroller, now);
            put(frame, area, m.metrics.entry_cell(row), line);
        }

        if m.options.show_status {
            self.render_status(frame, area);
        }
    }

    fn column_titles(&self, columns: &ColumnLayout, width: usize) -> Line<'static> {
        let mut cells = vec![' '; width];
        place(&mut cells, columns.time, "time");
        place(&mut cells, columns.date, "date");
        place(&mut cells, columns.size, "  kb");
        let name_width = usize::from(columns.name_width).min(4);
        cells[..name_width].copy_from_slice(&['n', 'a', 'm', 'e'][..name_width]);

        Line::styled(cells.into_iter().collect::<String>(), theme::column_header_style())
    }

    fn entry_line(
        &self,
        entry: &FileEntry,
        index: usize,
        columns: &ColumnLayout,
        width: usize,
        scroller: &mut NameScroller,
        now: Instant,
    ) -> Line<'static> {
        let m = &self.model;
        let selected = index == m.current;
        let name_width = usize::from(columns.name_width);
        let name = format!(" {}", entry.display);

        let offset = if selected && m.options.scroll_names {
            scroller.offset(index, &name, name_width, now)
        } else {
            if selected {
                scroller.reset();
            }
            0
        };
        let shown: String = name.chars().skip(offset).take(name_width).collect();

        let mut tail = vec![' '; width.saturating_sub(name_width)];
        let shift = |x: Option<u16>| x.map(|x| x - columns.name_width);
        place(&mut tail, shift(columns.time), &entry.modified.time_column());
        place(&mut tail, shift(columns.date), &entry.modified.date_column());
        place(&mut tail, shift(columns.size), &size_column(entry.size, entry.is_dir));
        let tail: String = tail.into_iter().collect();

        if selected {
            let rest: String = shown.chars().skip(1).collect();
            Line::from(vec![
                Span::styled(CURSOR_GLYPH.to_string(), theme::cursor_style()),
                Span::styled(fixed_width(&rest, name_width.saturating_sub(1)), m.theme.selected_style()),
                Span::styled(tail, theme::status_style()),
            ])
            .style(theme::band_style())
        } else {
            Line::from(vec![
                Span::styled(
                    fixed_width(&shown, name_width),
                    m.theme.row_style(entry.is_dir, entry.is_archive),
                ),
                Span::styled(tail, theme::status_style()),
            ])
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let m = &self.model;
        let width = usize::from(area.width);
        let Some(entry) = m.entries.get(m.current) else {
            return;
        };

        put(
            frame,
            area,
            m.metrics.status_cell(0),
            Line::styled("─".repeat(width), theme::separator_style()),
        );

        let name = fixed_width(&entry.display, width);
        put_centered(frame, area, m.metrics.status_cell(1), name.trim_end(), theme::status_style());

        let (text, style) = if m.search.is_active() {
            if m.search.has_error() {
                ("search for: not found".to_string(), theme::search_style(true))
            } else {
                (format!("search for: {}", m.search.pattern()), theme::search_style(false))
            }
        } else {
            (
                format!(
                    "{} • modified: {} {}",
                    size_status(entry.size, entry.is_dir),
                    entry.modified.date_column(),
                    entry.modified.time_column()
                ),
                theme::status_style(),
            )
        };
        put_centered(frame, area, m.metrics.status_cell(2), &text, style);
    }

    fn render_prompt(&self, frame: &mut Frame<'_>, area: Rect) {
        let m = &self.model;
        let question = format!("Are you sure you want to {} this file?", m.mode.verb());
        let target = m
            .entries
            .get(m.current)
            .map_or_else(String::new, |e| e.display.to_string());

        let cell = |row| m.metrics.entry_cell(row);
        put_centered(frame, area, cell(1), &question, theme::prompt_style());
        put_centered(frame, area, cell(3), &target, theme::status_style());
        put_centered(frame, area, cell(5), "(Y/N)", theme::prompt_style());
    }
}

/// Copy `text` into `cells` starting at `x`, clipped.
fn place(cells: &mut [char], x: Option<u16>, text: &str) {
    let Some(x) = x else {
        return;
    };
    for (slot, c) in cells.iter_mut().skip(usize::from(x)).zip(text.chars()) {
        *slot = c;
    }
}

fn row_rect(area: Rect, row: u16) -> Option<Rect> {
    (row < area.height).then(|| Rect::new(area.x, area.y + row, area.width, 1))
}

fn put(frame: &mut Frame<'_>, area: Rect, row: u16, line: Line<'_>) {
    if let Some(rect) = row_rect(area, row) {
        frame.render_widget(Paragraph::new(line), rect);
    }
}

fn put_centered(frame: &mut Frame<'_>, area: Rect, row: u16, text: &str, style: Style) {
    if let Some(rect) = row_rect(area, row) {
        frame.render_widget(
            Paragraph::new(Line::styled(text.to_string(), style)).alignment(Alignment::Center),
            rect,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use compact_str::CompactString;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;
    use crate::model::entry::ModifiedAt;

    fn entry(name: &str, is_dir: bool, size: u64) -> FileEntry {
        FileEntry {
            path: PathBuf::from("/q").join(name),
            name: CompactString::from(name),
            display: if is_dir {
                CompactString::from(format!("/{name}"))
            } else {
                CompactString::from(name)
            },
            size,
            modified: ModifiedAt::new(2024, 3, 9, 7, 5),
            is_dir,
            is_archive: false,
            type_index: None,
        }
    }

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    struct Fixture {
        entries: Vec<FileEntry>,
        current: usize,
        error: bool,
        mode: NavigationMode,
        search: SearchState,
        options: FileListConfig,
    }

    impl Fixture {
        fn new(entries: Vec<FileEntry>) -> Self {
            let options = FileListConfig {
                show_time: true,
                ..FileListConfig::default()
            };
            Self {
                entries,
                current: 0,
                error: false,
                mode: NavigationMode::Normal,
                search: SearchState::new(),
                options,
            }
        }

        fn draw(&self, width: u16, height: u16) -> Buffer {
            let theme = Theme::default();
            let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
            let mut scroller = NameScroller::new();
            terminal
                .draw(|frame| {
                    let area = frame.area();
                    let model = TableModel {
                        root: Path::new("/q"),
                        entries: &self.entries,
                        current: self.current,
                        window_start: 0,
                        error: self.error,
                        mode: self.mode,
                        search: &self.search,
                        options: &self.options,
                        theme: &theme,
                        metrics: RowMetrics::new(area.height, 0, self.options.show_status),
                    };
                    FileTableView::new(model).render(frame, area, &mut scroller, Instant::now());
                })
                .unwrap();
            terminal.backend().buffer().clone()
        }
    }

    #[test]
    fn test_rows_and_columns() {
        let mut fx = Fixture::new(vec![entry("maps", true, 0), entry("a.mvd", false, 5 * 1024)]);
        fx.current = 1;
        let buf = fx.draw(40, 12);

        // name 0..20, size 21..25, date 26..34, time 35..40
        assert_eq!(row(&buf, 0).trim_end(), "/q");
        assert_eq!(row(&buf, 1), format!("{:<21}  kb date{:5}time ", "name", ""));
        assert_eq!(row(&buf, 2), format!("{:<20} <--> 24-03-09  7:05", " /maps"));
        assert_eq!(row(&buf, 3), format!("▶{:<19}    5 24-03-09  7:05", "a.mvd"));
        assert_eq!(row(&buf, 4).trim(), "");
    }

    #[test]
    fn test_status_bar() {
        let mut fx = Fixture::new(vec![entry("a.mvd", false, 2048)]);
        let buf = fx.draw(40, 12);
        assert!(row(&buf, 9).starts_with("───"));
        assert_eq!(row(&buf, 10).trim(), "a.mvd");
        assert_eq!(row(&buf, 11).trim(), "2 kb • modified: 24-03-09  7:05");

        fx.search.push('a', Instant::now());
        let buf = fx.draw(40, 12);
        assert_eq!(row(&buf, 11).trim(), "search for: a");

        fx.search.mark_not_found();
        let buf = fx.draw(40, 12);
        assert_eq!(row(&buf, 11).trim(), "search for: not found");
    }

    #[test]
    fn test_empty_and_error_messages() {
        let mut fx = Fixture::new(Vec::new());
        assert_eq!(row(&fx.draw(40, 12), 2).trim(), EMPTY_MESSAGE);

        fx.error = true;
        assert_eq!(row(&fx.draw(40, 12), 2).trim(), ERROR_MESSAGE);
    }

    #[test]
    fn test_confirm_prompt_replaces_rows() {
        let mut fx = Fixture::new(vec![entry("a.mvd", false, 1)]);
        fx.mode = NavigationMode::ConfirmDelete;
        let buf = fx.draw(60, 12);

        // header and titles stay
        assert_eq!(row(&buf, 0).trim_end(), "/q");
        assert!(row(&buf, 1).starts_with("name"));

        assert_eq!(row(&buf, 2).trim(), "");
        assert_eq!(
            row(&buf, 3).trim(),
            "Are you sure you want to delete this file?"
        );
        assert_eq!(row(&buf, 5).trim(), "a.mvd");
        assert_eq!(row(&buf, 7).trim(), "(Y/N)");
        // no status bar behind the prompt
        assert_eq!(row(&buf, 11).trim(), "");
    }
}
