//! src/view/theme.rs
//! ============================================================================
//! # Colours for the file table
//!
//! Fixed chrome colours come from the Catppuccin Mocha palette; the four row
//! colours are user options parsed from colour specs.

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

use crate::config::FileListConfig;
use crate::util::color::Rgba;

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

/// Row colours of one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub file: Color,
    pub selected: Color,
    pub dir: Color,
    pub archive: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&FileListConfig::default())
    }
}

impl Theme {
    #[instrument(level = "debug", skip(config))]
    #[must_use]
    pub fn from_config(config: &FileListConfig) -> Self {
        let theme = Self {
            file: Rgba::parse_or_white(&config.file_color).into(),
            selected: Rgba::parse_or_white(&config.selected_color).into(),
            dir: Rgba::parse_or_white(&config.dir_color).into(),
            archive: Rgba::parse_or_white(&config.archive_color).into(),
        };
        debug!("Row colours: {theme:?}");
        theme
    }

    #[must_use]
    pub fn row_style(&self, is_dir: bool, is_archive: bool) -> Style {
        let fg = if is_dir {
            self.dir
        } else if is_archive {
            self.archive
        } else {
            self.file
        };
        Style::default().fg(fg)
    }

    #[must_use]
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .bg(CURRENT_LINE)
            .add_modifier(Modifier::BOLD)
    }
}

pub fn path_header_style() -> Style {
    Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
}

pub fn column_header_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn cursor_style() -> Style {
    Style::default().fg(CYAN).bg(CURRENT_LINE)
}

pub fn band_style() -> Style {
    Style::default().bg(CURRENT_LINE)
}

pub fn message_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn error_style() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::BOLD)
}

pub fn prompt_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn separator_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn status_style() -> Style {
    Style::default().fg(FOREGROUND)
}

pub fn search_style(not_found: bool) -> Style {
    if not_found {
        Style::default().fg(RED)
    } else {
        Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
    }
}

pub fn widget_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_colours() {
        let mut config = FileListConfig::default();
        config.dir_color = "#102030".to_string();
        config.archive_color = "bogus".to_string();

        let theme = Theme::from_config(&config);
        assert_eq!(theme.dir, Color::Rgb(16, 32, 48));
        assert_eq!(theme.archive, Color::Rgb(255, 255, 255));
        assert_eq!(theme.row_style(true, false).fg, Some(theme.dir));
        assert_eq!(theme.row_style(false, false).fg, Some(theme.file));
    }
}
