//! src/controller/actions.rs
//! ============================================================================
//! # Actions: what a key or mouse event means to the file list
//!
//! Terminal events are translated into `Action`s here and nowhere else, so the
//! controller never inspects raw key codes. Translation depends on whether a
//! confirmation prompt is up and whether a search session is running.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::controller::mode::ConfirmInput;
use crate::model::sort::SortField;

/// Optional table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Size,
    Date,
    Time,
}

impl Column {
    /// Column toggled by digit `2..=4`.
    #[must_use]
    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '2' => Some(Self::Size),
            '3' => Some(Self::Date),
            '4' => Some(Self::Time),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Printable character for the type-ahead search.
    SearchInput(char),

    ToggleColumn(Column),

    ToggleSortKey(SortField),

    /// Switch to the root of drive `letter` (Windows).
    ChangeDrive(char),

    /// Go to the filesystem root.
    GoToRoot,

    /// Enter the selected directory or archive.
    Activate,

    GoToParent,

    MoveSelectionUp,

    MoveSelectionDown,

    PageUp,

    PageDown,

    SelectFirst,

    SelectLast,

    Delete { immediate: bool },

    Compress { immediate: bool },

    Decompress,

    /// Pointer moved to a cell.
    PointAt { column: u16, row: u16 },

    /// Primary button pressed at a cell.
    Click { column: u16, row: u16 },
}

/// Any of these on a printable key keeps it from starting a search.
const COMMAND_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT)
    .union(KeyModifiers::SUPER);

/// Printable ASCII, the alphabet of display names.
#[must_use]
pub const fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~')
}

impl Action {
    /// Translate a key pressed while no prompt is showing.
    #[must_use]
    pub fn from_key(key: &KeyEvent, search_active: bool) -> Option<Self> {
        let mods = key.modifiers;
        let ctrl = mods.contains(KeyModifiers::CONTROL);
        let alt = mods.contains(KeyModifiers::ALT);
        let shift = mods.contains(KeyModifiers::SHIFT);

        if let KeyCode::Char(c) = key.code
            && is_printable(c)
            && (search_active || !mods.intersects(COMMAND_MODIFIERS))
        {
            return Some(Self::SearchInput(c));
        }

        match key.code {
            KeyCode::Char(c @ '2'..='4') if ctrl && !alt => Column::from_digit(c).map(Self::ToggleColumn),
            KeyCode::Char(c @ '1'..='4') if alt && !ctrl => {
                SortField::from_digit(c).map(Self::ToggleSortKey)
            }
            KeyCode::Char(c) if cfg!(windows) && ctrl && alt && c.is_ascii_alphabetic() => {
                Some(Self::ChangeDrive(c.to_ascii_uppercase()))
            }
            KeyCode::Char('/' | '\\') if ctrl => Some(Self::GoToRoot),
            KeyCode::Char(c) if alt && !ctrl && c.eq_ignore_ascii_case(&'c') => Some(Self::Compress {
                immediate: shift || c.is_ascii_uppercase(),
            }),
            KeyCode::Char(c) if alt && !ctrl && c.eq_ignore_ascii_case(&'d') => Some(Self::Decompress),
            KeyCode::Enter => Some(Self::Activate),
            KeyCode::Backspace => Some(Self::GoToParent),
            KeyCode::Up => Some(Self::MoveSelectionUp),
            KeyCode::Down => Some(Self::MoveSelectionDown),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Delete => Some(Self::Delete { immediate: shift }),
            _ => None,
        }
    }

    /// Translate a mouse event; coordinates stay absolute.
    #[must_use]
    pub fn from_mouse(mouse: &MouseEvent) -> Option<Self> {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                Some(Self::PointAt { column, row })
            }
            MouseEventKind::Down(MouseButton::Left) => Some(Self::Click { column, row }),
            MouseEventKind::ScrollUp => Some(Self::MoveSelectionUp),
            MouseEventKind::ScrollDown => Some(Self::MoveSelectionDown),
            _ => None,
        }
    }
}

impl ConfirmInput {
    /// Classify a key pressed while a prompt is showing.
    #[must_use]
    pub const fn from_key(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Self::Affirm,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Self::Deny,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn plain(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_printable_goes_to_search() {
        assert_eq!(
            Action::from_key(&plain(KeyCode::Char('a')), false),
            Some(Action::SearchInput('a'))
        );
        assert_eq!(
            Action::from_key(&plain(KeyCode::Char('/')), false),
            Some(Action::SearchInput('/'))
        );
        assert_eq!(
            Action::from_key(&plain(KeyCode::Char('3')), false),
            Some(Action::SearchInput('3'))
        );
        // an active session accepts modified printables too
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('3'), KeyModifiers::CONTROL), true),
            Some(Action::SearchInput('3'))
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('B'), KeyModifiers::SHIFT), true),
            Some(Action::SearchInput('B'))
        );
        assert_eq!(Action::from_key(&plain(KeyCode::Char('é')), false), None);
    }

    #[test]
    fn test_shifted_letter_does_not_start_search() {
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('B'), KeyModifiers::SHIFT), false),
            None
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('?'), KeyModifiers::SHIFT), false),
            None
        );
    }

    #[test]
    fn test_modifier_chords() {
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('2'), KeyModifiers::CONTROL), false),
            Some(Action::ToggleColumn(Column::Size))
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('4'), KeyModifiers::CONTROL), false),
            Some(Action::ToggleColumn(Column::Time))
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('1'), KeyModifiers::CONTROL), false),
            None
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('3'), KeyModifiers::ALT), false),
            Some(Action::ToggleSortKey(SortField::Modified))
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('/'), KeyModifiers::CONTROL), false),
            Some(Action::GoToRoot)
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('c'), KeyModifiers::ALT), false),
            Some(Action::Compress { immediate: false })
        );
        assert_eq!(
            Action::from_key(
                &key(KeyCode::Char('C'), KeyModifiers::ALT | KeyModifiers::SHIFT),
                false
            ),
            Some(Action::Compress { immediate: true })
        );
        assert_eq!(
            Action::from_key(&key(KeyCode::Char('d'), KeyModifiers::ALT), false),
            Some(Action::Decompress)
        );
    }

    #[test]
    fn test_navigation_keys() {
        let cases = [
            (KeyCode::Enter, Action::Activate),
            (KeyCode::Backspace, Action::GoToParent),
            (KeyCode::Up, Action::MoveSelectionUp),
            (KeyCode::Down, Action::MoveSelectionDown),
            (KeyCode::PageUp, Action::PageUp),
            (KeyCode::PageDown, Action::PageDown),
            (KeyCode::Home, Action::SelectFirst),
            (KeyCode::End, Action::SelectLast),
            (KeyCode::Delete, Action::Delete { immediate: false }),
        ];
        for (code, action) in cases {
            assert_eq!(Action::from_key(&plain(code), false), Some(action));
        }
        assert_eq!(
            Action::from_key(&key(KeyCode::Delete, KeyModifiers::SHIFT), false),
            Some(Action::Delete { immediate: true })
        );
        assert_eq!(Action::from_key(&plain(KeyCode::Esc), false), None);
    }

    #[test]
    fn test_confirm_keys() {
        for code in [KeyCode::Char('y'), KeyCode::Char('Y'), KeyCode::Enter] {
            assert_eq!(ConfirmInput::from_key(&plain(code)), ConfirmInput::Affirm);
        }
        for code in [KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Esc] {
            assert_eq!(ConfirmInput::from_key(&plain(code)), ConfirmInput::Deny);
        }
        assert_eq!(
            ConfirmInput::from_key(&plain(KeyCode::Char('x'))),
            ConfirmInput::Other
        );
    }

    #[test]
    fn test_mouse() {
        let ev = |kind| MouseEvent {
            kind,
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            Action::from_mouse(&ev(MouseEventKind::Moved)),
            Some(Action::PointAt { column: 4, row: 7 })
        );
        assert_eq!(
            Action::from_mouse(&ev(MouseEventKind::Down(MouseButton::Left))),
            Some(Action::Click { column: 4, row: 7 })
        );
        assert_eq!(
            Action::from_mouse(&ev(MouseEventKind::ScrollDown)),
            Some(Action::MoveSelectionDown)
        );
        assert_eq!(
            Action::from_mouse(&ev(MouseEventKind::Down(MouseButton::Right))),
            None
        );
    }
}
