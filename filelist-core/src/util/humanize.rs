//! src/util/humanize.rs
//!
//! Fixed-width column text for the size column and the status bar.

/// Width of the size column.
pub const SIZE_COLUMN_WIDTH: usize = 4;

const KB: u64 = 1024;

/// Size column text: `<-->` for directories, kilobytes right-aligned in four
/// cells, or `NNNm` megabytes (capped at 999) past 9999 kB.
#[must_use]
pub fn size_column(size: u64, is_dir: bool) -> String {
    if is_dir {
        return "<-->".to_string();
    }

    let kb = size / KB;
    if kb > 9999 {
        format!("{:>3}m", (kb / KB).min(999))
    } else {
        format!("{kb:>4}")
    }
}

/// Size text for the status bar: `dir`, `N kb` or `N mb`.
#[must_use]
pub fn size_status(size: u64, is_dir: bool) -> String {
    if is_dir {
        return "dir".to_string();
    }

    let kb = size / KB;
    if kb > 9999 {
        format!("{} mb", (kb / KB).min(999))
    } else {
        format!("{kb} kb")
    }
}
