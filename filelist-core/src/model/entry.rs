//! `src/model/entry.rs`
//! ============================================================
//! Classified catalog entries.
//!
//! A `FileEntry` is built once per refresh from a raw enumerator record and
//! never mutated afterwards; the catalog throws the whole list away on the
//! next rebuild.

use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::model::file_types::TypeIndex;

/// Modification time at minute resolution.
///
/// Field order makes the derived `Ord` chronological.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ModifiedAt {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl ModifiedAt {
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Local wall-clock time of `time`.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_datetime(&DateTime::<Local>::from(time))
    }

    /// Local wall-clock time of a unix timestamp (archive headers).
    #[must_use]
    pub fn from_unix_secs(secs: u64) -> Self {
        i64::try_from(secs)
            .ok()
            .and_then(|s| Local.timestamp_opt(s, 0).single())
            .map(|dt| Self::from_datetime(&dt))
            .unwrap_or_default()
    }

    fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            year: u16::try_from(dt.year()).unwrap_or(0),
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
        }
    }

    /// `YY-MM-DD`
    #[must_use]
    pub fn date_column(&self) -> String {
        format!("{:02}-{:02}-{:02}", self.year % 100, self.month, self.day)
    }

    /// `HH:MM`, hour space-padded
    #[must_use]
    pub fn time_column(&self) -> String {
        format!("{:>2}:{:02}", self.hour, self.minute)
    }
}

/// One classified entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path, or `..` for the parent alias. Archive members are
    /// `<archive>/<member path>`.
    pub path: PathBuf,

    /// Raw entry name as yielded by the enumerator (sort key).
    pub name: CompactString,

    /// Sanitized name shown in the table.
    pub display: CompactString,

    pub size: u64,

    pub modified: ModifiedAt,

    pub is_dir: bool,

    pub is_archive: bool,

    /// Registered file type, `None` for directories and archives.
    pub type_index: Option<TypeIndex>,
}

impl FileEntry {
    #[must_use]
    pub fn is_parent_alias(&self) -> bool {
        self.name == PARENT_ALIAS
    }

    /// Path rendered for suffix matching and relocation.
    #[must_use]
    pub fn path_text(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

pub const SELF_ALIAS: &str = ".";
pub const PARENT_ALIAS: &str = "..";
