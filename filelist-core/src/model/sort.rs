//! `src/model/sort.rs`
//! ============================================================================
//! # Sorter: tiered, multi-key ordering of catalog entries
//!
//! Directories come first, then archives, then plain files. The first two
//! tiers are always ordered by name ignoring case; plain files follow the
//! user's [`SortSpec`]. Entries that compare equal keep their relative order
//! (stable sort), so sorting twice with the same spec changes nothing.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::entry::FileEntry;
use crate::model::file_types::FileTypeRegistry;

/// Reverse flag carried in the high bit of a raw key code.
pub const REVERSE_BIT: u8 = 0x80;

/// Longest key list kept by a [`SortSpec`].
pub const MAX_SORT_KEYS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Size,
    Modified,
    Type,
}

impl SortField {
    /// Field for a raw key code with the reverse bit already removed.
    /// `0x01..=0x04` are accepted as aliases of `'1'..='4'`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'1' | 0x01 => Some(Self::Name),
            b'2' | 0x02 => Some(Self::Size),
            b'3' | 0x03 => Some(Self::Modified),
            b'4' | 0x04 => Some(Self::Type),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Name => b'1',
            Self::Size => b'2',
            Self::Modified => b'3',
            Self::Type => b'4',
        }
    }

    /// Field selected by digit `1..=4`.
    #[must_use]
    pub fn from_digit(digit: char) -> Option<Self> {
        u8::try_from(digit).ok().and_then(Self::from_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: SortField,
    pub reverse: bool,
}

impl SortKey {
    #[must_use]
    pub const fn ascending(field: SortField) -> Self {
        Self {
            field,
            reverse: false,
        }
    }

    #[must_use]
    pub const fn descending(field: SortField) -> Self {
        Self {
            field,
            reverse: true,
        }
    }
}

/// Ordered list of sort keys applied to plain files.
///
/// Stored in config as text: one digit per key, `-` prefix for reverse
/// (`"-31"` is newest first, then by name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            keys: vec![SortKey::ascending(SortField::Name)],
        }
    }
}

impl SortSpec {
    #[must_use]
    pub fn new(mut keys: Vec<SortKey>) -> Self {
        keys.truncate(MAX_SORT_KEYS);
        Self { keys }
    }

    /// Decode raw key codes. Unknown codes are skipped.
    #[must_use]
    pub fn from_codes(codes: &[u8]) -> Self {
        let keys = codes
            .iter()
            .filter_map(|&code| {
                SortField::from_code(code & !REVERSE_BIT).map(|field| SortKey {
                    field,
                    reverse: code & REVERSE_BIT != 0,
                })
            })
            .take(MAX_SORT_KEYS)
            .collect();
        Self { keys }
    }

    #[must_use]
    pub fn to_codes(&self) -> Vec<u8> {
        self.keys
            .iter()
            .map(|k| k.field.code() | if k.reverse { REVERSE_BIT } else { 0 })
            .collect()
    }

    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Flip the first key if it already sorts by `field`, otherwise make
    /// `field` the primary key ascending and drop its older occurrence.
    pub fn toggle(&mut self, field: SortField) {
        if let Some(first) = self.keys.first_mut() {
            if first.field == field {
                first.reverse = !first.reverse;
                return;
            }
        }

        self.keys.retain(|k| k.field != field);
        self.keys.insert(0, SortKey::ascending(field));
        self.keys.truncate(MAX_SORT_KEYS);
    }
}

impl FromStr for SortSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut keys = Vec::new();
        let mut reverse = false;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if c == '-' {
                reverse = true;
                continue;
            }

            let field = SortField::from_digit(c)
                .filter(|_| c.is_ascii_digit())
                .ok_or_else(|| {
                    AppError::invalid_input("sort_key", format!("unknown sort key {c:?} in {s:?}"))
                })?;
            keys.push(SortKey { field, reverse });
            reverse = false;
        }

        if reverse {
            return Err(AppError::invalid_input(
                "sort_key",
                format!("dangling '-' in {s:?}"),
            ));
        }

        Ok(Self::new(keys))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in &self.keys {
            if key.reverse {
                f.write_str("-")?;
            }
            write!(f, "{}", key.field.code() as char)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for SortSpec {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortSpec> for String {
    fn from(spec: SortSpec) -> Self {
        spec.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Directory,
    Archive,
    File,
}

fn tier(entry: &FileEntry) -> Tier {
    if entry.is_dir {
        Tier::Directory
    } else if entry.is_archive {
        Tier::Archive
    } else {
        Tier::File
    }
}

/// ASCII case-insensitive lexical comparison.
#[must_use]
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Full ordering between two entries under `spec`.
#[must_use]
pub fn compare(
    a: &FileEntry,
    b: &FileEntry,
    spec: &SortSpec,
    registry: &FileTypeRegistry,
) -> Ordering {
    let (ta, tb) = (tier(a), tier(b));
    if ta != tb {
        return ta.cmp(&tb);
    }

    if ta != Tier::File {
        return cmp_ignore_case(&a.name, &b.name);
    }

    spec.keys
        .iter()
        .map(|key| {
            let ord = match key.field {
                SortField::Name => cmp_ignore_case(&a.name, &b.name),
                SortField::Size => a.size.cmp(&b.size),
                SortField::Modified => a.modified.cmp(&b.modified),
                SortField::Type => cmp_ignore_case(
                    registry.extension(a.type_index),
                    registry.extension(b.type_index),
                ),
            };
            if key.reverse { ord.reverse() } else { ord }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable in-place sort; ties keep their prior relative order.
pub fn sort_entries(entries: &mut [FileEntry], spec: &SortSpec, registry: &FileTypeRegistry) {
    entries.sort_by(|a, b| compare(a, b, spec, registry));
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use compact_str::CompactString;

    use super::*;
    use crate::model::entry::ModifiedAt;
    use crate::model::file_types::FileTypeId;

    fn registry() -> FileTypeRegistry {
        let mut reg = FileTypeRegistry::new();
        reg.register(FileTypeId(1), ".mvd").unwrap();
        reg.register(FileTypeId(2), ".dem").unwrap();
        reg
    }

    fn entry(name: &str, size: u64, day: u8, is_dir: bool, is_archive: bool) -> FileEntry {
        let type_index = if is_dir || is_archive {
            None
        } else {
            registry().find(name)
        };
        FileEntry {
            path: PathBuf::from("/d").join(name),
            name: CompactString::from(name),
            display: CompactString::from(name),
            size,
            modified: ModifiedAt::new(2024, 1, day, 12, 0),
            is_dir,
            is_archive,
            type_index,
        }
    }

    fn file(name: &str, size: u64, day: u8) -> FileEntry {
        entry(name, size, day, false, false)
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn mixed() -> Vec<FileEntry> {
        vec![
            file("b.mvd", 30, 3),
            entry("Zeta", 0, 1, true, false),
            entry("pack.tar", 10, 1, false, true),
            file("A.dem", 20, 1),
            entry("alpha", 0, 1, true, false),
            entry("Old.tgz", 10, 1, false, true),
            file("c.mvd", 10, 2),
        ]
    }

    #[test]
    fn test_tiers_hold_for_every_key() {
        let reg = registry();
        for text in ["1", "2", "3", "4", "-1", "-2", "-3", "-4", ""] {
            let mut entries = mixed();
            sort_entries(&mut entries, &text.parse().unwrap(), &reg);
            assert_eq!(
                names(&entries[..4]),
                vec!["alpha", "Zeta", "Old.tgz", "pack.tar"],
                "key {text:?}"
            );
            assert!(entries[4..].iter().all(|e| !e.is_dir && !e.is_archive));
        }
    }

    #[test]
    fn test_file_keys() {
        let reg = registry();
        let mut entries = mixed();

        sort_entries(&mut entries, &"1".parse().unwrap(), &reg);
        assert_eq!(names(&entries[4..]), vec!["A.dem", "b.mvd", "c.mvd"]);

        sort_entries(&mut entries, &"2".parse().unwrap(), &reg);
        assert_eq!(names(&entries[4..]), vec!["c.mvd", "A.dem", "b.mvd"]);

        sort_entries(&mut entries, &"-2".parse().unwrap(), &reg);
        assert_eq!(names(&entries[4..]), vec!["b.mvd", "A.dem", "c.mvd"]);

        // type, then size descending within .mvd
        sort_entries(&mut entries, &"4-2".parse().unwrap(), &reg);
        assert_eq!(names(&entries[4..]), vec!["A.dem", "b.mvd", "c.mvd"]);
    }

    #[test]
    fn test_reverse_code_gives_exact_reverse() {
        let reg = registry();
        let files = || vec![file("x.mvd", 1, 5), file("y.mvd", 1, 2), file("z.mvd", 1, 9)];

        let mut forward = files();
        sort_entries(&mut forward, &SortSpec::from_codes(b"3"), &reg);
        let mut backward = files();
        sort_entries(&mut backward, &SortSpec::from_codes(b"\x83"), &reg);

        let mut reversed = names(&forward);
        reversed.reverse();
        assert_eq!(names(&backward), reversed);

        let mut high_bit = files();
        sort_entries(&mut high_bit, &SortSpec::from_codes(&[REVERSE_BIT | b'3']), &reg);
        assert_eq!(names(&high_bit), names(&backward));
    }

    #[test]
    fn test_idempotent() {
        let reg = registry();
        let spec: SortSpec = "2".parse().unwrap();
        let mut entries = mixed();
        entries.push(file("d.mvd", 10, 2));
        sort_entries(&mut entries, &spec, &reg);
        let once = entries.clone();
        sort_entries(&mut entries, &spec, &reg);
        assert_eq!(entries, once);
    }

    #[test]
    fn test_codes_and_text() {
        let spec = SortSpec::from_codes(&[b'3' | REVERSE_BIT, b'9', b'1']);
        assert_eq!(
            spec.keys(),
            &[
                SortKey::descending(SortField::Modified),
                SortKey::ascending(SortField::Name)
            ]
        );
        assert_eq!(spec.to_string(), "-31");
        assert_eq!(spec.to_codes(), vec![0xB3, b'1']);
        assert_eq!("-31".parse::<SortSpec>().unwrap(), spec);
        assert!("5".parse::<SortSpec>().is_err());
        assert!("1-".parse::<SortSpec>().is_err());
        assert_eq!("123412341".parse::<SortSpec>().unwrap().keys().len(), MAX_SORT_KEYS);
    }

    #[test]
    fn test_toggle() {
        let mut spec: SortSpec = "12".parse().unwrap();
        spec.toggle(SortField::Name);
        assert_eq!(spec.to_string(), "-12");
        spec.toggle(SortField::Name);
        assert_eq!(spec.to_string(), "12");
        spec.toggle(SortField::Size);
        assert_eq!(spec.to_string(), "21");
        spec.toggle(SortField::Modified);
        assert_eq!(spec.to_string(), "321");

        let mut full: SortSpec = "12341234".parse().unwrap();
        full.toggle(SortField::Type);
        assert_eq!(full.to_string(), "4123123");
        assert!(full.keys().len() <= MAX_SORT_KEYS);
    }
}
