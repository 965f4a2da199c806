//! ``src/fs/enumerator.rs``
//!
//! # Enumerators: raw listing sources for the catalog
//!
//! An enumerator walks one source (a directory, an archive) and hands each
//! record to a visitor, in whatever order the source yields them. The
//! visitor can stop the walk early, which the catalog does once it is full.
//! Anything holding OS or archive handles must release them before
//! `enumerate` returns, on every path.

use std::fs::{self, Metadata};
use std::ops::ControlFlow;
use std::path::Path;

use tracing::debug;

use crate::error::AppError;
use crate::model::entry::{ModifiedAt, PARENT_ALIAS};

/// One record as yielded by a source, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// File name, or member path inside an archive.
    pub name: String,
    pub is_dir: bool,
    pub is_hidden: bool,
    pub size: u64,
    pub modified: ModifiedAt,
}

/// Visitor callback; return `ControlFlow::Break(())` to stop the walk.
pub type Visit<'a> = dyn FnMut(RawEntry) -> ControlFlow<()> + 'a;

pub trait EntryEnumerator {
    /// List `root`. Fails only when the source itself cannot be opened or
    /// read; unreadable individual records are skipped.
    fn enumerate(&self, root: &Path, visit: &mut Visit<'_>) -> Result<(), AppError>;
}

/// An enumerator for one family of container files.
pub trait ArchiveReader: EntryEnumerator {
    /// Whether a plain file called `name` is a container this reader lists.
    fn is_archive(&self, name: &str) -> bool;
}

/// Lists a real directory through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirEnumerator;

impl EntryEnumerator for DirEnumerator {
    fn enumerate(&self, root: &Path, visit: &mut Visit<'_>) -> Result<(), AppError> {
        let read_dir = fs::read_dir(root).map_err(|e| AppError::enumeration(root, e))?;

        if root.parent().is_some() {
            let modified = fs::metadata(root.join(PARENT_ALIAS))
                .map(|md| modified_at(&md))
                .unwrap_or_default();
            let parent = RawEntry {
                name: PARENT_ALIAS.to_string(),
                is_dir: true,
                is_hidden: false,
                size: 0,
                modified,
            };
            if visit(parent).is_break() {
                return Ok(());
            }
        }

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry in {}: {e}", root.display());
                    continue;
                }
            };

            // Follow symlinks so linked directories stay navigable.
            let metadata = match fs::metadata(entry.path()).or_else(|_| entry.metadata()) {
                Ok(md) => md,
                Err(e) => {
                    debug!("No metadata for {:?}: {e}", entry.path());
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let raw = RawEntry {
                is_hidden: name.starts_with('.') || has_hidden_attribute(&metadata),
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
                modified: modified_at(&metadata),
                name,
            };

            if visit(raw).is_break() {
                break;
            }
        }

        Ok(())
    }
}

fn modified_at(metadata: &Metadata) -> ModifiedAt {
    metadata
        .modified()
        .map(ModifiedAt::from_system_time)
        .unwrap_or_default()
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn collect(root: &Path) -> Vec<RawEntry> {
        let mut out = Vec::new();
        DirEnumerator
            .enumerate(root, &mut |raw| {
                out.push(raw);
                ControlFlow::Continue(())
            })
            .unwrap();
        out
    }

    #[test]
    fn test_lists_directory_with_parent_first() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.mvd"), b"12345").unwrap();
        fs::write(tmp.path().join(".secret"), b"").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let entries = collect(tmp.path());
        assert_eq!(entries[0].name, "..");
        assert!(entries[0].is_dir);
        assert_eq!(entries.len(), 4);

        let file = entries.iter().find(|e| e.name == "a.mvd").unwrap();
        assert_eq!(file.size, 5);
        assert!(!file.is_dir);
        assert!(file.modified.year >= 2020);

        assert!(entries.iter().find(|e| e.name == ".secret").unwrap().is_hidden);
        assert!(entries.iter().find(|e| e.name == "sub").unwrap().is_dir);
        assert!(entries.iter().all(|e| e.name != "."));
    }

    #[test]
    fn test_break_stops_walk() {
        let tmp = TempDir::new().unwrap();
        for i in 0..5 {
            fs::write(tmp.path().join(format!("{i}.mvd")), b"").unwrap();
        }

        let mut seen = 0;
        DirEnumerator
            .enumerate(tmp.path(), &mut |_| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_missing_directory_is_enumeration_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let err = DirEnumerator
            .enumerate(&missing, &mut |_| ControlFlow::Continue(()))
            .unwrap_err();
        assert!(matches!(err, AppError::Enumeration { .. }));
    }
}
