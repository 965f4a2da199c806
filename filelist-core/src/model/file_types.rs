//! `src/model/file_types.rs`
//!
//! Ordered, bounded table of recognized extensions. A plain file shows up in
//! the catalog only when its extension is registered here.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

/// Maximum number of registered types.
pub const MAX_FILE_TYPES: usize = 32;

/// Maximum extension length in bytes, leading dot included.
pub const MAX_EXTENSION_LENGTH: usize = 16;

/// Application-defined identifier attached to a registered extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileTypeId(pub u32);

/// Position of a type in its registry.
pub type TypeIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    /// Always starts with `.`
    pub extension: CompactString,
    pub id: FileTypeId,
}

#[derive(Debug, Clone, Default)]
pub struct FileTypeRegistry {
    types: Vec<FileType>,
}

impl FileTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: Vec::with_capacity(MAX_FILE_TYPES),
        }
    }

    /// Append a type. `extension` may be given with or without its dot.
    pub fn register(&mut self, id: FileTypeId, extension: &str) -> Result<TypeIndex, AppError> {
        if self.types.len() >= MAX_FILE_TYPES {
            return Err(AppError::invalid_input(
                "file_types",
                format!("registry full ({MAX_FILE_TYPES} types)"),
            ));
        }

        let trimmed = extension.trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("extension", "empty extension"));
        }

        let mut ext = CompactString::with_capacity(trimmed.len() + 1);
        ext.push('.');
        ext.push_str(trimmed);

        if ext.len() > MAX_EXTENSION_LENGTH {
            return Err(AppError::invalid_input(
                "extension",
                format!("{ext} exceeds {MAX_EXTENSION_LENGTH} bytes"),
            ));
        }

        debug!("Registered file type {ext} as {id:?}");
        self.types.push(FileType { extension: ext, id });
        Ok(self.types.len() - 1)
    }

    /// First registered type whose extension matches `file_name`'s,
    /// ignoring ASCII case.
    #[must_use]
    pub fn find(&self, file_name: &str) -> Option<TypeIndex> {
        let ext = extension_of(file_name)?;
        self.types
            .iter()
            .position(|t| t.extension.eq_ignore_ascii_case(ext))
    }

    #[must_use]
    pub fn get(&self, index: TypeIndex) -> Option<&FileType> {
        self.types.get(index)
    }

    /// Extension of the type at `index`, or `""`.
    #[must_use]
    pub fn extension(&self, index: Option<TypeIndex>) -> &str {
        index
            .and_then(|i| self.types.get(i))
            .map_or("", |t| t.extension.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Extension of the final path segment, dot included: `demo.mvd` → `.mvd`.
/// A leading dot alone (`.hidden`) or a trailing dot is not an extension.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let dot = base.rfind('.')?;
    if dot == 0 || dot + 1 == base.len() {
        return None;
    }
    Some(&base[dot..])
}
