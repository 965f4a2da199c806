//! ``src/model/catalog.rs``
//! ============================================================================
//! # `EntryCatalog`: the classified, sorted listing behind the widget
//!
//! Holds the entries of the current root (a directory or an archive) with the
//! cursor and the visible window. The listing is rebuilt wholesale from an
//! enumerator; entries are never patched in place.
//!
//! Invariants after every public call:
//! - non-empty: `current < entries.len()`
//! - empty: `current == 0`
//! - after [`EntryCatalog::fit_window`]: the cursor row is visible.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use tracing::{debug, info, warn};

use crate::fs::enumerator::{ArchiveReader, EntryEnumerator, RawEntry};
use crate::model::entry::{FileEntry, PARENT_ALIAS, SELF_ALIAS};
use crate::model::file_types::FileTypeRegistry;
use crate::model::sanitize::display_name;
use crate::model::sort::{SortSpec, sort_entries};

/// Default upper bound on entries per listing.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Everything classification needs besides the raw record.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    pub registry: &'a FileTypeRegistry,

    /// Present when archives are browsable.
    pub archives: Option<&'a dyn ArchiveReader>,

    pub strip_names: bool,
}

#[derive(Debug, Clone)]
pub struct EntryCatalog {
    entries: Vec<FileEntry>,

    current: usize,

    window_start: usize,

    /// Page size of the most recent window fit; 0 before the first render.
    last_page_size: usize,

    /// Directory or archive being listed.
    root: PathBuf,

    in_archive: bool,

    error: bool,

    needs_refresh: bool,

    needs_resort: bool,

    /// Final segment of the directory just left, highlighted after the
    /// next rebuild.
    cdup_name: Option<String>,

    max_entries: usize,
}

impl EntryCatalog {
    #[must_use]
    pub fn new(root: PathBuf, max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
            window_start: 0,
            last_page_size: 0,
            root,
            in_archive: false,
            error: false,
            needs_refresh: true,
            needs_resort: false,
            cdup_name: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Relist the root through `source`, classify, sort and select.
    pub fn rebuild<S: EntryEnumerator + ?Sized>(
        &mut self,
        source: &S,
        classifier: &Classifier<'_>,
        spec: &SortSpec,
    ) {
        self.entries.clear();
        self.current = 0;
        self.window_start = 0;
        self.needs_refresh = false;
        let cdup_name = self.cdup_name.take();

        let mut kept = Vec::new();
        let mut capped = false;
        let limit = self.max_entries;

        let result = source.enumerate(&self.root, &mut |raw| {
            if let Some(entry) = self.classify(raw, classifier) {
                kept.push(entry);
                if kept.len() >= limit {
                    capped = true;
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });

        if let Err(e) = result {
            warn!("Listing {} failed: {e}", self.root.display());
            self.error = true;
            return;
        }

        self.error = false;
        self.needs_resort = false;
        self.entries = kept;
        sort_entries(&mut self.entries, spec, classifier.registry);

        if let Some(name) = cdup_name
            && let Some(index) = self.entries.iter().position(|e| e.path_text().ends_with(&name))
        {
            self.current = index;
        }
        self.clamp();

        info!(
            root = %self.root.display(),
            entries = self.entries.len(),
            capped,
            in_archive = self.in_archive,
            "Catalog rebuilt"
        );
    }

    /// Turn a raw record into an entry, or drop it.
    fn classify(&self, raw: RawEntry, classifier: &Classifier<'_>) -> Option<FileEntry> {
        if raw.name == SELF_ALIAS || (raw.is_hidden && raw.name != PARENT_ALIAS) {
            return None;
        }

        let is_parent = raw.name == PARENT_ALIAS;
        if is_parent && self.in_archive {
            return None;
        }

        let is_archive = !raw.is_dir
            && !self.in_archive
            && classifier
                .archives
                .is_some_and(|reader| reader.is_archive(&raw.name));

        let type_index = if raw.is_dir || is_archive {
            None
        } else {
            Some(classifier.registry.find(&raw.name)?)
        };

        let path = if is_parent {
            PathBuf::from(PARENT_ALIAS)
        } else {
            self.root.join(&raw.name)
        };

        Some(FileEntry {
            path,
            display: display_name(&raw.name, raw.is_dir, classifier.strip_names),
            name: CompactString::from(raw.name),
            size: raw.size,
            modified: raw.modified,
            is_dir: raw.is_dir,
            is_archive,
            type_index,
        })
    }

    /// Sort again, keeping the selected entry selected.
    pub fn resort(&mut self, spec: &SortSpec, registry: &FileTypeRegistry) {
        let selected = self.current_entry().map(|e| e.path.clone());
        sort_entries(&mut self.entries, spec, registry);
        self.current = selected
            .and_then(|path| self.entries.iter().position(|e| e.path == path))
            .unwrap_or(0);
        self.needs_resort = false;
        self.clamp();
        debug!("Resorted by {spec}, cursor at {}", self.current);
    }

    /// Pull the cursor back inside the listing.
    pub fn clamp(&mut self) {
        if self.entries.is_empty() {
            self.current = 0;
        } else if self.current >= self.entries.len() {
            self.current = self.entries.len() - 1;
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        self.current = self.current.saturating_add_signed(delta);
        self.clamp();
    }

    /// Move by one page of the last rendered size.
    pub fn page(&mut self, down: bool) {
        let page = isize::try_from(self.last_page_size).unwrap_or(isize::MAX);
        self.move_by(if down { page } else { -page });
    }

    pub fn move_first(&mut self) {
        self.current = 0;
    }

    pub fn move_last(&mut self) {
        self.current = self.entries.len().saturating_sub(1);
    }

    /// Select `index`, clamped.
    pub fn select(&mut self, index: usize) {
        self.current = index;
        self.clamp();
    }

    /// Recompute the visible window for `page_size` rows so the cursor
    /// stays visible.
    pub fn fit_window(&mut self, page_size: usize) {
        self.last_page_size = page_size;
        let page = page_size.max(1);

        if self.current >= self.window_start + page {
            self.window_start = self.current + 1 - page;
        }

        let flush_end = self.entries.len().saturating_sub(page);
        if self.window_start > flush_end {
            self.window_start = flush_end;
        }

        if self.current < self.window_start {
            self.window_start = self.current;
        }
    }

    /// Switch the listing source; the next update relists it.
    pub fn set_root(&mut self, root: PathBuf, in_archive: bool) {
        self.root = root;
        self.in_archive = in_archive;
        self.needs_refresh = true;
    }

    /// Remember which entry to highlight after the next rebuild.
    pub fn set_cdup_name(&mut self, name: Option<String>) {
        self.cdup_name = name;
    }

    pub fn mark_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn mark_resort(&mut self) {
        self.needs_resort = true;
    }

    #[must_use]
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.current)
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn window_start(&self) -> usize {
        self.window_start
    }

    #[must_use]
    pub const fn last_page_size(&self) -> usize {
        self.last_page_size
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn in_archive(&self) -> bool {
        self.in_archive
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    #[must_use]
    pub const fn needs_resort(&self) -> bool {
        self.needs_resort
    }
}
